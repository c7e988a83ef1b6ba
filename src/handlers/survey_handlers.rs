// 问卷API处理器
// 处理问卷提交、查询与清除等HTTP请求

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use crate::models::{ApiResponse, SurveyAnswers, SurveyDataResponse};
use crate::services::{ensure_session_id, SURVEY_DATA_KEY, SURVEY_TIMESTAMP_KEY};
use crate::state::AppStateData;

/// 提交问卷
///
/// POST /SubmitSurvey
///
/// 请求体: SurveyAnswers (m1-m8，接受大小写键名)
/// 问卷数据存储在服务端Session中；首次提交时下发Session Cookie
pub async fn submit_survey(
    data: AppStateData,
    req: HttpRequest,
    answers: web::Json<SurveyAnswers>,
) -> ActixResult<HttpResponse> {
    let (session_id, new_cookie) = ensure_session_id(&req, &data.config.session);

    let serialized = match serde_json::to_string(&answers.into_inner()) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to save survey data: {}", e);
            return Ok(HttpResponse::Ok()
                .json(ApiResponse::error("Failed to save survey data")));
        }
    };

    data.sessions
        .set(&session_id, SURVEY_DATA_KEY, serialized)
        .await;
    data.sessions
        .set(&session_id, SURVEY_TIMESTAMP_KEY, Utc::now().to_rfc3339())
        .await;

    log::info!("Survey data saved to session: {}", session_id);

    let mut response = HttpResponse::Ok();
    if let Some(cookie) = new_cookie {
        response.cookie(cookie);
    }
    Ok(response.json(ApiResponse::success(
        "Survey submitted successfully",
    )))
}

/// 获取问卷数据
///
/// GET /GetSurveyData
///
/// 响应: {success, data, timestamp} 或 {success:false, message}
pub async fn get_survey_data(data: AppStateData, req: HttpRequest) -> ActixResult<HttpResponse> {
    let session_id =
        match crate::services::client_session_id(&req, &data.config.session.cookie_name) {
            Some(id) => id,
            None => {
                return Ok(
                    HttpResponse::Ok().json(ApiResponse::error("No survey data found"))
                );
            }
        };

    let survey_json = match data.sessions.get(&session_id, SURVEY_DATA_KEY).await {
        Some(json) => json,
        None => {
            return Ok(HttpResponse::Ok().json(ApiResponse::error("No survey data found")));
        }
    };

    let answers: SurveyAnswers = match serde_json::from_str(&survey_json) {
        Ok(answers) => answers,
        Err(e) => {
            log::error!("Failed to retrieve survey data: {}", e);
            return Ok(HttpResponse::Ok()
                .json(ApiResponse::error("Failed to retrieve survey data")));
        }
    };

    let timestamp = data.sessions.get(&session_id, SURVEY_TIMESTAMP_KEY).await;

    Ok(HttpResponse::Ok().json(SurveyDataResponse {
        success: true,
        data: answers,
        timestamp,
    }))
}

/// 清除问卷数据
///
/// POST /ClearSurveyData
///
/// 仅移除问卷数据与时间戳，不影响已缓存的生成文本
pub async fn clear_survey_data(data: AppStateData, req: HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(session_id) =
        crate::services::client_session_id(&req, &data.config.session.cookie_name)
    {
        data.sessions.remove(&session_id, SURVEY_DATA_KEY).await;
        data.sessions
            .remove(&session_id, SURVEY_TIMESTAMP_KEY)
            .await;
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success("Survey data cleared")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use crate::state::AppState;

    fn test_app_state() -> AppStateData {
        web::Data::new(AppState::new_for_test())
    }

    #[actix_web::test]
    async fn test_submit_get_clear_roundtrip() {
        let state = test_app_state();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .route("/SubmitSurvey", web::post().to(submit_survey))
                .route("/GetSurveyData", web::get().to(get_survey_data))
                .route("/ClearSurveyData", web::post().to(clear_survey_data)),
        )
        .await;

        // 提交问卷，获取Session Cookie
        let req = test::TestRequest::post()
            .uri("/SubmitSurvey")
            .set_json(serde_json::json!({"M1":"7","m2":"3","m6":"交接文件不完整"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let cookie = resp
            .response()
            .cookies()
            .next()
            .expect("session cookie should be set")
            .into_owned();
        assert_eq!(cookie.name(), ".DocEngine.Session");

        // 携带Cookie查询
        let req = test::TestRequest::get()
            .uri("/GetSurveyData")
            .cookie(cookie.clone())
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["m1"], "7");
        assert_eq!(body["data"]["m6"], "交接文件不完整");
        assert!(body["timestamp"].is_string());

        // 清除后再次查询应报告未找到
        let req = test::TestRequest::post()
            .uri("/ClearSurveyData")
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::get()
            .uri("/GetSurveyData")
            .cookie(cookie)
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No survey data found");
    }

    #[actix_web::test]
    async fn test_get_without_session_reports_not_found() {
        let state = test_app_state();
        let app = test::init_service(
            App::new()
                .app_data(state)
                .route("/GetSurveyData", web::get().to(get_survey_data)),
        )
        .await;

        let req = test::TestRequest::get().uri("/GetSurveyData").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "No survey data found");
    }
}
