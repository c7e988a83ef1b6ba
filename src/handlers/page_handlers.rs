// 页面与系统状态处理器
// 报告页外壳与健康检查接口

use actix_web::{HttpResponse, Result as ActixResult};
use serde::Serialize;

use crate::state::AppStateData;

/// 报告页外壳，数据由前端经JSON接口获取
const REPORT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="zh-Hant">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>風險評估報告</title>
</head>
<body>
  <main id="report">
    <h1>風險評估報告</h1>
    <section id="scores"></section>
    <section id="advice"></section>
    <section id="insights"></section>
  </main>
  <!-- 報告內容由 /GetSurveyData、/GeneratePersonalizedAdvice 與 /GenerateInsights 載入 -->
</body>
</html>
"#;

/// 渲染报告页
pub fn render_report_page() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(REPORT_PAGE)
}

/// 报告页
///
/// GET /Report
pub async fn report() -> ActixResult<HttpResponse> {
    Ok(render_report_page())
}

/// 系统健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 版本信息
    pub version: String,
    /// 当前活跃Session数量
    pub active_sessions: usize,
    /// 当前时间戳
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// 基础健康检查
///
/// GET /health
pub async fn health_check(data: AppStateData) -> ActixResult<HttpResponse> {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active_sessions: data.sessions.active_sessions().await,
        timestamp: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok().json(health))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};
    use crate::state::AppState;

    #[actix_web::test]
    async fn test_report_page() {
        let app =
            test::init_service(App::new().route("/Report", web::get().to(report))).await;

        let req = test::TestRequest::get().uri("/Report").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "text/html; charset=utf-8"
        );
    }

    #[actix_web::test]
    async fn test_health_check() {
        let state = web::Data::new(AppState::new_for_test());
        let app = test::init_service(
            App::new()
                .app_data(state)
                .route("/health", web::get().to(health_check)),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["active_sessions"], 0);
    }
}
