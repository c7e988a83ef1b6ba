// AI生成API处理器
// 处理风险改善建议与AI洞察请求，上游失败时降级为可读消息

use actix_web::{web, HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{AdviceRequest, AdviceResponse, InsightsRequest, InsightsResponse, Language};
use crate::services::{advice_cache_key, ensure_session_id, insights_cache_key, OpenAiService};
use crate::state::AppStateData;

/// 风险改善建议API (基于 M1-M5 分数)
///
/// POST /GeneratePersonalizedAdvice
///
/// 中文结果缓存于Session；英文请求优先翻译已缓存的中文版本。
/// 上游失败时在 {advice} 中返回按语言本地化的失败说明。
pub async fn generate_personalized_advice(
    data: AppStateData,
    req: HttpRequest,
    request: web::Json<AdviceRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let lang = request.language();
    let (session_id, new_cookie) = ensure_session_id(&req, &data.config.session);

    let chat = OpenAiService::new(data.http_client.clone(), data.config.openai.clone());
    let zh_key = advice_cache_key(Language::ZhTw.tag());

    // 英文请求: 已有中文版本时直接翻译返回
    if lang.is_english() {
        if let Some(chinese) = data.sessions.get(&session_id, &zh_key).await {
            log::info!("Found cached Chinese advice, translating for session {}", session_id);
            let translated = chat.translate_advice_to_english(&chinese).await;
            return Ok(respond_with_cookie(new_cookie, AdviceResponse { advice: translated }));
        }
        log::info!("No cached Chinese advice, generating before translation");
    }

    // 生成中文版本 (优先)
    let advice = match chat.generate_advice(&request.scores()).await {
        Ok(advice) => {
            data.sessions.set(&session_id, &zh_key, advice.clone()).await;
            if lang.is_english() {
                chat.translate_advice_to_english(&advice).await
            } else {
                advice
            }
        }
        Err(e) => {
            log::error!("Advice generation failed: {}", e);
            match lang {
                Language::EnUs => format!(
                    "Failed to generate risk improvement recommendations: {}",
                    e
                ),
                Language::ZhTw => format!("風險改善建議生成失敗：{}", e),
            }
        }
    };

    Ok(respond_with_cookie(new_cookie, AdviceResponse { advice }))
}

/// AI洞察API (M1-M5 分数 + M6-M8 开放式问题)
///
/// POST /GenerateInsights
///
/// 开放式问题全部为空时直接返回提示；中文结果缓存于Session，
/// 英文请求优先翻译缓存的中文版本，无缓存时直接生成英文。
pub async fn generate_insights(
    data: AppStateData,
    req: HttpRequest,
    request: web::Json<InsightsRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();
    let lang = request.language();
    let answers = request.answers();

    // 未提供开放式问题数据
    if answers.is_blank() {
        let message = match lang {
            Language::EnUs => "No open-ended question data provided",
            Language::ZhTw => "未提供開放式問題數據",
        };
        return Ok(HttpResponse::Ok().json(InsightsResponse {
            insights: message.to_string(),
        }));
    }

    let (session_id, new_cookie) = ensure_session_id(&req, &data.config.session);
    let chat = OpenAiService::new(data.http_client.clone(), data.config.openai.clone());
    let zh_key = insights_cache_key(Language::ZhTw.tag());

    // 英文请求: 已有中文版本时直接翻译返回
    if lang.is_english() {
        if let Some(chinese) = data.sessions.get(&session_id, &zh_key).await {
            log::info!("Found cached Chinese insights, translating for session {}", session_id);
            let translated = chat.translate_insights_to_english(&chinese).await;
            return Ok(respond_with_cookie(
                new_cookie,
                InsightsResponse { insights: translated },
            ));
        }
    }

    let insights = match chat.generate_insights(&request.scores(), &answers, lang).await {
        Ok(insights) => {
            // 仅缓存中文版本，英文版本按需翻译，不缓存
            if !lang.is_english() {
                data.sessions.set(&session_id, &zh_key, insights.clone()).await;
            }
            log::info!("Insights generated, length: {}", insights.chars().count());
            insights
        }
        Err(e) => {
            log::error!("Insights generation failed: {}", e);
            match lang {
                Language::EnUs => format!("AI analysis failed: {}", e),
                Language::ZhTw => format!("AI 分析失敗：{}", e),
            }
        }
    };

    Ok(respond_with_cookie(new_cookie, InsightsResponse { insights }))
}

/// 序列化响应体，必要时附带新下发的Session Cookie
fn respond_with_cookie<T: serde::Serialize>(
    cookie: Option<actix_web::cookie::Cookie<'static>>,
    body: T,
) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    if let Some(cookie) = cookie {
        response.cookie(cookie);
    }
    response.json(body)
}
