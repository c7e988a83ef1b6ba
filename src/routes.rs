// API路由配置
// 定义所有HTTP接口的路由规则

use crate::handlers::*;
use actix_web::{web, Scope};

/// 应用路由配置
pub fn app_routes() -> Scope {
    web::scope("")
        // 问卷路由
        .route("/SubmitSurvey", web::post().to(submit_survey))
        .route("/GetSurveyData", web::get().to(get_survey_data))
        .route("/ClearSurveyData", web::post().to(clear_survey_data))
        // 支付路由 (网关可能以跳转或表单POST返回)
        .route("/GetEcpayFormData", web::post().to(get_ecpay_form_data))
        .service(
            web::resource("/EcpayReturn")
                .route(web::get().to(ecpay_return))
                .route(web::post().to(ecpay_return)),
        )
        // AI生成路由
        .route(
            "/GeneratePersonalizedAdvice",
            web::post().to(generate_personalized_advice),
        )
        .route("/GenerateInsights", web::post().to(generate_insights))
        // 报告页与系统状态
        .route("/Report", web::get().to(report))
        .route("/health", web::get().to(health_check))
}
