// 业务服务模块
// 包含Session存储、OpenAI代理与绿界结账服务

pub mod ecpay_service;
pub mod openai_service;
pub mod session_service;

// 重新导出核心服务
pub use ecpay_service::EcpayService;
pub use openai_service::{ChatApiError, OpenAiService};
pub use session_service::{
    advice_cache_key, build_session_cookie, client_session_id, ensure_session_id,
    insights_cache_key, SessionStore, SURVEY_DATA_KEY, SURVEY_TIMESTAMP_KEY,
};
