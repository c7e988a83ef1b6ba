// API处理器模块
// 包含所有HTTP请求处理逻辑

pub mod advice_handlers;
pub mod page_handlers;
pub mod payment_handlers;
pub mod survey_handlers;

// 重新导出处理器
pub use advice_handlers::*;
pub use page_handlers::*;
pub use payment_handlers::*;
pub use survey_handlers::*;
