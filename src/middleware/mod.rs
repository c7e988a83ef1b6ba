// 中间件模块
// 包含请求日志中间件

pub mod logging;

pub use logging::RequestLogging;
