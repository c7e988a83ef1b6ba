// 工具函数模块
// 包含网关签名等通用工具

pub mod signature;

// 重新导出常用函数
pub use signature::*;
