// DocEngine 数据模型定义
// 包含问卷、结账订单等核心数据结构

mod payment;
mod survey;

// 重新导出核心类型
pub use payment::*;
pub use survey::*;

use serde::Serialize;

/// 标准API响应格式 ({success, message})
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    /// 处理是否成功
    pub success: bool,
    /// 响应消息
    pub message: String,
}

impl ApiResponse {
    /// 创建成功响应
    pub fn success(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }

    /// 创建错误响应
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}
