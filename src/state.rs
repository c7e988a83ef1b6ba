// 应用状态管理
// 包含配置、Session存储与共享HTTP客户端等全局状态

use actix_web::web;
use chrono::Duration;
use reqwest::Client;

use crate::config::Config;
use crate::services::SessionStore;

/// 应用全局状态
pub struct AppState {
    /// 应用配置
    pub config: Config,
    /// Session存储
    pub sessions: SessionStore,
    /// 共享HTTP客户端 (出站调用统一超时)
    pub http_client: Client,
}

impl AppState {
    /// 创建新的应用状态实例
    ///
    /// # Arguments
    /// * `config` - 应用配置
    pub fn new(config: Config) -> Self {
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.openai.timeout_secs))
            .user_agent(concat!("DocEngine/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        let sessions = SessionStore::new(Duration::minutes(config.session.idle_timeout_minutes));

        Self {
            config,
            sessions,
            http_client,
        }
    }

    /// 创建测试用的应用状态
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        let mut config = Config::default();
        // 测试时OpenAI指向不可达端口，调用立即失败并走降级路径
        config.openai.api_base = "http://127.0.0.1:9".to_string();
        config.openai.timeout_secs = 5;
        Self::new(config)
    }
}

/// 应用状态数据类型别名
pub type AppStateData = web::Data<AppState>;
