// 配置管理模块
// 负责加载和管理应用程序配置

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// 应用程序配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 服务器配置
    pub server: ServerConfig,
    /// Session配置
    pub session: SessionConfig,
    /// OpenAI API配置
    pub openai: OpenAiConfig,
    /// 绿界网关配置
    pub ecpay: EcpayConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 服务器监听地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// 工作线程数
    pub workers: Option<usize>,
    /// 对外公开的基础网址 (网关回调与返回按钮使用)，缺省按端口推导
    pub public_base_url: Option<String>,
}

/// Session配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session Cookie名称
    pub cookie_name: String,
    /// 闲置过期时间 (分钟)
    pub idle_timeout_minutes: i64,
    /// Cookie是否仅限HTTPS
    pub cookie_secure: bool,
}

/// OpenAI API配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// API密钥 (为空时不附加认证头，调用将在上游失败并降级为消息)
    pub api_key: String,
    /// API基础地址
    pub api_base: String,
    /// 对话模型名称
    pub model: String,
    /// 出站请求超时时间 (秒)
    pub timeout_secs: u64,
}

/// 绿界网关配置
///
/// 默认值为绿界公开的测试商店凭证，仅供开发环境使用。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EcpayConfig {
    /// 商店代号
    pub merchant_id: String,
    /// 共享密钥 HashKey (不得写入日志)
    pub hash_key: String,
    /// 共享密钥 HashIV (不得写入日志)
    pub hash_iv: String,
    /// 报告售价 (整数字符串，网关要求)
    pub total_amount: String,
    /// 交易描述
    pub trade_desc: String,
    /// 商品名称
    pub item_name: String,
    /// 付款方式
    pub choose_payment: String,
}

impl Config {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok(); // 加载.env文件，忽略错误

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "5163".to_string())
                    .parse()
                    .context("Invalid SERVER_PORT")?,
                workers: env::var("SERVER_WORKERS").ok().and_then(|s| s.parse().ok()),
                public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            },
            session: SessionConfig {
                cookie_name: env::var("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|_| ".DocEngine.Session".to_string()),
                idle_timeout_minutes: env::var("SESSION_IDLE_TIMEOUT_MINUTES")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("Invalid SESSION_IDLE_TIMEOUT_MINUTES")?,
                cookie_secure: env::var("SESSION_COOKIE_SECURE")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()
                    .context("Invalid SESSION_COOKIE_SECURE")?,
            },
            openai: OpenAiConfig {
                api_key: env::var("OPENAI_API_KEY").unwrap_or_default(),
                api_base: env::var("OPENAI_API_BASE")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
                timeout_secs: env::var("OPENAI_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "60".to_string())
                    .parse()
                    .context("Invalid OPENAI_TIMEOUT_SECS")?,
            },
            ecpay: EcpayConfig {
                merchant_id: env::var("ECPAY_MERCHANT_ID")
                    .unwrap_or_else(|_| "2000132".to_string()),
                hash_key: env::var("ECPAY_HASH_KEY")
                    .unwrap_or_else(|_| "5294y06JbISpM5x9".to_string()),
                hash_iv: env::var("ECPAY_HASH_IV")
                    .unwrap_or_else(|_| "v77hoKGq4kWxNNIS".to_string()),
                total_amount: env::var("ECPAY_TOTAL_AMOUNT")
                    .unwrap_or_else(|_| "2990".to_string()),
                trade_desc: env::var("ECPAY_TRADE_DESC")
                    .unwrap_or_else(|_| "Doc Engine Report".to_string()),
                item_name: env::var("ECPAY_ITEM_NAME")
                    .unwrap_or_else(|_| "Risk Assessment Report".to_string()),
                choose_payment: env::var("ECPAY_CHOOSE_PAYMENT")
                    .unwrap_or_else(|_| "Credit".to_string()),
            },
        })
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        // 验证服务器配置
        if self.server.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }

        // 验证Session配置
        if self.session.cookie_name.is_empty() {
            anyhow::bail!("Session cookie name cannot be empty");
        }
        if self.session.idle_timeout_minutes <= 0 {
            anyhow::bail!("Session idle timeout must be positive");
        }

        // 验证OpenAI配置
        if self.openai.model.is_empty() {
            anyhow::bail!("OpenAI model cannot be empty");
        }
        if self.openai.timeout_secs == 0 {
            anyhow::bail!("OpenAI timeout cannot be 0");
        }

        // 验证网关配置
        if self.ecpay.merchant_id.is_empty() {
            anyhow::bail!("ECPay merchant id cannot be empty");
        }
        if self.ecpay.hash_key.is_empty() || self.ecpay.hash_iv.is_empty() {
            anyhow::bail!("ECPay hash key/iv cannot be empty");
        }
        self.ecpay
            .total_amount
            .parse::<u32>()
            .context("ECPay total amount must be a positive integer string")?;

        Ok(())
    }

    /// 获取服务器绑定地址
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取对外公开的基础网址
    pub fn public_base_url(&self) -> String {
        match &self.server.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.server.port),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5163,
                workers: None,
                public_base_url: None,
            },
            session: SessionConfig {
                cookie_name: ".DocEngine.Session".to_string(),
                idle_timeout_minutes: 30,
                cookie_secure: false,
            },
            openai: OpenAiConfig {
                api_key: "".to_string(),
                api_base: "https://api.openai.com/v1".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                timeout_secs: 60,
            },
            ecpay: EcpayConfig {
                merchant_id: "2000132".to_string(),
                hash_key: "5294y06JbISpM5x9".to_string(),
                hash_iv: "v77hoKGq4kWxNNIS".to_string(),
                total_amount: "2990".to_string(),
                trade_desc: "Doc Engine Report".to_string(),
                item_name: "Risk Assessment Report".to_string(),
                choose_payment: "Credit".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let config = Config::default();
        assert_eq!(config.bind_address(), "127.0.0.1:5163");
    }

    #[test]
    fn test_public_base_url_derived_from_port() {
        let config = Config::default();
        assert_eq!(config.public_base_url(), "http://localhost:5163");
    }

    #[test]
    fn test_public_base_url_explicit_trims_slash() {
        let mut config = Config::default();
        config.server.public_base_url = Some("https://doc.example.tw/".to_string());
        assert_eq!(config.public_base_url(), "https://doc.example.tw");
    }

    #[test]
    fn test_validate_rejects_bad_amount() {
        let mut config = Config::default();
        config.ecpay.total_amount = "NT$2990".to_string();
        assert!(config.validate().is_err());
    }
}
