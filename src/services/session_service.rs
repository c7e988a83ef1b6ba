// Session存储服务
// 以客户端Cookie关联的内存键值存储，闲置超时后过期

use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// 问卷原始数据的Session键
pub const SURVEY_DATA_KEY: &str = "SurveyData";
/// 问卷提交时间戳的Session键
pub const SURVEY_TIMESTAMP_KEY: &str = "SurveyTimestamp";

/// 风险改善建议缓存键 (按语言区分，仅缓存 zh-TW 版本)
pub fn advice_cache_key(lang_tag: &str) -> String {
    format!("PersonalizedAdvice_{}", lang_tag)
}

/// AI洞察缓存键 (按语言区分，仅缓存 zh-TW 版本)
pub fn insights_cache_key(lang_tag: &str) -> String {
    format!("AIInsights_{}", lang_tag)
}

/// 单个Session条目
struct SessionEntry {
    /// 键值数据
    values: HashMap<String, String>,
    /// 最近访问时间，读写都会刷新
    last_access: DateTime<Utc>,
}

/// Session存储
///
/// 进程内单实例、显式注入各处理器使用。同一Session的并发写为
/// 最后写入生效，数据仅为展示性缓存，不加锁保护顺序。
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, SessionEntry>>>,
    idle_timeout: Duration,
}

impl SessionStore {
    /// 创建新的Session存储
    ///
    /// # Arguments
    /// * `idle_timeout` - 闲置过期时间
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout,
        }
    }

    /// 生成新的Session标识符
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    /// 读取Session中的值
    ///
    /// 命中时刷新闲置时钟；Session已过期则整体移除并返回None。
    pub async fn get(&self, session_id: &str, key: &str) -> Option<String> {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        match sessions.get_mut(session_id) {
            Some(entry) if now - entry.last_access > self.idle_timeout => {
                sessions.remove(session_id);
                None
            }
            Some(entry) => {
                entry.last_access = now;
                entry.values.get(key).cloned()
            }
            None => None,
        }
    }

    /// 写入Session中的值，Session不存在时创建
    pub async fn set(&self, session_id: &str, key: &str, value: String) {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let entry = sessions.entry(session_id.to_string()).or_insert_with(|| SessionEntry {
            values: HashMap::new(),
            last_access: now,
        });
        entry.last_access = now;
        entry.values.insert(key.to_string(), value);
    }

    /// 移除Session中的单个键
    pub async fn remove(&self, session_id: &str, key: &str) {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        if let Some(entry) = sessions.get_mut(session_id) {
            entry.last_access = now;
            entry.values.remove(key);
        }
    }

    /// 清理所有过期Session
    ///
    /// # Returns
    /// * 被移除的Session数量
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now - entry.last_access <= self.idle_timeout);
        before - sessions.len()
    }

    /// 当前活跃Session数量
    pub async fn active_sessions(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// 从请求Cookie中提取Session标识符
pub fn client_session_id(req: &HttpRequest, cookie_name: &str) -> Option<String> {
    req.cookie(cookie_name).map(|c| c.value().to_string())
}

/// 提取或新建Session标识符
///
/// 客户端未携带Cookie时生成新标识符，并返回需要下发的Cookie。
pub fn ensure_session_id(
    req: &HttpRequest,
    config: &crate::config::SessionConfig,
) -> (String, Option<Cookie<'static>>) {
    match client_session_id(req, &config.cookie_name) {
        Some(id) => (id, None),
        None => {
            let id = SessionStore::generate_id();
            let cookie = build_session_cookie(&config.cookie_name, &id, config.cookie_secure);
            (id, Some(cookie))
        }
    }
}

/// 构建Session Cookie
///
/// HttpOnly 防止脚本读取，SameSite=Strict 防护CSRF。
pub fn build_session_cookie(
    cookie_name: &str,
    session_id: &str,
    secure: bool,
) -> Cookie<'static> {
    Cookie::build(cookie_name.to_string(), session_id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip_and_clear() {
        let store = SessionStore::new(Duration::minutes(30));
        let sid = SessionStore::generate_id();

        let key = advice_cache_key("zh-TW");
        store.set(&sid, &key, "建議內容".to_string()).await;
        assert_eq!(store.get(&sid, &key).await.as_deref(), Some("建議內容"));

        store.remove(&sid, &key).await;
        assert_eq!(store.get(&sid, &key).await, None);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(Duration::minutes(30));
        store.set("a", SURVEY_DATA_KEY, "one".to_string()).await;
        store.set("b", SURVEY_DATA_KEY, "two".to_string()).await;

        assert_eq!(store.get("a", SURVEY_DATA_KEY).await.as_deref(), Some("one"));
        assert_eq!(store.get("b", SURVEY_DATA_KEY).await.as_deref(), Some("two"));
    }

    #[tokio::test]
    async fn test_idle_expiry() {
        let store = SessionStore::new(Duration::milliseconds(50));
        store.set("s", SURVEY_DATA_KEY, "stale".to_string()).await;

        tokio::time::sleep(std::time::Duration::from_millis(120)).await;
        assert_eq!(store.get("s", SURVEY_DATA_KEY).await, None);
        assert_eq!(store.active_sessions().await, 0);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = SessionStore::new(Duration::milliseconds(50));
        store.set("old", SURVEY_DATA_KEY, "x".to_string()).await;
        tokio::time::sleep(std::time::Duration::from_millis(120)).await;
        store.set("fresh", SURVEY_DATA_KEY, "y".to_string()).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.active_sessions().await, 1);
        assert_eq!(store.get("fresh", SURVEY_DATA_KEY).await.as_deref(), Some("y"));
    }

    #[test]
    fn test_cache_keys() {
        assert_eq!(advice_cache_key("zh-TW"), "PersonalizedAdvice_zh-TW");
        assert_eq!(insights_cache_key("zh-TW"), "AIInsights_zh-TW");
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = build_session_cookie(".DocEngine.Session", "abc123", false);
        assert_eq!(cookie.name(), ".DocEngine.Session");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
    }

    #[test]
    fn test_generated_ids_unique() {
        let a = SessionStore::generate_id();
        let b = SessionStore::generate_id();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
    }
}
