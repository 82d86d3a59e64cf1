use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::store::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

#[derive(Debug, Clone, Default)]
pub struct CookieOptions {
    /// 有效天数，`None` 为会话 Cookie
    pub expires_days: Option<i64>,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

impl CookieOptions {
    pub fn days(days: i64, path: &str) -> Self {
        Self {
            expires_days: Some(days),
            path: Some(path.to_owned()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub value: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub secure: bool,
    pub same_site: SameSite,
}

/// 带过期时间的 Cookie 存储，落在宿主存储的 `cookie:<name>` 键下
#[derive(Clone)]
pub struct CookieJar {
    storage: Arc<dyn Storage>,
}

impl CookieJar {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    fn key(name: &str) -> String {
        format!("cookie:{name}")
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.get_at(name, Utc::now())
    }

    /// 读取时顺带清理已过期的 Cookie
    pub fn get_at(&self, name: &str, now: DateTime<Utc>) -> Option<String> {
        let cookie: StoredCookie = self.storage.get(&Self::key(name))?;
        if cookie.expires_at.is_some_and(|t| t <= now) {
            self.storage.remove(&Self::key(name));
            return None;
        }
        Some(cookie.value)
    }

    pub fn get_cookie(&self, name: &str) -> Option<StoredCookie> {
        self.storage.get(&Self::key(name))
    }

    pub fn set(&self, name: &str, value: &str, options: CookieOptions) {
        self.set_at(name, value, options, Utc::now());
    }

    pub fn set_at(&self, name: &str, value: &str, options: CookieOptions, now: DateTime<Utc>) {
        let cookie = StoredCookie {
            value: value.to_owned(),
            expires_at: options.expires_days.map(|d| now + Duration::days(d)),
            path: options.path.unwrap_or_else(|| "/".to_owned()),
            domain: options.domain,
            secure: options.secure,
            same_site: options.same_site,
        };
        self.storage.set(&Self::key(name), &cookie);
    }

    pub fn remove(&self, name: &str) {
        self.storage.remove(&Self::key(name));
    }
}
