use anyhow::Result;
use serde::Deserialize;
use std::path::Path;

use crate::mock::data::CollectionSizes;

pub const CONFIG_FILE: &str = "halolight.toml";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppInfo,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// 应用元信息
#[derive(Debug, Clone, Deserialize)]
pub struct AppInfo {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_app_title")]
    pub title: String,
    #[serde(default = "default_app_description")]
    pub description: String,
    #[serde(default = "default_app_version")]
    pub version: String,
    #[serde(default = "default_app_author")]
    pub author: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub homepage: String,
    #[serde(default)]
    pub repository: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// 允许跨域的来源，为空时不启用 CORS
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_token_expires_days")]
    pub token_expires_days: i64,
    #[serde(default = "default_remember_expires_days")]
    pub remember_expires_days: i64,
    #[serde(default = "default_cookie_path")]
    pub cookie_path: String,
    #[serde(default = "default_demo_email")]
    pub demo_email: String,
    #[serde(default = "default_demo_password")]
    pub demo_password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 本地存储目录，相对项目根目录
    #[serde(default = "default_storage_dir")]
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MockConfig {
    /// 模拟延迟倍数，0 表示不等待
    #[serde(default = "default_latency_factor")]
    pub latency_factor: f64,
    /// 固定种子使生成的数据可复现
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_users")]
    pub users: usize,
    #[serde(default = "default_notifications")]
    pub notifications: usize,
    #[serde(default = "default_tasks")]
    pub tasks: usize,
    #[serde(default = "default_events")]
    pub events: usize,
    #[serde(default = "default_documents")]
    pub documents: usize,
    #[serde(default = "default_files")]
    pub files: usize,
    #[serde(default = "default_messages")]
    pub messages: usize,
}

impl AppConfig {
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = project_root.join(CONFIG_FILE);
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("读取 {CONFIG_FILE} 失败：{}", e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("解析 {CONFIG_FILE} 失败：{}", e))?;
        Ok(config)
    }
}

impl MockConfig {
    pub fn sizes(&self) -> CollectionSizes {
        CollectionSizes {
            users: self.users,
            notifications: self.notifications,
            tasks: self.tasks,
            events: self.events,
            documents: self.documents,
            files: self.files,
            messages: self.messages,
            ..CollectionSizes::default()
        }
    }
}

// 默认值函数
fn default_app_name() -> String { "Halolight".into() }
fn default_app_title() -> String { "Halolight - 中文后台管理系统".into() }
fn default_app_description() -> String { "现代化中文后台管理系统".into() }
fn default_app_version() -> String { env!("CARGO_PKG_VERSION").into() }
fn default_app_author() -> String { "h7ml".into() }
fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 3000 }
fn default_log_level() -> String { "info".into() }
fn default_token_expires_days() -> i64 { 7 }
fn default_remember_expires_days() -> i64 { 30 }
fn default_cookie_path() -> String { "/".into() }
fn default_demo_email() -> String { "admin@halolight.h7ml.cn".into() }
fn default_demo_password() -> String { "123456".into() }
fn default_storage_dir() -> String { ".halolight".into() }
fn default_latency_factor() -> f64 { 1.0 }
fn default_users() -> usize { 20 }
fn default_notifications() -> usize { 10 }
fn default_tasks() -> usize { 8 }
fn default_events() -> usize { 5 }
fn default_documents() -> usize { 15 }
fn default_files() -> usize { 12 }
fn default_messages() -> usize { 6 }

impl Default for AppInfo {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            title: default_app_title(),
            description: default_app_description(),
            version: default_app_version(),
            author: default_app_author(),
            email: String::new(),
            homepage: String::new(),
            repository: String::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_expires_days: default_token_expires_days(),
            remember_expires_days: default_remember_expires_days(),
            cookie_path: default_cookie_path(),
            demo_email: default_demo_email(),
            demo_password: default_demo_password(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            latency_factor: default_latency_factor(),
            seed: None,
            users: default_users(),
            notifications: default_notifications(),
            tasks: default_tasks(),
            events: default_events(),
            documents: default_documents(),
            files: default_files(),
            messages: default_messages(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_format, LogFormat::Text);
        assert_eq!(config.auth.token_expires_days, 7);
        assert_eq!(config.auth.remember_expires_days, 30);
        assert_eq!(config.storage.dir, ".halolight");
        assert_eq!(config.mock.sizes(), CollectionSizes::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = AppConfig::parse(
            r#"
[server]
port = 8080
log_format = "json"

[mock]
latency_factor = 0.0
seed = 42
users = 3
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.log_format, LogFormat::Json);
        assert_eq!(config.mock.seed, Some(42));
        assert_eq!(config.mock.sizes().users, 3);
        assert_eq!(config.mock.sizes().files, 12);
    }

    #[test]
    fn test_invalid_toml_reports_file() {
        let err = AppConfig::parse("[server\nport = 1").unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(dir.path()).is_err());
    }
}
