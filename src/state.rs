use crate::config::AppConfig;
use crate::mock::MockApi;
use crate::server::auth::SessionStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// 全部业务数据的唯一持有者
    pub api: MockApi,
    /// 服务端会话：token -> 用户与过期时间
    pub sessions: SessionStore,
    /// 站点是否通过 HTTPS 提供服务（根据 homepage 判断）
    pub is_https: bool,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let api = MockApi::from_config(&config);
        Self::with_api(config, api)
    }

    pub fn with_api(config: AppConfig, api: MockApi) -> Self {
        let is_https = config.app.homepage.starts_with("https://");
        Self {
            config: Arc::new(config),
            api,
            sessions: SessionStore::default(),
            is_https,
        }
    }
}
