//! 内存中的 Mock API：模拟网络延迟，返回统一响应信封。

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::RwLock;

use crate::config::{AppConfig, AuthConfig};

pub mod auth;
pub mod content;
pub mod dashboard;
pub mod data;
pub mod envelope;
pub mod users;
pub mod workspace;

pub use auth::Notice;
pub use data::{CollectionSizes, MockData};
pub use envelope::{ApiResponse, Paginated, PaginationParams, SortOrder, paginate};

/// 各类接口的基准延迟（毫秒）
pub mod latency {
    pub const AUTH: u64 = 500;
    pub const LIST: u64 = 400;
    pub const READ: u64 = 300;
    pub const SMALL_WRITE: u64 = 200;
    pub const COUNT: u64 = 100;
}

/// Mock 接口集合。克隆共享同一份数据；等待延迟时不持有锁。
#[derive(Clone)]
pub struct MockApi {
    data: Arc<RwLock<MockData>>,
    latency_factor: f64,
    auth: AuthConfig,
}

impl MockApi {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            latency_factor: 1.0,
            auth: AuthConfig::default(),
        }
    }

    /// 按配置生成数据；未指定种子时每次启动数据不同
    pub fn from_config(config: &AppConfig) -> Self {
        let sizes = config.mock.sizes();
        let data = match config.mock.seed {
            Some(seed) => {
                MockData::generate_with(&mut StdRng::seed_from_u64(seed), sizes, Utc::now())
            }
            None => MockData::generate_with(&mut rand::rng(), sizes, Utc::now()),
        };
        tracing::debug!(
            "Mock 数据已生成：{} 个用户，{} 篇文档，{} 个文件",
            data.users.len(),
            data.documents.len(),
            data.files.len()
        );

        Self::new(data)
            .with_latency_factor(config.mock.latency_factor)
            .with_auth(config.auth.clone())
    }

    pub fn with_latency_factor(mut self, factor: f64) -> Self {
        self.latency_factor = factor.max(0.0);
        self
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    async fn delay(&self, base_ms: u64) {
        let ms = (base_ms as f64 * self.latency_factor).round() as u64;
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }
}

#[cfg(test)]
pub(crate) fn test_api() -> MockApi {
    MockApi::new(MockData::generate(&mut StdRng::seed_from_u64(20240101))).with_latency_factor(0.0)
}
