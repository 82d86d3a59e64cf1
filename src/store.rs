//! 响应式状态层：可观察单元、宿主环境与各业务 store 的聚合容器。

use std::path::Path;
use std::sync::Arc;
use tokio::sync::watch;

use crate::config::{AuthConfig, StorageConfig};
use crate::error::StorageError;

pub mod auth;
pub mod cookie;
pub mod dashboard;
pub mod navigation;
pub mod page_cache;
pub mod session;
pub mod storage;
pub mod tabs;
pub mod theme;
pub mod toast;
pub mod ui;

pub use auth::AuthStore;
pub use cookie::{CookieJar, CookieOptions, SameSite};
pub use dashboard::DashboardStore;
pub use navigation::NavigationStore;
pub use page_cache::{PageCache, PageState};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use tabs::{NewTab, Tab, TabsStore};
pub use theme::{DocumentTheme, Skin, ThemeMode, ThemeStore};
pub use toast::{NewToast, Toast, ToastKind, ToastStore};
pub use ui::{UiSettings, UiSettingsPatch, UiSettingsStore};

/// 可观察的状态单元：写入即通知所有订阅者。
///
/// 克隆得到的是同一个单元的句柄。不要在 `with` / `update` 的闭包里访问同一个单元。
pub struct Observable<T> {
    tx: Arc<watch::Sender<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T: Clone> Observable<T> {
    pub fn new(value: T) -> Self {
        let (tx, _rx) = watch::channel(value);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.tx.send_modify(f);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// 宿主环境：本地存储、Cookie、系统配色偏好与文档根节点属性
#[derive(Clone)]
pub struct Host {
    pub storage: Arc<dyn Storage>,
    pub cookies: CookieJar,
    /// 系统是否偏好深色（prefers-color-scheme: dark）
    pub prefers_dark: Observable<bool>,
    pub document: Observable<DocumentTheme>,
}

impl Host {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            cookies: CookieJar::new(Arc::clone(&storage)),
            storage,
            prefers_dark: Observable::new(false),
            document: Observable::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::default()))
    }

    /// 以 `<root>/<storage.dir>` 下的 JSON 文件持久化
    pub fn open(root: &Path, config: &StorageConfig) -> Result<Self, StorageError> {
        let storage = FileStorage::open(root.join(&config.dir))?;
        Ok(Self::new(Arc::new(storage)))
    }
}

/// 应用全部状态的容器，显式传递给使用方
#[derive(Clone)]
pub struct AppStores {
    pub host: Host,
    pub auth: AuthStore,
    pub theme: ThemeStore,
    pub ui: UiSettingsStore,
    pub dashboard: DashboardStore,
    pub tabs: TabsStore,
    pub navigation: NavigationStore,
    pub toasts: ToastStore,
    pub page_cache: PageCache,
}

impl AppStores {
    pub fn new(host: Host, auth_config: AuthConfig) -> Self {
        Self {
            auth: AuthStore::new(host.clone(), auth_config),
            theme: ThemeStore::new(host.clone()),
            ui: UiSettingsStore::new(host.clone()),
            dashboard: DashboardStore::new(host.clone()),
            tabs: TabsStore::new(),
            navigation: NavigationStore::default(),
            toasts: ToastStore::default(),
            page_cache: PageCache::default(),
            host,
        }
    }

    /// 从存储恢复全部持久化状态，可重复调用
    pub fn init_all(&self) {
        self.auth.init();
        self.theme.init();
        self.ui.init();
        self.dashboard.init();
        tracing::debug!("全部 store 已从存储恢复");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy;

    #[test]
    fn test_observable_notifies_subscribers() {
        let cell = Observable::new(1);
        let mut rx = cell.subscribe();
        assert!(!rx.has_changed().unwrap());

        cell.set(2);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 2);

        cell.update(|v| *v += 1);
        assert_eq!(cell.get(), 3);
        assert!(rx.has_changed().unwrap());

        let handle = cell.clone();
        handle.set(10);
        assert_eq!(cell.with(|v| *v * 2), 20);
    }

    #[test]
    fn test_init_all_is_idempotent() {
        let host = Host::in_memory();
        let stores = AppStores::new(host.clone(), AuthConfig::default());
        stores.auth.set_auth_state(crate::mock::data::demo_user(), "t-1".into(), false);
        stores.ui.toggle_sidebar();
        stores.dashboard.toggle_widget_visibility("tasks");

        // 新容器共享同一宿主，模拟刷新页面
        let reloaded = AppStores::new(host, AuthConfig::default());
        reloaded.init_all();
        reloaded.init_all();

        assert!(reloaded.auth.is_authenticated());
        assert_eq!(reloaded.auth.token.get().as_deref(), Some("t-1"));
        assert!(reloaded.ui.settings.get().sidebar_collapsed);
        let widgets = reloaded.dashboard.widgets.get();
        assert_eq!(widgets.len(), policy::default_widgets().len());
        assert!(!widgets.iter().find(|w| w.id == "tasks").unwrap().visible);
        assert_eq!(reloaded.tabs.tabs.get().len(), 1);
    }

    #[test]
    fn test_file_backed_host_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig::default();
        {
            let stores = AppStores::new(Host::open(dir.path(), &config).unwrap(), AuthConfig::default());
            stores.ui.toggle_sidebar();
        }

        let stores = AppStores::new(Host::open(dir.path(), &config).unwrap(), AuthConfig::default());
        stores.init_all();
        assert!(stores.ui.settings.get().sidebar_collapsed);
        assert!(dir.path().join(&config.dir).is_dir());
    }
}
