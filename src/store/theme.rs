use serde::{Deserialize, Serialize};

use crate::policy::keys;
use crate::store::{Host, Observable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Default,
    Zinc,
    Slate,
    Stone,
    Gray,
    Neutral,
    Red,
    Rose,
    Orange,
    Green,
    Blue,
    Yellow,
    Violet,
}

/// 文档根节点上的主题属性：`dark` class 与 `data-skin`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentTheme {
    pub dark: bool,
    pub skin: Option<Skin>,
}

#[derive(Clone)]
pub struct ThemeStore {
    pub mode: Observable<ThemeMode>,
    pub skin: Observable<Skin>,
    host: Host,
}

impl ThemeStore {
    pub fn new(host: Host) -> Self {
        Self {
            mode: Observable::new(ThemeMode::default()),
            skin: Observable::new(Skin::default()),
            host,
        }
    }

    pub fn init(&self) {
        if let Some(mode) = self.host.storage.get::<ThemeMode>(keys::THEME) {
            self.mode.set(mode);
        }
        if let Some(skin) = self.host.storage.get::<Skin>(keys::SKIN) {
            self.skin.set(skin);
        }
        self.apply();
    }

    /// `system` 模式在读取时按宿主的配色偏好解析
    pub fn actual_theme(&self) -> ThemeMode {
        match self.mode.get() {
            ThemeMode::System if self.host.prefers_dark.get() => ThemeMode::Dark,
            ThemeMode::System => ThemeMode::Light,
            mode => mode,
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.actual_theme() == ThemeMode::Dark
    }

    pub fn set_mode(&self, mode: ThemeMode) {
        self.mode.set(mode);
        self.host.storage.set(keys::THEME, &mode);
        self.apply();
    }

    pub fn set_skin(&self, skin: Skin) {
        self.skin.set(skin);
        self.host.storage.set(keys::SKIN, &skin);
        self.apply();
    }

    fn apply(&self) {
        let skin = self.skin.get();
        self.host.document.set(DocumentTheme {
            dark: self.is_dark_mode(),
            skin: (skin != Skin::Default).then_some(skin),
        });
    }

    /// 监听系统配色变化，`system` 模式下重新应用主题；没有异步运行时返回 `None`
    pub fn watch_system_scheme(&self) -> Option<tokio::task::JoinHandle<()>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!("没有可用的异步运行时，无法跟随系统配色");
            return None;
        };
        let store = self.clone();
        let mut rx = self.host.prefers_dark.subscribe();
        Some(handle.spawn(async move {
            while rx.changed().await.is_ok() {
                if store.mode.get() == ThemeMode::System {
                    store.apply();
                }
            }
        }))
    }
}
