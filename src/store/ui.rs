use serde::{Deserialize, Serialize};

use crate::policy::keys;
use crate::store::{Host, Observable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSettings {
    pub sidebar_collapsed: bool,
    pub show_footer: bool,
    pub show_tab_bar: bool,
    pub mobile_header_fixed: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            sidebar_collapsed: false,
            show_footer: true,
            show_tab_bar: true,
            mobile_header_fixed: true,
        }
    }
}

/// 部分更新，`None` 字段保持原值
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiSettingsPatch {
    pub sidebar_collapsed: Option<bool>,
    pub show_footer: Option<bool>,
    pub show_tab_bar: Option<bool>,
    pub mobile_header_fixed: Option<bool>,
}

impl UiSettings {
    pub fn merge(mut self, patch: UiSettingsPatch) -> Self {
        if let Some(v) = patch.sidebar_collapsed {
            self.sidebar_collapsed = v;
        }
        if let Some(v) = patch.show_footer {
            self.show_footer = v;
        }
        if let Some(v) = patch.show_tab_bar {
            self.show_tab_bar = v;
        }
        if let Some(v) = patch.mobile_header_fixed {
            self.mobile_header_fixed = v;
        }
        self
    }
}

#[derive(Clone)]
pub struct UiSettingsStore {
    pub settings: Observable<UiSettings>,
    host: Host,
}

impl UiSettingsStore {
    pub fn new(host: Host) -> Self {
        Self {
            settings: Observable::default(),
            host,
        }
    }

    /// 已保存的字段覆盖默认值，缺失字段取默认
    pub fn init(&self) {
        if let Some(saved) = self.host.storage.get::<UiSettings>(keys::UI_SETTINGS) {
            self.settings.set(saved);
        }
    }

    pub fn update(&self, patch: UiSettingsPatch) {
        self.settings.update(|s| *s = s.merge(patch));
        self.host.storage.set(keys::UI_SETTINGS, &self.settings.get());
    }

    pub fn toggle_sidebar(&self) {
        let collapsed = self.settings.with(|s| s.sidebar_collapsed);
        self.update(UiSettingsPatch {
            sidebar_collapsed: Some(!collapsed),
            ..UiSettingsPatch::default()
        });
    }
}
