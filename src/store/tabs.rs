use serde::{Deserialize, Serialize};

use crate::store::Observable;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tab {
    pub id: String,
    pub title: String,
    pub path: String,
    pub closable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct NewTab {
    pub id: String,
    pub title: String,
    pub path: String,
    /// 默认可关闭
    pub closable: Option<bool>,
}

impl NewTab {
    pub fn new(id: &str, title: &str, path: &str) -> Self {
        Self {
            id: id.to_owned(),
            title: title.to_owned(),
            path: path.to_owned(),
            closable: None,
        }
    }
}

pub const HOME_TAB_ID: &str = "dashboard";

fn home_tab() -> Tab {
    Tab {
        id: HOME_TAB_ID.to_owned(),
        title: "仪表盘".to_owned(),
        path: "/dashboard".to_owned(),
        closable: false,
    }
}

/// 多标签页状态；仪表盘标签不可关闭且始终存在
#[derive(Clone)]
pub struct TabsStore {
    pub tabs: Observable<Vec<Tab>>,
    pub active_id: Observable<String>,
}

impl Default for TabsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TabsStore {
    pub fn new() -> Self {
        Self {
            tabs: Observable::new(vec![home_tab()]),
            active_id: Observable::new(HOME_TAB_ID.to_owned()),
        }
    }

    /// 已有相同路径的标签时只激活它
    pub fn add_tab(&self, tab: NewTab) {
        let existing = self
            .tabs
            .with(|tabs| tabs.iter().find(|t| t.path == tab.path).map(|t| t.id.clone()));
        if let Some(id) = existing {
            self.active_id.set(id);
            return;
        }

        let id = tab.id.clone();
        self.tabs.update(|tabs| {
            tabs.push(Tab {
                id: tab.id,
                title: tab.title,
                path: tab.path,
                closable: tab.closable.unwrap_or(true),
            });
        });
        self.active_id.set(id);
    }

    pub fn activate(&self, tab_id: &str) {
        if self.tabs.with(|tabs| tabs.iter().any(|t| t.id == tab_id)) {
            self.active_id.set(tab_id.to_owned());
        }
    }

    /// 关闭可关闭的标签；关闭当前标签时切换到同位置（或最后一个）标签
    pub fn close_tab(&self, tab_id: &str) {
        let Some(index) = self
            .tabs
            .with(|tabs| tabs.iter().position(|t| t.id == tab_id && t.closable))
        else {
            return;
        };

        self.tabs.update(|tabs| {
            tabs.remove(index);
        });

        if self.active_id.with(|a| a == tab_id) {
            let next = self.tabs.with(|tabs| {
                tabs.get(index.min(tabs.len().saturating_sub(1)))
                    .map(|t| t.id.clone())
            });
            if let Some(next) = next {
                self.active_id.set(next);
            }
        }
    }

    pub fn close_other_tabs(&self, tab_id: &str) {
        self.tabs
            .update(|tabs| tabs.retain(|t| !t.closable || t.id == tab_id));
        if self.tabs.with(|tabs| tabs.iter().any(|t| t.id == tab_id)) {
            self.active_id.set(tab_id.to_owned());
        } else {
            self.activate_first();
        }
    }

    pub fn close_all_tabs(&self) {
        self.tabs.update(|tabs| tabs.retain(|t| !t.closable));
        self.activate_first();
    }

    fn activate_first(&self) {
        if let Some(first) = self.tabs.with(|tabs| tabs.first().map(|t| t.id.clone())) {
            self.active_id.set(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &TabsStore) -> Vec<String> {
        store.tabs.with(|t| t.iter().map(|t| t.id.clone()).collect())
    }

    fn with_three() -> TabsStore {
        let store = TabsStore::new();
        store.add_tab(NewTab::new("users", "用户管理", "/users"));
        store.add_tab(NewTab::new("files", "文件存储", "/files"));
        store.add_tab(NewTab::new("settings", "系统设置", "/settings"));
        store
    }

    #[test]
    fn test_closing_home_tab_is_noop() {
        let store = TabsStore::new();
        let before = store.tabs.get();
        store.close_tab(HOME_TAB_ID);
        assert_eq!(store.tabs.get(), before);
        assert_eq!(store.active_id.get(), HOME_TAB_ID);
    }

    #[test]
    fn test_add_existing_path_activates() {
        let store = with_three();
        store.add_tab(NewTab::new("users-2", "用户", "/users"));
        assert_eq!(ids(&store), ["dashboard", "users", "files", "settings"]);
        assert_eq!(store.active_id.get(), "users");
    }

    #[test]
    fn test_close_active_selects_neighbour() {
        let store = with_three();
        store.activate("files");
        store.close_tab("files");
        assert_eq!(ids(&store), ["dashboard", "users", "settings"]);
        assert_eq!(store.active_id.get(), "settings");

        // 关闭最后一个时回退到新的末尾
        store.close_tab("settings");
        assert_eq!(store.active_id.get(), "users");
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let store = with_three();
        assert_eq!(store.active_id.get(), "settings");
        store.close_tab("users");
        assert_eq!(store.active_id.get(), "settings");
        store.close_tab("missing");
        assert_eq!(ids(&store), ["dashboard", "files", "settings"]);
    }

    #[test]
    fn test_close_others_and_all() {
        let store = with_three();
        store.close_other_tabs("files");
        assert_eq!(ids(&store), ["dashboard", "files"]);
        assert_eq!(store.active_id.get(), "files");

        store.close_all_tabs();
        assert_eq!(ids(&store), ["dashboard"]);
        assert_eq!(store.active_id.get(), HOME_TAB_ID);
    }

    #[test]
    fn test_explicitly_pinned_tab_survives_close_all() {
        let store = TabsStore::new();
        store.add_tab(NewTab {
            closable: Some(false),
            ..NewTab::new("help", "帮助", "/help")
        });
        store.close_all_tabs();
        assert_eq!(ids(&store), ["dashboard", "help"]);
    }
}
