use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::Observable;

/// 单个页面的滚动位置、表单草稿与自定义状态
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageState {
    pub scroll_y: Option<f64>,
    pub form_data: Option<Map<String, Value>>,
    pub custom_state: Option<Map<String, Value>>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// 按路径缓存页面状态，仅存于内存
#[derive(Clone, Default)]
pub struct PageCache {
    pub pages: Observable<HashMap<String, PageState>>,
}

impl PageCache {
    /// 浅合并：传入的非空字段覆盖旧值，时间戳刷新
    pub fn set_page_state(&self, path: &str, patch: PageState) {
        let now = Utc::now();
        self.pages.update(|pages| {
            let entry = pages.entry(path.to_owned()).or_default();
            if patch.scroll_y.is_some() {
                entry.scroll_y = patch.scroll_y;
            }
            if patch.form_data.is_some() {
                entry.form_data = patch.form_data;
            }
            if patch.custom_state.is_some() {
                entry.custom_state = patch.custom_state;
            }
            entry.timestamp = Some(now);
        });
    }

    pub fn page_state(&self, path: &str) -> Option<PageState> {
        self.pages.with(|pages| pages.get(path).cloned())
    }

    pub fn clear_page_state(&self, path: &str) {
        self.pages.update(|pages| {
            pages.remove(path);
        });
    }

    pub fn clear_all(&self) {
        self.pages.set(HashMap::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let cache = PageCache::default();
        cache.set_page_state(
            "/users",
            PageState {
                scroll_y: Some(320.0),
                ..Default::default()
            },
        );
        cache.set_page_state(
            "/users",
            PageState {
                form_data: Some(object(json!({"keyword": "zhang"}))),
                ..Default::default()
            },
        );

        let state = cache.page_state("/users").unwrap();
        assert_eq!(state.scroll_y, Some(320.0));
        assert_eq!(state.form_data.unwrap()["keyword"], "zhang");
        assert!(state.timestamp.is_some());
    }

    #[test]
    fn test_clear() {
        let cache = PageCache::default();
        cache.set_page_state("/a", PageState::default());
        cache.set_page_state("/b", PageState::default());

        cache.clear_page_state("/a");
        assert!(cache.page_state("/a").is_none());
        assert!(cache.page_state("/b").is_some());

        cache.clear_all();
        assert!(cache.page_state("/b").is_none());
    }
}
