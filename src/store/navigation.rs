use crate::store::Observable;

/// 页面切换中的目标路径与提示文案
#[derive(Clone, Default)]
pub struct NavigationStore {
    pub pending: Observable<Option<String>>,
    pub label: Observable<Option<String>>,
}

impl NavigationStore {
    pub fn start_navigation(&self, path: &str, label: Option<&str>) {
        self.pending.set(Some(path.to_owned()));
        self.label.set(label.map(str::to_owned));
    }

    pub fn finish_navigation(&self) {
        self.pending.set(None);
        self.label.set(None);
    }

    pub fn is_navigating(&self) -> bool {
        self.pending.with(Option::is_some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_finish() {
        let nav = NavigationStore::default();
        nav.start_navigation("/users", Some("用户管理"));
        assert!(nav.is_navigating());
        assert_eq!(nav.label.get().as_deref(), Some("用户管理"));

        nav.finish_navigation();
        assert!(!nav.is_navigating());
        assert_eq!(nav.label.get(), None);
    }
}
