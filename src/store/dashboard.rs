use crate::model::{DashboardLayouts, DashboardWidget};
use crate::policy::{self, keys};
use crate::store::{Host, Observable};

/// 仪表盘组件与布局
#[derive(Clone)]
pub struct DashboardStore {
    pub widgets: Observable<Vec<DashboardWidget>>,
    pub layouts: Observable<DashboardLayouts>,
    pub editing: Observable<bool>,
    host: Host,
}

impl DashboardStore {
    pub fn new(host: Host) -> Self {
        Self {
            widgets: Observable::new(policy::default_widgets()),
            layouts: Observable::new(policy::default_layouts()),
            editing: Observable::new(false),
            host,
        }
    }

    pub fn init(&self) {
        if let Some(widgets) = self.host.storage.get(keys::DASHBOARD_WIDGETS) {
            self.widgets.set(widgets);
        }
        if let Some(layouts) = self.host.storage.get(keys::DASHBOARD_LAYOUTS) {
            self.layouts.set(layouts);
        }
    }

    pub fn update_layouts(&self, layouts: DashboardLayouts) {
        self.host.storage.set(keys::DASHBOARD_LAYOUTS, &layouts);
        self.layouts.set(layouts);
    }

    pub fn toggle_widget_visibility(&self, widget_id: &str) {
        self.widgets.update(|widgets| {
            for w in widgets.iter_mut().filter(|w| w.id == widget_id) {
                w.visible = !w.visible;
            }
        });
        self.host
            .storage
            .set(keys::DASHBOARD_WIDGETS, &self.widgets.get());
    }

    pub fn set_editing(&self, editing: bool) {
        self.editing.set(editing);
    }

    pub fn reset(&self) {
        self.widgets.set(policy::default_widgets());
        self.layouts.set(policy::default_layouts());
        self.host.storage.remove(keys::DASHBOARD_WIDGETS);
        self.host.storage.remove(keys::DASHBOARD_LAYOUTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visible(store: &DashboardStore, id: &str) -> bool {
        store
            .widgets
            .with(|ws| ws.iter().find(|w| w.id == id).map(|w| w.visible))
            .unwrap()
    }

    #[test]
    fn test_toggle_and_reset() {
        let host = Host::in_memory();
        let store = DashboardStore::new(host.clone());

        store.toggle_widget_visibility("chart-pie");
        assert!(!visible(&store, "chart-pie"));
        assert!(visible(&store, "stats"));
        assert!(
            host.storage
                .get::<Vec<DashboardWidget>>(keys::DASHBOARD_WIDGETS)
                .is_some()
        );

        store.reset();
        assert!(visible(&store, "chart-pie"));
        assert!(
            host.storage
                .get::<Vec<DashboardWidget>>(keys::DASHBOARD_WIDGETS)
                .is_none()
        );
    }

    #[test]
    fn test_layouts_persist() {
        let host = Host::in_memory();
        let store = DashboardStore::new(host.clone());
        let mut layouts = policy::default_layouts();
        layouts.lg[0].w = 6;
        store.update_layouts(layouts.clone());

        let reloaded = DashboardStore::new(host);
        reloaded.init();
        assert_eq!(reloaded.layouts.get(), layouts);
    }

    #[test]
    fn test_unknown_widget_is_ignored() {
        let store = DashboardStore::new(Host::in_memory());
        store.toggle_widget_visibility("nope");
        assert!(store.widgets.with(|ws| ws.iter().all(|w| w.visible)));
    }
}
