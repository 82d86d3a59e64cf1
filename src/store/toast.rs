use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::Observable;

pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    /// 毫秒，0 表示不自动关闭
    pub duration: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewToast {
    pub kind: ToastKind,
    pub title: String,
    pub message: Option<String>,
    pub duration: Option<u64>,
}

impl NewToast {
    pub fn new(kind: ToastKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: None,
            duration: None,
        }
    }

    pub fn success(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, title)
    }

    pub fn error(title: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, title)
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn duration(mut self, ms: u64) -> Self {
        self.duration = Some(ms);
        self
    }
}

/// 消息提示队列，到期自动移除
#[derive(Clone, Default)]
pub struct ToastStore {
    pub toasts: Observable<Vec<Toast>>,
}

impl ToastStore {
    /// 返回新提示的 id；自动移除需要 tokio 运行时
    pub fn show_toast(&self, toast: NewToast) -> String {
        let id = ulid::Ulid::new().to_string().to_lowercase();
        let duration = toast.duration.unwrap_or(DEFAULT_TOAST_DURATION_MS);

        self.toasts.update(|list| {
            list.push(Toast {
                id: id.clone(),
                kind: toast.kind,
                title: toast.title,
                message: toast.message,
                duration: Some(duration),
            });
        });

        if duration > 0 {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let store = self.clone();
                    let toast_id = id.clone();
                    handle.spawn(async move {
                        tokio::time::sleep(Duration::from_millis(duration)).await;
                        store.remove_toast(&toast_id);
                    });
                }
                Err(_) => {
                    tracing::warn!("没有可用的异步运行时，提示 {id} 不会自动关闭");
                }
            }
        }

        id
    }

    pub fn remove_toast(&self, id: &str) {
        if self.toasts.with(|list| list.iter().any(|t| t.id == id)) {
            self.toasts.update(|list| list.retain(|t| t.id != id));
        }
    }

    pub fn clear(&self) {
        self.toasts.set(Vec::new());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_auto_remove_after_duration() {
        let store = ToastStore::default();
        let id = store.show_toast(NewToast::success("保存成功"));
        assert_eq!(store.toasts.get().len(), 1);
        assert_eq!(store.toasts.get()[0].duration, Some(DEFAULT_TOAST_DURATION_MS));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(store.toasts.get().len(), 1);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(store.toasts.with(|l| l.iter().all(|t| t.id != id)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_duration_is_sticky() {
        let store = ToastStore::default();
        store.show_toast(NewToast::error("网络错误").duration(0));
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(store.toasts.get().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_is_idempotent() {
        let store = ToastStore::default();
        let id = store.show_toast(NewToast::new(ToastKind::Info, "提示").message("内容"));
        store.remove_toast(&id);
        store.remove_toast(&id);
        assert!(store.toasts.get().is_empty());

        // 手动移除后定时任务到期也不报错
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(store.toasts.get().is_empty());
    }

    #[test]
    fn test_without_runtime_keeps_toast() {
        let store = ToastStore::default();
        store.show_toast(NewToast::success("ok"));
        assert_eq!(store.toasts.get().len(), 1);
    }
}
