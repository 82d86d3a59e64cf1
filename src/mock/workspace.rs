//! 通知、任务、日程与站内消息

use crate::error::ApiError;
use crate::mock::envelope::ApiResponse;
use crate::mock::{MockApi, latency};
use crate::model::{CalendarEvent, Message, Notification, Task, TaskStatus};

impl MockApi {
    pub async fn notifications(&self) -> ApiResponse<Vec<Notification>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.notifications.clone())
    }

    /// 不存在的通知同样返回成功
    pub async fn mark_notification_read(&self, id: &str) -> ApiResponse<()> {
        self.delay(latency::SMALL_WRITE).await;
        let mut data = self.data.write().await;
        if let Some(n) = data.notifications.iter_mut().find(|n| n.id == id) {
            n.read = true;
        }
        ApiResponse::success(())
    }

    pub async fn mark_all_notifications_read(&self) -> ApiResponse<()> {
        self.delay(latency::SMALL_WRITE).await;
        let mut data = self.data.write().await;
        for n in &mut data.notifications {
            n.read = true;
        }
        ApiResponse::success(())
    }

    pub async fn unread_count(&self) -> ApiResponse<usize> {
        self.delay(latency::COUNT).await;
        let data = self.data.read().await;
        ApiResponse::success(data.notifications.iter().filter(|n| !n.read).count())
    }

    pub async fn tasks(&self) -> ApiResponse<Vec<Task>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.tasks.clone())
    }

    pub async fn update_task_status(&self, id: &str, status: TaskStatus) -> ApiResponse<Task> {
        self.delay(latency::SMALL_WRITE).await;
        let mut data = self.data.write().await;
        let Some(task) = data.tasks.iter_mut().find(|t| t.id == id) else {
            return ApiResponse::error(ApiError::TaskNotFound);
        };
        task.status = status;
        ApiResponse::success(task.clone())
    }

    pub async fn calendar_events(&self) -> ApiResponse<Vec<CalendarEvent>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.events.clone())
    }

    pub async fn messages(&self) -> ApiResponse<Vec<Message>> {
        self.delay(latency::READ).await;
        ApiResponse::success(self.data.read().await.messages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::test_api;

    #[tokio::test]
    async fn test_mark_read_updates_count() {
        let api = test_api();
        let list = api.notifications().await.data.unwrap();
        assert_eq!(list.len(), 10);
        let unread = list.iter().filter(|n| !n.read).count();
        assert_eq!(api.unread_count().await.data, Some(unread));

        if let Some(first) = list.iter().find(|n| !n.read) {
            api.mark_notification_read(&first.id).await;
            assert_eq!(api.unread_count().await.data, Some(unread - 1));
        }

        assert!(api.mark_notification_read("missing").await.is_success());
        api.mark_all_notifications_read().await;
        assert_eq!(api.unread_count().await.data, Some(0));
    }

    #[tokio::test]
    async fn test_update_task_status() {
        let api = test_api();
        let id = api.tasks().await.data.unwrap()[0].id.clone();
        let task = api
            .update_task_status(&id, TaskStatus::Completed)
            .await
            .data
            .unwrap();
        assert_eq!(task.status, TaskStatus::Completed);

        let missing = api.update_task_status("nope", TaskStatus::Pending).await;
        assert_eq!(missing.code, 404);
        assert_eq!(missing.message, "任务不存在");
    }

    #[tokio::test]
    async fn test_events_and_messages() {
        let api = test_api();
        let events = api.calendar_events().await.data.unwrap();
        assert_eq!(events.len(), 5);
        assert!(events.iter().all(|e| e.end > e.start));

        let messages = api.messages().await.data.unwrap();
        assert_eq!(messages.len(), 6);
        assert!(messages.iter().all(|m| m.receiver.id == "demo-user-001"));
    }
}
