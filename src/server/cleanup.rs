use crate::state::AppState;

/// 启动后台定时任务：每小时清理过期会话
pub fn spawn_session_cleanup(state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            let rows = state.sessions.purge_expired(chrono::Utc::now()).await;
            if rows > 0 {
                tracing::info!("已清理 {} 个过期会话", rows);
            }
        }
    });
}
