//! 业务接口：把 HTTP 请求转给 Mock API，响应信封原样返回。

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::mock::{ApiResponse, Paginated, PaginationParams};
use crate::model::{
    CalendarEvent, ChartDataPoint, DashboardStats, Document, FileItem, MenuItem, Message,
    Notification, Task, TaskStatus, User, UserPatch,
};
use crate::policy;
use crate::server::auth::AuthUser;
use crate::server::extract::{ApiJson, ApiQuery};
use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub name: String,
    pub version: &'static str,
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        name: state.config.app.name.clone(),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// 首字母大写后问候
pub async fn hello(Path(name): Path<String>) -> String {
    let mut chars = name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    format!("Hello, {capitalized}!")
}

/// 当前用户可见的侧边栏菜单
pub async fn menu(Extension(auth): Extension<AuthUser>) -> ApiResponse<Vec<MenuItem>> {
    ApiResponse::success(policy::visible_menu(auth.user.permissions()))
}

// ── 用户 ──

pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResponse<Paginated<User>> {
    state.api.list_users(&params).await
}

pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse<User> {
    state.api.get_user(&id).await
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResponse<User> {
    state.api.create_user(patch).await
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResponse<User> {
    state.api.update_user(&id, patch).await
}

pub async fn delete_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse<()> {
    let resp = state.api.delete_user(&id).await;
    if resp.is_success() {
        tracing::info!("已删除用户 {id}");
    }
    resp
}

// ── 仪表盘 ──

pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResponse<DashboardStats> {
    state.api.dashboard_stats().await
}

pub async fn visit_data(State(state): State<AppState>) -> ApiResponse<Vec<ChartDataPoint>> {
    state.api.visit_data().await
}

pub async fn sales_data(State(state): State<AppState>) -> ApiResponse<Vec<ChartDataPoint>> {
    state.api.sales_data().await
}

pub async fn traffic_data(State(state): State<AppState>) -> ApiResponse<Vec<ChartDataPoint>> {
    state.api.traffic_data().await
}

pub async fn recent_users(State(state): State<AppState>) -> ApiResponse<Vec<User>> {
    state.api.recent_users().await
}

// ── 工作台 ──

pub async fn notifications(State(state): State<AppState>) -> ApiResponse<Vec<Notification>> {
    state.api.notifications().await
}

pub async fn unread_count(State(state): State<AppState>) -> ApiResponse<usize> {
    state.api.unread_count().await
}

pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<()> {
    state.api.mark_notification_read(&id).await
}

pub async fn mark_all_notifications_read(State(state): State<AppState>) -> ApiResponse<()> {
    state.api.mark_all_notifications_read().await
}

pub async fn tasks(State(state): State<AppState>) -> ApiResponse<Vec<Task>> {
    state.api.tasks().await
}

#[derive(Deserialize)]
pub struct TaskStatusForm {
    pub status: TaskStatus,
}

pub async fn update_task_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(form): ApiJson<TaskStatusForm>,
) -> ApiResponse<Task> {
    state.api.update_task_status(&id, form.status).await
}

pub async fn calendar_events(State(state): State<AppState>) -> ApiResponse<Vec<CalendarEvent>> {
    state.api.calendar_events().await
}

pub async fn messages(State(state): State<AppState>) -> ApiResponse<Vec<Message>> {
    state.api.messages().await
}

// ── 文档与文件 ──

pub async fn list_documents(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResponse<Paginated<Document>> {
    state.api.list_documents(&params).await
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResponse<Document> {
    state.api.get_document(&id).await
}

pub async fn list_files(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> ApiResponse<Paginated<FileItem>> {
    state.api.list_files(&params).await
}
