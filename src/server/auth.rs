use axum::extract::{MatchedPath, Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE, SET_COOKIE};
use axum::http::{HeaderValue, Method};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Extension;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::ApiError;
use crate::mock::{ApiResponse, Notice};
use crate::model::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::permission::{Permission, has_permission};
use crate::policy::keys;
use crate::server::extract::ApiJson;
use crate::state::AppState;

// ── 会话 ──

#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

/// 内存中的服务端会话表
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub async fn insert(&self, token: &str, user: User, ttl: Duration) {
        let session = Session {
            user,
            expires_at: Utc::now() + ttl,
        };
        self.inner.write().await.insert(token.to_owned(), session);
    }

    /// 已过期的会话视为不存在
    pub async fn get(&self, token: &str) -> Option<Session> {
        self.get_at(token, Utc::now()).await
    }

    pub async fn get_at(&self, token: &str, now: DateTime<Utc>) -> Option<Session> {
        self.inner
            .read()
            .await
            .get(token)
            .filter(|s| s.expires_at > now)
            .cloned()
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.inner.write().await.remove(token).is_some()
    }

    /// 返回清理掉的会话数
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.inner.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| s.expires_at > now);
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

/// 认证中间件注入的当前用户
#[derive(Clone)]
pub struct AuthUser {
    pub token: String,
    pub user: User,
}

#[derive(Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordForm {
    pub token: String,
    pub password: String,
}

// ── 路由处理 ──

pub async fn login(State(state): State<AppState>, ApiJson(req): ApiJson<LoginRequest>) -> Response {
    let resp = state.api.login(&req).await;
    start_session(&state, resp, req.remember).await
}

pub async fn register(State(state): State<AppState>, ApiJson(req): ApiJson<RegisterRequest>) -> Response {
    let resp = state.api.register(&req).await;
    start_session(&state, resp, false).await
}

/// 登录成功时记录会话并写入 Cookie，失败时原样返回信封
async fn start_session(state: &AppState, resp: ApiResponse<AuthResponse>, remember: bool) -> Response {
    if !resp.is_success() {
        return resp.into_response();
    }
    let Some(auth) = resp.data.clone() else {
        return resp.into_response();
    };

    let config = &state.config.auth;
    let days = if remember {
        config.remember_expires_days
    } else {
        config.token_expires_days
    };
    state
        .sessions
        .insert(&auth.token, auth.user.clone(), Duration::days(days))
        .await;
    tracing::info!("用户 {} 登录，会话有效期 {} 天", auth.user.email, days);

    let cookie = build_cookie(
        keys::TOKEN,
        &auth.token,
        days * 24 * 60 * 60,
        &config.cookie_path,
        state.is_https,
    );
    let mut resp = resp.into_response();
    if let Ok(val) = HeaderValue::from_str(&cookie) {
        resp.headers_mut().insert(SET_COOKIE, val);
    }
    resp
}

pub async fn logout(State(state): State<AppState>, Extension(auth): Extension<AuthUser>) -> Response {
    if state.sessions.remove(&auth.token).await {
        tracing::info!("用户 {} 已退出登录", auth.user.email);
    }

    let clear_cookie = build_cookie(
        keys::TOKEN,
        "",
        0,
        &state.config.auth.cookie_path,
        state.is_https,
    );
    let mut resp = state.api.logout().await.into_response();
    if let Ok(val) = HeaderValue::from_str(&clear_cookie) {
        resp.headers_mut().insert(SET_COOKIE, val);
    }
    resp
}

/// 当前会话对应的用户
pub async fn me(Extension(auth): Extension<AuthUser>) -> ApiResponse<User> {
    ApiResponse::success(auth.user)
}

pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ForgotPasswordForm>,
) -> ApiResponse<Notice> {
    state.api.forgot_password(&form.email).await
}

pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(form): ApiJson<ResetPasswordForm>,
) -> ApiResponse<Notice> {
    state.api.reset_password(&form.token, &form.password).await
}

// ── 认证中间件 ──

pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = extract_token_from_request(&req, keys::TOKEN) else {
        return ApiResponse::<()>::error(ApiError::Unauthorized).into_response();
    };
    let Some(session) = state.sessions.get(&token).await else {
        return ApiResponse::<()>::error(ApiError::Unauthorized).into_response();
    };

    if let Some(path) = req.extensions().get::<MatchedPath>()
        && let Some(required) = api_permission(req.method(), path.as_str())
        && !has_permission(session.user.permissions(), required)
    {
        tracing::debug!(
            "用户 {} 缺少权限 {required}：{} {}",
            session.user.email,
            req.method(),
            path.as_str()
        );
        return ApiResponse::<()>::error(ApiError::Forbidden).into_response();
    }

    req.extensions_mut().insert(AuthUser {
        token,
        user: session.user,
    });
    next.run(req).await
}

/// 受保护接口所需的权限，未列出的接口只要求登录
pub fn api_permission(method: &Method, path: &str) -> Option<Permission> {
    use Permission::*;

    let permission = match (method.as_str(), path) {
        ("GET", "/api/users" | "/api/users/{id}") => UsersView,
        ("POST", "/api/users") => UsersCreate,
        ("PUT", "/api/users/{id}") => UsersEdit,
        ("DELETE", "/api/users/{id}") => UsersDelete,
        ("GET", p) if p.starts_with("/api/dashboard/") => DashboardView,
        ("GET", "/api/tasks") => DashboardView,
        ("PUT", "/api/tasks/{id}/status") => DashboardEdit,
        ("GET", p) if p.starts_with("/api/notifications") => NotificationsView,
        ("POST", p) if p.starts_with("/api/notifications/") => NotificationsView,
        ("GET", "/api/calendar/events") => CalendarView,
        ("GET", "/api/messages") => MessagesView,
        ("GET", "/api/documents" | "/api/documents/{id}") => DocumentsView,
        ("GET", "/api/files") => FilesView,
        _ => return None,
    };
    Some(permission)
}

// ── 辅助函数 ──

pub fn build_cookie(name: &str, value: &str, max_age_secs: i64, path: &str, secure: bool) -> String {
    let secure_flag = if secure { "; Secure" } else { "" };
    format!(
        "{name}={value}; HttpOnly; SameSite=Strict; Path={path}; Max-Age={max_age_secs}{secure_flag}"
    )
}

/// 优先 `Authorization: Bearer`，其次 Cookie
pub fn extract_token_from_request<B>(req: &axum::http::Request<B>, cookie_name: &str) -> Option<String> {
    if let Some(value) = req.headers().get(AUTHORIZATION)
        && let Ok(value) = value.to_str()
        && let Some(token) = value.strip_prefix("Bearer ")
        && !token.trim().is_empty()
    {
        return Some(token.trim().to_owned());
    }

    let header = req.headers().get(COOKIE)?;
    let header_str = header.to_str().ok()?;
    for pair in header_str.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=')
            && name == cookie_name
            && !value.is_empty()
        {
            return Some(value.to_owned());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::data::demo_user;

    #[tokio::test]
    async fn test_session_expiry_and_purge() {
        let store = SessionStore::default();
        store.insert("a", demo_user(), Duration::days(7)).await;
        store.insert("b", demo_user(), Duration::hours(1)).await;

        let later = Utc::now() + Duration::days(1);
        assert!(store.get("b").await.is_some());
        assert!(store.get_at("b", later).await.is_none());
        assert!(store.get_at("a", later).await.is_some());

        assert_eq!(store.purge_expired(later).await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.remove("a").await);
        assert!(!store.remove("a").await);
    }

    #[test]
    fn test_extract_token() {
        let req = axum::http::Request::builder()
            .header(COOKIE, "theme=dark; halolight_token=abc123")
            .body(())
            .unwrap();
        assert_eq!(
            extract_token_from_request(&req, keys::TOKEN).as_deref(),
            Some("abc123")
        );

        // 前缀相同的其它 Cookie 不匹配
        let req = axum::http::Request::builder()
            .header(COOKIE, "halolight_token_old=x")
            .body(())
            .unwrap();
        assert_eq!(extract_token_from_request(&req, keys::TOKEN), None);

        let req = axum::http::Request::builder()
            .header(AUTHORIZATION, "Bearer t-1")
            .header(COOKIE, "halolight_token=cookie")
            .body(())
            .unwrap();
        assert_eq!(
            extract_token_from_request(&req, keys::TOKEN).as_deref(),
            Some("t-1")
        );
    }

    #[test]
    fn test_api_permission_table() {
        assert_eq!(
            api_permission(&Method::DELETE, "/api/users/{id}"),
            Some(Permission::UsersDelete)
        );
        assert_eq!(
            api_permission(&Method::GET, "/api/dashboard/stats"),
            Some(Permission::DashboardView)
        );
        assert_eq!(
            api_permission(&Method::POST, "/api/notifications/{id}/read"),
            Some(Permission::NotificationsView)
        );
        assert_eq!(api_permission(&Method::GET, "/api/menu"), None);
    }

    #[test]
    fn test_build_cookie() {
        let cookie = build_cookie("halolight_token", "t", 60, "/", true);
        assert_eq!(
            cookie,
            "halolight_token=t; HttpOnly; SameSite=Strict; Path=/; Max-Age=60; Secure"
        );
    }
}
