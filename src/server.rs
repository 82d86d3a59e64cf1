pub mod auth;
pub mod cleanup;
pub mod extract;
pub mod handlers;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::mock::ApiResponse;
use crate::state::AppState;

/// HTTP 状态码与信封 code 一致
impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/hello/{name}", get(handlers::hello))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/forgot-password", post(auth::forgot_password))
        .route("/api/auth/reset-password", post(auth::reset_password));

    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/menu", get(handlers::menu))
        // 用户
        .route(
            "/api/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        // 仪表盘
        .route("/api/dashboard/stats", get(handlers::dashboard_stats))
        .route("/api/dashboard/visits", get(handlers::visit_data))
        .route("/api/dashboard/sales", get(handlers::sales_data))
        .route("/api/dashboard/traffic", get(handlers::traffic_data))
        .route("/api/dashboard/recent-users", get(handlers::recent_users))
        // 工作台
        .route("/api/notifications", get(handlers::notifications))
        .route(
            "/api/notifications/unread-count",
            get(handlers::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::mark_all_notifications_read),
        )
        .route(
            "/api/notifications/{id}/read",
            post(handlers::mark_notification_read),
        )
        .route("/api/tasks", get(handlers::tasks))
        .route("/api/tasks/{id}/status", put(handlers::update_task_status))
        .route("/api/calendar/events", get(handlers::calendar_events))
        .route("/api/messages", get(handlers::messages))
        // 文档与文件
        .route("/api/documents", get(handlers::list_documents))
        .route("/api/documents/{id}", get(handlers::get_document))
        .route("/api/files", get(handlers::list_files))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    let mut app = Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.server.cors_origins) {
        app = app.layer(cors);
    }

    app.with_state(state)
}

/// 携带 Cookie 的跨域请求不能使用通配来源
fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("忽略无效的 CORS 来源：{o}");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::mock::data::demo_user;
    use crate::mock::test_api;
    use crate::model::User;
    use crate::policy::{keys, role_by_id};
    use axum::body::Body;
    use axum::http::Request;
    use chrono::Duration;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::with_api(AppConfig::default(), test_api())
    }

    async fn send(state: &AppState, req: Request<Body>) -> (StatusCode, Value, Option<String>) {
        let resp = router(state.clone()).oneshot(req).await.unwrap();
        let status = resp.status();
        let cookie = resp
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body, cookie)
    }

    fn get_with_token(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn session_for(state: &AppState, role: &str) -> String {
        let user = User {
            role: role_by_id(role).unwrap().clone(),
            ..demo_user()
        };
        let token = format!("test-{role}");
        state.sessions.insert(&token, user, Duration::days(1)).await;
        token
    }

    #[tokio::test]
    async fn test_health_and_hello() {
        let state = state();
        let (status, body, _) = send(
            &state,
            Request::get("/api/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let resp = router(state)
            .oneshot(Request::get("/api/hello/world").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Hello, World!");
    }

    #[tokio::test]
    async fn test_protected_requires_login() {
        let state = state();
        let (status, body, _) = send(
            &state,
            Request::get("/api/users").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], 401);
        assert_eq!(body["message"], "未登录或登录已过期");
        assert_eq!(body["data"], Value::Null);

        let (status, _, _) = send(&state, get_with_token("/api/users", "bogus")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_login_sets_cookie_and_session() {
        let state = state();
        let req = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"email": "admin@halolight.h7ml.cn", "password": "123456"}).to_string(),
            ))
            .unwrap();
        let (status, body, cookie) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        let token = body["data"]["token"].as_str().unwrap().to_owned();
        let cookie = cookie.unwrap();
        assert!(cookie.starts_with(&format!("{}={token}; HttpOnly", keys::TOKEN)));
        assert!(cookie.contains("Max-Age=604800"));

        // Cookie 与 Bearer 均可访问
        let req = Request::get("/api/auth/me")
            .header(header::COOKIE, format!("{}={token}", keys::TOKEN))
            .body(Body::empty())
            .unwrap();
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["email"], "admin@halolight.h7ml.cn");

        let req = Request::post("/api/auth/logout")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, cookie) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(cookie.unwrap().contains("Max-Age=0"));
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_login_failure_has_no_cookie() {
        let state = state();
        let req = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"email": "a@b.c", "password": "1"}).to_string()))
            .unwrap();
        let (status, body, cookie) = send(&state, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "邮箱或密码错误");
        assert!(cookie.is_none());
        assert_eq!(state.sessions.len().await, 0);
    }

    #[tokio::test]
    async fn test_malformed_input_returns_envelope() {
        let state = state();
        let req = Request::post("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body, cookie) = send(&state, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert!(!body["message"].as_str().unwrap().is_empty());
        assert_eq!(body["data"], Value::Null);
        assert!(cookie.is_none());

        let token = session_for(&state, "admin").await;
        let (status, body, _) = send(&state, get_with_token("/api/users?page=abc", &token)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], 400);
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_viewer_forbidden_from_users() {
        let state = state();
        let token = session_for(&state, "viewer").await;

        let (status, body, _) = send(&state, get_with_token("/api/users", &token)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "没有权限访问该资源");

        let (status, body, _) = send(&state, get_with_token("/api/documents", &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 15);
    }

    #[tokio::test]
    async fn test_menu_follows_permissions() {
        let state = state();
        let admin = session_for(&state, "admin").await;
        let viewer = session_for(&state, "viewer").await;

        let (_, full, _) = send(&state, get_with_token("/api/menu", &admin)).await;
        let (_, limited, _) = send(&state, get_with_token("/api/menu", &viewer)).await;
        let full = full["data"].as_array().unwrap().len();
        let limited = limited["data"].as_array().unwrap().len();
        assert!(limited < full);
    }

    #[tokio::test]
    async fn test_user_crud_over_http() {
        let state = state();
        let token = session_for(&state, "admin").await;

        let (status, body, _) = send(
            &state,
            get_with_token("/api/users?page=2&pageSize=5&search=", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["page"], 2);
        assert_eq!(body["data"]["list"].as_array().unwrap().len(), 5);

        let (status, body, _) = send(&state, get_with_token("/api/users/nope", &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "用户不存在");

        let req = Request::post("/api/users")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"name": "新用户", "email": "new@example.com"}).to_string(),
            ))
            .unwrap();
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        let id = body["data"]["id"].as_str().unwrap().to_owned();

        let req = Request::delete(format!("/api/users/{id}"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, _, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_task_status_update() {
        let state = state();
        let token = session_for(&state, "manager").await;
        let (_, body, _) = send(&state, get_with_token("/api/tasks", &token)).await;
        let id = body["data"][0]["id"].as_str().unwrap().to_owned();

        let req = Request::put(format!("/api/tasks/{id}/status"))
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"status": "completed"}).to_string()))
            .unwrap();
        let (status, body, _) = send(&state, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");
    }

    #[test]
    fn test_cors_layer_skips_invalid_origins() {
        assert!(cors_layer(&[]).is_none());
        assert!(cors_layer(&["bad\norigin".to_owned()]).is_none());
        assert!(cors_layer(&["http://localhost:3000".to_owned()]).is_some());
    }
}
