use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::mock::data::demo_user;
use crate::mock::envelope::ApiResponse;
use crate::mock::{MockApi, latency};
use crate::model::{AuthResponse, LoginRequest, RegisterRequest, User};

/// 只带一条提示文案的响应数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub message: String,
}

const MIN_PASSWORD_LEN: usize = 6;

impl MockApi {
    /// 演示账号直接登录；其它邮箱只要密码不少于 6 位即视为登录成功
    pub async fn login(&self, req: &LoginRequest) -> ApiResponse<AuthResponse> {
        self.delay(latency::AUTH).await;

        let user = if req.email == self.auth.demo_email && req.password == self.auth.demo_password {
            User {
                last_login_at: Some(Utc::now()),
                ..demo_user()
            }
        } else if !req.email.is_empty() && req.password.chars().count() >= MIN_PASSWORD_LEN {
            let name = req.email.split('@').next().unwrap_or_default().to_owned();
            derived_user(&req.email, name)
        } else {
            return ApiResponse::error(ApiError::InvalidCredentials);
        };

        ApiResponse::success(self.issue(user, req.remember))
    }

    pub async fn register(&self, req: &RegisterRequest) -> ApiResponse<AuthResponse> {
        self.delay(latency::AUTH).await;

        if req.password != req.confirm_password {
            return ApiResponse::error(ApiError::PasswordMismatch);
        }

        let user = derived_user(&req.email, req.name.clone());
        ApiResponse::success(self.issue(user, false))
    }

    pub async fn forgot_password(&self, email: &str) -> ApiResponse<Notice> {
        self.delay(latency::AUTH).await;
        ApiResponse::success(Notice {
            message: format!("重置密码链接已发送到 {email}"),
        })
    }

    pub async fn reset_password(&self, _token: &str, _password: &str) -> ApiResponse<Notice> {
        self.delay(latency::AUTH).await;
        ApiResponse::success(Notice {
            message: "密码重置成功".to_owned(),
        })
    }

    pub async fn logout(&self) -> ApiResponse<()> {
        self.delay(latency::SMALL_WRITE).await;
        ApiResponse::success(())
    }

    pub async fn current_user(&self) -> ApiResponse<User> {
        self.delay(latency::READ).await;
        ApiResponse::success(demo_user())
    }

    fn issue(&self, user: User, remember: bool) -> AuthResponse {
        let days = if remember {
            self.auth.remember_expires_days
        } else {
            self.auth.token_expires_days
        };
        let nonce = ulid::Ulid::new().to_string().to_lowercase();
        AuthResponse {
            user,
            token: format!("mock-token-{nonce}"),
            refresh_token: Some(format!("mock-refresh-{nonce}")),
            expires_in: (days.max(0) as u64) * 24 * 60 * 60,
        }
    }
}

/// 以演示账号为模板派生的新用户
fn derived_user(email: &str, name: String) -> User {
    User {
        id: format!("user-{}", ulid::Ulid::new().to_string().to_lowercase()),
        email: email.to_owned(),
        name,
        created_at: Utc::now(),
        ..demo_user()
    }
}
