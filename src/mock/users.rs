use chrono::Utc;
use std::cmp::Reverse;

use crate::error::ApiError;
use crate::mock::data::demo_user;
use crate::mock::envelope::{ApiResponse, Paginated, PaginationParams, SortOrder, paginate};
use crate::mock::{MockApi, latency};
use crate::model::{User, UserPatch};
use crate::policy;

impl MockApi {
    /// 按姓名/邮箱搜索，按字段排序后分页
    pub async fn list_users(&self, params: &PaginationParams) -> ApiResponse<Paginated<User>> {
        self.delay(latency::LIST).await;

        let mut users = self.data.read().await.users.clone();
        if let Some(keyword) = params.keyword() {
            users.retain(|u| {
                u.name.to_lowercase().contains(&keyword)
                    || u.email.to_lowercase().contains(&keyword)
            });
        }

        // 稳定排序，相同键保持原有顺序
        match params.sort_order {
            SortOrder::Asc => users.sort_by_cached_key(|u| u.sort_key(&params.sort_by)),
            SortOrder::Desc => users.sort_by_cached_key(|u| Reverse(u.sort_key(&params.sort_by))),
        }

        ApiResponse::success(paginate(users, params.page, params.page_size))
    }

    pub async fn get_user(&self, id: &str) -> ApiResponse<User> {
        self.delay(latency::READ).await;
        let data = self.data.read().await;
        data.users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(ApiError::UserNotFound)
            .into()
    }

    /// 未给出的字段取演示账号的值，新用户排在最前
    pub async fn create_user(&self, patch: UserPatch) -> ApiResponse<User> {
        self.delay(latency::LIST).await;

        let mut user = User {
            id: format!("user-{}", ulid::Ulid::new().to_string().to_lowercase()),
            created_at: Utc::now(),
            last_login_at: None,
            ..demo_user()
        };
        if let Err(e) = apply_patch(&mut user, patch) {
            return ApiResponse::error(e);
        }

        self.data.write().await.users.insert(0, user.clone());
        tracing::debug!("Mock 用户已创建：{}", user.id);
        ApiResponse::success(user)
    }

    pub async fn update_user(&self, id: &str, patch: UserPatch) -> ApiResponse<User> {
        self.delay(latency::LIST).await;

        let mut data = self.data.write().await;
        let Some(user) = data.users.iter_mut().find(|u| u.id == id) else {
            return ApiResponse::error(ApiError::UserNotFound);
        };
        apply_patch(user, patch).map(|()| user.clone()).into()
    }

    pub async fn delete_user(&self, id: &str) -> ApiResponse<()> {
        self.delay(latency::READ).await;

        let mut data = self.data.write().await;
        let Some(index) = data.users.iter().position(|u| u.id == id) else {
            return ApiResponse::error(ApiError::UserNotFound);
        };
        data.users.remove(index);
        ApiResponse::success(())
    }
}

/// 先校验角色再写入，失败时用户保持不变
fn apply_patch(user: &mut User, patch: UserPatch) -> Result<(), ApiError> {
    let role = match patch.role_id.as_deref() {
        Some(id) => Some(policy::role_by_id(id).ok_or(ApiError::RoleNotFound)?.clone()),
        None => None,
    };

    if let Some(name) = patch.name {
        user.name = name;
    }
    if let Some(email) = patch.email {
        user.email = email;
    }
    if patch.phone.is_some() {
        user.phone = patch.phone;
    }
    if patch.avatar.is_some() {
        user.avatar = patch.avatar;
    }
    if let Some(role) = role {
        user.role = role;
    }
    if let Some(status) = patch.status {
        user.status = status;
    }
    if patch.department.is_some() {
        user.department = patch.department;
    }
    if patch.position.is_some() {
        user.position = patch.position;
    }
    Ok(())
}
