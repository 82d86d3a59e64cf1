//! 登录、注册、退出等跨 store 的流程：表单校验、加载状态、错误提示与消息提示。

use crate::error::ApiFailure;
use crate::format::password_strength;
use crate::mock::MockApi;
use crate::model::{LoginRequest, RegisterRequest};
use crate::policy::keys;
use crate::store::{AppStores, NewToast};

const MIN_REGISTER_STRENGTH: u8 = 2;

fn invalid(message: &str) -> ApiFailure {
    ApiFailure {
        code: 400,
        message: message.to_owned(),
    }
}

impl AppStores {
    pub async fn login(&self, api: &MockApi, req: LoginRequest) -> Result<(), ApiFailure> {
        self.auth.error.set(None);
        if req.email.is_empty() || req.password.is_empty() {
            return Err(self.fail(invalid("请填写邮箱和密码")));
        }

        self.auth.loading.set(true);
        let result = api.login(&req).await.into_result();
        self.auth.loading.set(false);

        match result {
            Ok(Some(auth)) => {
                if let Some(refresh) = &auth.refresh_token {
                    self.host.storage.set(keys::REFRESH_TOKEN, refresh);
                }
                tracing::info!("用户 {} 登录成功", auth.user.email);
                self.auth.set_auth_state(auth.user, auth.token, req.remember);
                self.toasts.show_toast(NewToast::success("登录成功"));
                Ok(())
            }
            Ok(None) => Err(self.fail(invalid("登录失败"))),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn register(&self, api: &MockApi, req: RegisterRequest) -> Result<(), ApiFailure> {
        self.auth.error.set(None);
        if req.name.is_empty()
            || req.email.is_empty()
            || req.password.is_empty()
            || req.confirm_password.is_empty()
        {
            return Err(self.fail(invalid("请填写所有必填字段")));
        }
        if req.password != req.confirm_password {
            return Err(self.fail(invalid("两次输入的密码不一致")));
        }
        if password_strength(&req.password) < MIN_REGISTER_STRENGTH {
            return Err(self.fail(invalid("密码强度太弱，请设置更复杂的密码")));
        }

        self.auth.loading.set(true);
        let result = api.register(&req).await.into_result();
        self.auth.loading.set(false);

        match result {
            Ok(Some(auth)) => {
                self.auth.set_auth_state(auth.user, auth.token, false);
                self.toasts
                    .show_toast(NewToast::success("注册成功").message("欢迎加入！"));
                Ok(())
            }
            Ok(None) => Err(self.fail(invalid("注册失败"))),
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn forgot_password(&self, api: &MockApi, email: &str) -> Result<(), ApiFailure> {
        if email.is_empty() {
            return Err(self.fail(invalid("请输入邮箱地址")));
        }
        api.forgot_password(email).await.into_result()?;
        self.toasts
            .show_toast(NewToast::success("发送成功").message("请查收邮件"));
        Ok(())
    }

    pub async fn reset_password(
        &self,
        api: &MockApi,
        token: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), ApiFailure> {
        if password.is_empty() || confirm_password.is_empty() {
            return Err(self.fail(invalid("请填写所有字段")));
        }
        if password != confirm_password {
            return Err(self.fail(invalid("两次输入的密码不一致")));
        }
        if password_strength(password) < MIN_REGISTER_STRENGTH {
            return Err(self.fail(invalid("密码强度太弱，请设置更复杂的密码")));
        }

        api.reset_password(token, password).await.into_result()?;
        self.toasts
            .show_toast(NewToast::success("重置成功").message("请使用新密码登录"));
        Ok(())
    }

    /// 清除登录态、标签页与页面缓存
    pub async fn logout(&self, api: &MockApi) {
        if let Err(e) = api.logout().await.into_result() {
            tracing::warn!("退出登录请求失败：{e}");
        }
        self.auth.clear_auth_state();
        self.host.storage.remove(keys::REFRESH_TOKEN);
        self.tabs.close_all_tabs();
        self.page_cache.clear_all();
    }

    fn fail(&self, failure: ApiFailure) -> ApiFailure {
        self.auth.error.set(Some(failure.message.clone()));
        failure
    }
}
