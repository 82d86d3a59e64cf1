use crate::config::AuthConfig;
use crate::model::User;
use crate::permission::{Permission, has_permission};
use crate::policy::keys;
use crate::store::{CookieOptions, Host, Observable};

/// 认证状态
#[derive(Clone)]
pub struct AuthStore {
    pub current_user: Observable<Option<User>>,
    pub token: Observable<Option<String>>,
    pub accounts: Observable<Vec<User>>,
    pub active_account_id: Observable<Option<String>>,
    pub loading: Observable<bool>,
    pub error: Observable<Option<String>>,
    host: Host,
    config: AuthConfig,
}

impl AuthStore {
    pub fn new(host: Host, config: AuthConfig) -> Self {
        Self {
            current_user: Observable::new(None),
            token: Observable::new(None),
            accounts: Observable::new(Vec::new()),
            active_account_id: Observable::new(None),
            loading: Observable::new(false),
            error: Observable::new(None),
            host,
            config,
        }
    }

    /// Cookie 与本地用户同时存在时才恢复登录态
    pub fn init(&self) {
        let token = self.host.cookies.get(keys::TOKEN);
        let user = self.host.storage.get::<User>(keys::USER);

        if let (Some(token), Some(user)) = (token, user) {
            self.active_account_id.set(Some(user.id.clone()));
            self.token.set(Some(token));
            self.current_user.set(Some(user));
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.with(Option::is_some) && self.current_user.with(Option::is_some)
    }

    pub fn user_permissions(&self) -> Vec<Permission> {
        self.current_user
            .with(|u| u.as_ref().map(|u| u.permissions().to_vec()))
            .unwrap_or_default()
    }

    pub fn check_permission(&self, permission: Permission) -> bool {
        has_permission(&self.user_permissions(), permission)
    }

    pub fn set_auth_state(&self, user: User, token: String, remember: bool) {
        let days = if remember {
            self.config.remember_expires_days
        } else {
            self.config.token_expires_days
        };
        self.persist(&user, &token, days);

        self.active_account_id.set(Some(user.id.clone()));
        self.current_user.set(Some(user));
        self.token.set(Some(token));
    }

    pub fn clear_auth_state(&self) {
        self.current_user.set(None);
        self.token.set(None);
        self.error.set(None);
        self.active_account_id.set(None);
        self.accounts.set(Vec::new());

        self.host.cookies.remove(keys::TOKEN);
        self.host.storage.remove(keys::USER);
    }

    /// 切换到已加载的演示账号，未知 id 忽略
    pub fn switch_account(&self, account_id: &str) {
        let Some(next) = self
            .accounts
            .with(|list| list.iter().find(|a| a.id == account_id).cloned())
        else {
            return;
        };

        let token = format!("token-{account_id}");
        self.persist(&next, &token, self.config.token_expires_days);

        self.active_account_id.set(Some(account_id.to_owned()));
        self.current_user.set(Some(next));
        self.token.set(Some(token));
    }

    /// 载入演示账号列表；尚无活动账号时切换到第一个
    pub fn load_demo_accounts(&self, list: Vec<User>) {
        let first = list.first().map(|u| u.id.clone());
        self.accounts.set(list);
        if let Some(id) = first
            && self.active_account_id.with(Option::is_none)
        {
            self.switch_account(&id);
        }
    }

    fn persist(&self, user: &User, token: &str, days: i64) {
        self.host.cookies.set(
            keys::TOKEN,
            token,
            CookieOptions::days(days, &self.config.cookie_path),
        );
        self.host.storage.set(keys::USER, user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::data::demo_user;
    use crate::policy;
    use chrono::Utc;

    fn store() -> (Host, AuthStore) {
        let host = Host::in_memory();
        (host.clone(), AuthStore::new(host, AuthConfig::default()))
    }

    fn viewer() -> User {
        User {
            id: "viewer-1".into(),
            role: policy::role_by_id("viewer").unwrap().clone(),
            ..demo_user()
        }
    }

    #[test]
    fn test_initially_unauthenticated() {
        let (_, auth) = store();
        assert!(!auth.is_authenticated());
        assert!(auth.user_permissions().is_empty());
        assert!(!auth.check_permission(Permission::DashboardView));
    }

    #[test]
    fn test_set_then_clear() {
        let (host, auth) = store();
        auth.set_auth_state(viewer(), "test-token".into(), false);

        assert!(auth.is_authenticated());
        assert_eq!(auth.token.get().as_deref(), Some("test-token"));
        assert_eq!(auth.user_permissions().len(), 4);
        assert!(auth.check_permission(Permission::DashboardView));
        assert!(!auth.check_permission(Permission::UsersView));
        assert_eq!(host.cookies.get(keys::TOKEN).as_deref(), Some("test-token"));
        assert!(host.storage.get::<User>(keys::USER).is_some());

        auth.clear_auth_state();
        assert!(!auth.is_authenticated());
        assert_eq!(auth.current_user.get(), None);
        assert_eq!(host.cookies.get(keys::TOKEN), None);
        assert!(host.storage.get::<User>(keys::USER).is_none());
    }

    #[test]
    fn test_remember_extends_cookie_expiry() {
        let (host, auth) = store();
        let before = Utc::now();

        auth.set_auth_state(viewer(), "short".into(), false);
        let short = host.cookies.get_cookie(keys::TOKEN).unwrap().expires_at.unwrap();
        assert_eq!((short - before).num_days(), 7);

        auth.set_auth_state(viewer(), "long".into(), true);
        let long = host.cookies.get_cookie(keys::TOKEN).unwrap().expires_at.unwrap();
        assert_eq!((long - before).num_days(), 30);
    }

    #[test]
    fn test_init_requires_both_cookie_and_user() {
        let (host, auth) = store();
        host.storage.set(keys::USER, &viewer());
        auth.init();
        assert!(!auth.is_authenticated());

        host.cookies
            .set(keys::TOKEN, "restored", CookieOptions::days(7, "/"));
        auth.init();
        assert!(auth.is_authenticated());
        assert_eq!(auth.active_account_id.get().as_deref(), Some("viewer-1"));
    }

    #[test]
    fn test_demo_accounts_switching() {
        let (_, auth) = store();
        auth.load_demo_accounts(vec![demo_user(), viewer()]);
        assert_eq!(auth.current_user.get().unwrap().id, demo_user().id);
        assert_eq!(
            auth.token.get(),
            Some(format!("token-{}", demo_user().id))
        );

        auth.switch_account("viewer-1");
        assert_eq!(auth.active_account_id.get().as_deref(), Some("viewer-1"));
        assert!(!auth.check_permission(Permission::UsersView));

        auth.switch_account("missing");
        assert_eq!(auth.active_account_id.get().as_deref(), Some("viewer-1"));

        // 已有活动账号时重新载入不切换
        auth.load_demo_accounts(vec![demo_user()]);
        assert_eq!(auth.active_account_id.get().as_deref(), Some("viewer-1"));
    }
}
