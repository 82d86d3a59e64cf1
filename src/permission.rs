use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 权限标识，序列化为 `domain:action` 字符串，`*` 为超级权限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Permission {
    // 仪表盘
    #[serde(rename = "dashboard:view")]
    DashboardView,
    #[serde(rename = "dashboard:edit")]
    DashboardEdit,
    // 用户管理
    #[serde(rename = "users:view")]
    UsersView,
    #[serde(rename = "users:create")]
    UsersCreate,
    #[serde(rename = "users:edit")]
    UsersEdit,
    #[serde(rename = "users:delete")]
    UsersDelete,
    // 数据分析
    #[serde(rename = "analytics:view")]
    AnalyticsView,
    #[serde(rename = "analytics:export")]
    AnalyticsExport,
    // 系统设置
    #[serde(rename = "settings:view")]
    SettingsView,
    #[serde(rename = "settings:edit")]
    SettingsEdit,
    // 文档和文件
    #[serde(rename = "documents:view")]
    DocumentsView,
    #[serde(rename = "documents:create")]
    DocumentsCreate,
    #[serde(rename = "documents:edit")]
    DocumentsEdit,
    #[serde(rename = "documents:delete")]
    DocumentsDelete,
    #[serde(rename = "files:view")]
    FilesView,
    #[serde(rename = "files:upload")]
    FilesUpload,
    #[serde(rename = "files:delete")]
    FilesDelete,
    // 消息和日程
    #[serde(rename = "messages:view")]
    MessagesView,
    #[serde(rename = "messages:send")]
    MessagesSend,
    #[serde(rename = "calendar:view")]
    CalendarView,
    #[serde(rename = "calendar:edit")]
    CalendarEdit,
    // 通知
    #[serde(rename = "notifications:view")]
    NotificationsView,
    #[serde(rename = "notifications:manage")]
    NotificationsManage,
    // 超级权限
    #[serde(rename = "*")]
    All,
}

#[derive(Debug, thiserror::Error)]
#[error("未知权限标识：{0}")]
pub struct UnknownPermission(pub String);

impl Permission {
    pub const ALL_VARIANTS: [Permission; 24] = [
        Self::DashboardView,
        Self::DashboardEdit,
        Self::UsersView,
        Self::UsersCreate,
        Self::UsersEdit,
        Self::UsersDelete,
        Self::AnalyticsView,
        Self::AnalyticsExport,
        Self::SettingsView,
        Self::SettingsEdit,
        Self::DocumentsView,
        Self::DocumentsCreate,
        Self::DocumentsEdit,
        Self::DocumentsDelete,
        Self::FilesView,
        Self::FilesUpload,
        Self::FilesDelete,
        Self::MessagesView,
        Self::MessagesSend,
        Self::CalendarView,
        Self::CalendarEdit,
        Self::NotificationsView,
        Self::NotificationsManage,
        Self::All,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DashboardView => "dashboard:view",
            Self::DashboardEdit => "dashboard:edit",
            Self::UsersView => "users:view",
            Self::UsersCreate => "users:create",
            Self::UsersEdit => "users:edit",
            Self::UsersDelete => "users:delete",
            Self::AnalyticsView => "analytics:view",
            Self::AnalyticsExport => "analytics:export",
            Self::SettingsView => "settings:view",
            Self::SettingsEdit => "settings:edit",
            Self::DocumentsView => "documents:view",
            Self::DocumentsCreate => "documents:create",
            Self::DocumentsEdit => "documents:edit",
            Self::DocumentsDelete => "documents:delete",
            Self::FilesView => "files:view",
            Self::FilesUpload => "files:upload",
            Self::FilesDelete => "files:delete",
            Self::MessagesView => "messages:view",
            Self::MessagesSend => "messages:send",
            Self::CalendarView => "calendar:view",
            Self::CalendarEdit => "calendar:edit",
            Self::NotificationsView => "notifications:view",
            Self::NotificationsManage => "notifications:manage",
            Self::All => "*",
        }
    }

    pub fn is_wildcard(self) -> bool {
        self == Self::All
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL_VARIANTS
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}

// ── 权限判定 ──

/// 用户拥有 `required` 或通配符 `*` 时返回 true
pub fn has_permission(user_permissions: &[Permission], required: Permission) -> bool {
    user_permissions
        .iter()
        .any(|p| p.is_wildcard() || *p == required)
}

/// 任一所需权限满足即可；所需集合为空时返回 false
pub fn has_any_permission(user_permissions: &[Permission], required: &[Permission]) -> bool {
    required
        .iter()
        .any(|p| has_permission(user_permissions, *p))
}

/// 全部所需权限都满足；所需集合为空时返回 true
pub fn has_all_permissions(user_permissions: &[Permission], required: &[Permission]) -> bool {
    required
        .iter()
        .all(|p| has_permission(user_permissions, *p))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDITOR: [Permission; 3] = [
        Permission::DashboardView,
        Permission::UsersView,
        Permission::UsersEdit,
    ];

    #[test]
    fn test_has_permission_when_granted() {
        assert!(has_permission(&EDITOR, Permission::DashboardView));
        assert!(!has_permission(&EDITOR, Permission::SettingsEdit));
    }

    #[test]
    fn test_empty_permissions_deny_everything() {
        for p in Permission::ALL_VARIANTS.iter().filter(|p| !p.is_wildcard()) {
            assert!(!has_permission(&[], *p), "{p} 不应被授予");
        }
    }

    #[test]
    fn test_wildcard_grants_everything() {
        let admin = [Permission::UsersView, Permission::All];
        for p in Permission::ALL_VARIANTS {
            assert!(has_permission(&admin, p));
        }
    }

    #[test]
    fn test_any_and_all() {
        let required = [Permission::UsersView, Permission::SettingsEdit];
        assert!(has_any_permission(&EDITOR, &required));
        assert!(!has_all_permissions(&EDITOR, &required));
        assert!(has_all_permissions(&EDITOR, &[Permission::UsersView, Permission::UsersEdit]));

        assert!(!has_any_permission(&EDITOR, &[]));
        assert!(has_all_permissions(&EDITOR, &[]));
    }

    #[test]
    fn test_string_round_trip() {
        assert_eq!("users:delete".parse::<Permission>().unwrap(), Permission::UsersDelete);
        assert_eq!("*".parse::<Permission>().unwrap(), Permission::All);
        assert!("users:fly".parse::<Permission>().is_err());

        let json = serde_json::to_string(&[Permission::FilesUpload, Permission::All]).unwrap();
        assert_eq!(json, r#"["files:upload","*"]"#);
    }
}
