//! 静态策略数据：角色、菜单、路由权限与仪表盘默认布局。

use std::sync::LazyLock;

use crate::model::{
    DashboardLayouts, DashboardWidget, MenuItem, Role, WidgetLayout, WidgetType,
};
use crate::permission::{Permission, has_permission};

/// 持久化存储键名
pub mod keys {
    pub const TOKEN: &str = "halolight_token";
    pub const REFRESH_TOKEN: &str = "halolight_refresh_token";
    pub const USER: &str = "halolight_user";
    pub const THEME: &str = "halolight_theme";
    pub const SKIN: &str = "halolight_skin";
    pub const UI_SETTINGS: &str = "halolight_ui_settings";
    pub const DASHBOARD_WIDGETS: &str = "halolight_dashboard_widgets";
    pub const DASHBOARD_LAYOUTS: &str = "halolight_dashboard_layouts";
}

// ── 预定义角色 ──

fn role(id: &str, label: &str, description: &str, permissions: &[Permission]) -> Role {
    Role {
        id: id.to_owned(),
        name: id.to_owned(),
        label: label.to_owned(),
        description: Some(description.to_owned()),
        permissions: permissions.to_vec(),
    }
}

pub static ROLES: LazyLock<Vec<Role>> = LazyLock::new(|| {
    use Permission::*;
    vec![
        role("admin", "超级管理员", "拥有系统所有权限", &[All]),
        role(
            "manager",
            "管理员",
            "拥有大部分管理权限",
            &[
                DashboardView,
                DashboardEdit,
                UsersView,
                UsersCreate,
                UsersEdit,
                AnalyticsView,
                AnalyticsExport,
                DocumentsView,
                DocumentsCreate,
                DocumentsEdit,
                FilesView,
                FilesUpload,
                MessagesView,
                MessagesSend,
                CalendarView,
                CalendarEdit,
                NotificationsView,
                SettingsView,
            ],
        ),
        role(
            "editor",
            "编辑",
            "可以编辑内容",
            &[
                DashboardView,
                DocumentsView,
                DocumentsCreate,
                DocumentsEdit,
                FilesView,
                FilesUpload,
                MessagesView,
                CalendarView,
                NotificationsView,
            ],
        ),
        role(
            "viewer",
            "访客",
            "只能查看内容",
            &[DashboardView, DocumentsView, FilesView, NotificationsView],
        ),
    ]
});

pub fn role_by_id(id: &str) -> Option<&'static Role> {
    ROLES.iter().find(|r| r.id == id)
}

/// 超级管理员角色
pub fn admin_role() -> &'static Role {
    &ROLES[0]
}

// ── 菜单 ──

fn menu(title: &str, icon: &str, href: &str, permission: Permission) -> MenuItem {
    MenuItem {
        title: title.to_owned(),
        icon: Some(icon.to_owned()),
        href: href.to_owned(),
        permission: Some(permission),
        children: Vec::new(),
        badge: None,
    }
}

pub static MENU_ITEMS: LazyLock<Vec<MenuItem>> = LazyLock::new(|| {
    use Permission::*;
    vec![
        menu("仪表盘", "LayoutDashboard", "/dashboard", DashboardView),
        menu("用户管理", "Users", "/users", UsersView),
        MenuItem {
            children: vec![
                menu("文档管理", "FileText", "/documents", DocumentsView),
                menu("文件存储", "FolderOpen", "/files", FilesView),
            ],
            ..menu("内容管理", "FileText", "/documents", DocumentsView)
        },
        MenuItem {
            children: vec![
                menu("数据分析", "BarChart3", "/analytics", AnalyticsView),
                menu("消息中心", "Mail", "/messages", MessagesView),
                menu("日程安排", "Calendar", "/calendar", CalendarView),
            ],
            ..menu("业务运营", "BarChart3", "/analytics", AnalyticsView)
        },
        menu("通知中心", "Bell", "/notifications", NotificationsView),
        menu("系统设置", "Settings", "/settings", SettingsView),
    ]
});

/// 按用户权限过滤菜单树；子项全部不可见的分组一并隐藏
pub fn visible_menu(user_permissions: &[Permission]) -> Vec<MenuItem> {
    filter_menu(&MENU_ITEMS, user_permissions)
}

fn filter_menu(items: &[MenuItem], user_permissions: &[Permission]) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| {
            item.permission
                .is_none_or(|p| has_permission(user_permissions, p))
        })
        .filter_map(|item| {
            if item.children.is_empty() {
                return Some(item.clone());
            }
            let children = filter_menu(&item.children, user_permissions);
            if children.is_empty() {
                return None;
            }
            Some(MenuItem {
                children,
                ..item.clone()
            })
        })
        .collect()
}

// ── 路由 ──

pub const ROUTE_PERMISSIONS: &[(&str, Permission)] = &[
    ("/dashboard", Permission::DashboardView),
    ("/users", Permission::UsersView),
    ("/documents", Permission::DocumentsView),
    ("/files", Permission::FilesView),
    ("/analytics", Permission::AnalyticsView),
    ("/messages", Permission::MessagesView),
    ("/calendar", Permission::CalendarView),
    ("/notifications", Permission::NotificationsView),
    ("/settings", Permission::SettingsView),
];

/// 公开路由（无需认证）
pub const PUBLIC_ROUTES: &[&str] = &[
    "/",
    "/login",
    "/register",
    "/forgot-password",
    "/reset-password",
    "/terms",
    "/privacy",
];

/// 认证路由（已登录用户不能访问）
pub const AUTH_ROUTES: &[&str] = &["/login", "/register", "/forgot-password", "/reset-password"];

fn matches_route(routes: &[&str], pathname: &str) -> bool {
    routes.iter().any(|route| {
        pathname == *route
            || pathname
                .strip_prefix(route)
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

pub fn is_public_route(pathname: &str) -> bool {
    matches_route(PUBLIC_ROUTES, pathname)
}

pub fn is_auth_route(pathname: &str) -> bool {
    matches_route(AUTH_ROUTES, pathname)
}

pub fn route_permission(pathname: &str) -> Option<Permission> {
    ROUTE_PERMISSIONS
        .iter()
        .find(|(route, _)| *route == pathname)
        .map(|(_, p)| *p)
}

/// 页面访问决策，供外层路由胶水代码使用
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteAccess {
    Allow,
    /// 未登录访问受保护页面
    RedirectToLogin,
    /// 已登录访问登录/注册等页面
    RedirectToDashboard,
    Forbidden(Permission),
}

pub fn route_access(pathname: &str, user_permissions: Option<&[Permission]>) -> RouteAccess {
    match user_permissions {
        None if is_public_route(pathname) => RouteAccess::Allow,
        None => RouteAccess::RedirectToLogin,
        Some(_) if is_auth_route(pathname) => RouteAccess::RedirectToDashboard,
        Some(perms) => match route_permission(pathname) {
            Some(p) if !has_permission(perms, p) => RouteAccess::Forbidden(p),
            _ => RouteAccess::Allow,
        },
    }
}

// ── 仪表盘默认值 ──

pub fn default_widgets() -> Vec<DashboardWidget> {
    use WidgetType::*;
    [
        ("stats", Stats, "数据概览"),
        ("chart-line", ChartLine, "访问趋势"),
        ("chart-bar", ChartBar, "销售统计"),
        ("chart-pie", ChartPie, "流量占比"),
        ("recent-users", RecentUsers, "最近用户"),
        ("notifications", Notifications, "最新通知"),
        ("tasks", Tasks, "待办任务"),
        ("calendar", Calendar, "今日日程"),
        ("quick-actions", QuickActions, "快捷操作"),
    ]
    .into_iter()
    .map(|(id, widget_type, title)| DashboardWidget {
        id: id.to_owned(),
        widget_type,
        title: title.to_owned(),
        description: None,
        visible: true,
        settings: None,
    })
    .collect()
}

fn grid(cells: &[(&str, u32, u32, u32, u32)]) -> Vec<WidgetLayout> {
    cells
        .iter()
        .map(|&(i, x, y, w, h)| WidgetLayout {
            i: i.to_owned(),
            x,
            y,
            w,
            h,
            min_w: None,
            min_h: None,
            max_w: None,
            max_h: None,
        })
        .collect()
}

pub fn default_layouts() -> DashboardLayouts {
    DashboardLayouts {
        lg: grid(&[
            ("stats", 0, 0, 12, 2),
            ("chart-line", 0, 2, 6, 4),
            ("chart-bar", 6, 2, 6, 4),
            ("chart-pie", 0, 6, 4, 4),
            ("recent-users", 4, 6, 4, 4),
            ("notifications", 8, 6, 4, 4),
            ("tasks", 0, 10, 4, 4),
            ("calendar", 4, 10, 4, 4),
            ("quick-actions", 8, 10, 4, 2),
        ]),
        md: grid(&[
            ("stats", 0, 0, 8, 2),
            ("chart-line", 0, 2, 4, 4),
            ("chart-bar", 4, 2, 4, 4),
            ("chart-pie", 0, 6, 4, 4),
            ("recent-users", 4, 6, 4, 4),
            ("notifications", 0, 10, 4, 4),
            ("tasks", 4, 10, 4, 4),
            ("calendar", 0, 14, 4, 4),
            ("quick-actions", 4, 14, 4, 2),
        ]),
        sm: grid(&[
            ("stats", 0, 0, 4, 2),
            ("chart-line", 0, 2, 4, 4),
            ("chart-bar", 0, 6, 4, 4),
            ("chart-pie", 0, 10, 4, 4),
            ("recent-users", 0, 14, 4, 4),
            ("notifications", 0, 18, 4, 4),
            ("tasks", 0, 22, 4, 4),
            ("calendar", 0, 26, 4, 4),
            ("quick-actions", 0, 30, 4, 2),
        ]),
    }
}
