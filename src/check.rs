use anyhow::Result;
use std::collections::HashSet;
use std::path::Path;

use crate::config::{AppConfig, CONFIG_FILE};
use crate::model::MenuItem;
use crate::policy;

pub struct CheckResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// 执行项目完整性检查，依次验证配置、存储目录和内置权限策略
pub fn run(project_root: &Path) -> Result<CheckResult> {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Some(config) = check_config(project_root, &mut errors, &mut warnings) {
        check_storage(project_root, &config, &mut warnings);
    }
    check_policy(&mut errors, &mut warnings);

    Ok(CheckResult { errors, warnings })
}

fn check_config(
    root: &Path,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) -> Option<AppConfig> {
    if !root.join(CONFIG_FILE).exists() {
        errors.push(format!("缺少 {CONFIG_FILE} 配置文件"));
        return None;
    }
    let config = match AppConfig::load(root) {
        Ok(cfg) => cfg,
        Err(e) => {
            errors.push(e.to_string());
            return None;
        }
    };

    let auth = &config.auth;
    if auth.token_expires_days <= 0 || auth.remember_expires_days <= 0 {
        errors.push("auth 中的有效期天数必须大于 0".to_string());
    }
    if auth.remember_expires_days < auth.token_expires_days {
        warnings.push("remember_expires_days 小于 token_expires_days".to_string());
    }
    if auth.demo_password.chars().count() < 6 {
        warnings.push("演示账号密码少于 6 位".to_string());
    }
    if config.mock.latency_factor < 0.0 {
        errors.push("mock.latency_factor 不能为负数".to_string());
    }

    Some(config)
}

fn check_storage(root: &Path, config: &AppConfig, warnings: &mut Vec<String>) {
    let dir = &config.storage.dir;
    if !root.join(dir).is_dir() {
        warnings.push(format!("存储目录 {dir}/ 不存在，启动时将自动创建"));
    }
}

fn check_policy(errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    let mut role_ids = HashSet::new();
    for role in policy::ROLES.iter() {
        if !role_ids.insert(role.id.as_str()) {
            errors.push(format!("角色 {} 重复定义", role.id));
        }
    }

    // 除超级管理员外无人拥有的菜单权限
    let mut hrefs = HashSet::new();
    collect_menu(&policy::MENU_ITEMS, &mut hrefs, &mut |item: &MenuItem| {
        if let Some(required) = item.permission {
            let granted = policy::ROLES
                .iter()
                .filter(|r| !r.permissions.iter().any(|p| p.is_wildcard()))
                .any(|r| r.permissions.contains(&required));
            if !granted {
                warnings.push(format!("菜单 {} 的权限 {required} 仅超级管理员可用", item.title));
            }
        }
    });

    for (route, _) in policy::ROUTE_PERMISSIONS {
        if !hrefs.contains(*route) {
            errors.push(format!("路由 {route} 没有对应的菜单项"));
        }
    }

    let widget_ids: HashSet<String> = policy::default_widgets().into_iter().map(|w| w.id).collect();
    let layouts = policy::default_layouts();
    for (name, layout) in [("lg", &layouts.lg), ("md", &layouts.md), ("sm", &layouts.sm)] {
        for item in layout {
            if !widget_ids.contains(&item.i) {
                errors.push(format!("{name} 布局引用了未知组件 {}", item.i));
            }
        }
    }
}

fn collect_menu<'a>(
    items: &'a [MenuItem],
    hrefs: &mut HashSet<&'a str>,
    visit: &mut impl FnMut(&MenuItem),
) {
    for item in items {
        hrefs.insert(item.href.as_str());
        visit(item);
        collect_menu(&item.children, hrefs, &mut *visit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_policy_is_consistent() {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        check_policy(&mut errors, &mut warnings);
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let result = run(dir.path()).unwrap();
        assert_eq!(result.errors, vec![format!("缺少 {CONFIG_FILE} 配置文件")]);
    }

    #[test]
    fn test_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "[auth]\ntoken_expires_days = 0\ndemo_password = \"1\"\n[mock]\nlatency_factor = -1.0\n",
        )
        .unwrap();
        let result = run(dir.path()).unwrap();
        assert_eq!(result.errors.len(), 2);
        assert!(result.warnings.iter().any(|w| w.contains("演示账号密码")));
        assert!(result.warnings.iter().any(|w| w.contains("存储目录")));
    }

    #[test]
    fn test_initialized_project_passes() {
        let dir = tempfile::tempdir().unwrap();
        crate::init::ensure_initialized(dir.path()).unwrap();
        let result = run(dir.path()).unwrap();
        assert!(result.errors.is_empty(), "{:?}", result.errors);
    }
}
