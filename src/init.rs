use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{AppConfig, CONFIG_FILE};

// 默认 halolight.toml
const DEFAULT_CONFIG: &str = r#"[app]
name = "Halolight"
title = "Halolight - 中文后台管理系统"
description = "现代化中文后台管理系统"
author = "h7ml"
homepage = ""

[server]
host = "127.0.0.1"
port = 3000
log_level = "info"
log_format = "text"
cors_origins = []

[auth]
token_expires_days = 7
remember_expires_days = 30
cookie_path = "/"
demo_email = "admin@halolight.h7ml.cn"
demo_password = "123456"

[storage]
dir = ".halolight"

[mock]
latency_factor = 1.0
users = 20
notifications = 10
tasks = 8
events = 5
documents = 15
files = 12
messages = 6
"#;

/// 检测项目是否已初始化，未初始化则写入默认配置并创建存储目录。
/// 返回 `true` 表示执行了初始化，`false` 表示已存在。
pub fn ensure_initialized(root: &Path) -> Result<bool> {
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        return Ok(false);
    }

    fs::create_dir_all(root).with_context(|| format!("创建目录 {} 失败", root.display()))?;
    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("写入 {CONFIG_FILE} 失败"))?;

    let config = AppConfig::parse(DEFAULT_CONFIG)?;
    fs::create_dir_all(root.join(&config.storage.dir))
        .with_context(|| format!("创建存储目录 {} 失败", config.storage.dir))?;

    Ok(true)
}
