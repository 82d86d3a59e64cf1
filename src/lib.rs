//! Halolight 中文后台管理系统核心：权限模型、响应式状态容器、Mock API 与 HTTP 接口。

pub mod check;
pub mod config;
pub mod error;
pub mod format;
pub mod init;
pub mod mock;
pub mod model;
pub mod permission;
pub mod policy;
pub mod server;
pub mod state;
pub mod store;
