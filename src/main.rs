use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use halolight::config::{AppConfig, CONFIG_FILE, LogFormat};
use halolight::{check, init, server, state};

#[derive(Parser)]
#[command(name = "halolight", about = "Halolight 中文后台管理系统 Mock 服务", version = long_version())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// 启动 Mock API 服务
    Serve {
        /// 项目根目录（默认当前目录）
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// 监听地址
        #[arg(long)]
        host: Option<String>,

        /// 监听端口
        #[arg(long)]
        port: Option<u16>,
    },

    /// 检查配置与内置权限策略
    Check {
        /// 项目根目录（默认当前目录）
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },

    /// 写入默认 halolight.toml
    Init {
        /// 项目根目录（默认当前目录）
        #[arg(short, long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // None 等同于 Serve { root: ".", host: None, port: None }
    let command = cli.command.unwrap_or(Commands::Serve {
        root: PathBuf::from("."),
        host: None,
        port: None,
    });

    // 使用配置中的日志级别与格式作为默认值
    let root = match &command {
        Commands::Serve { root, .. } | Commands::Check { root } | Commands::Init { root } => {
            root.clone()
        }
    };
    let config = AppConfig::load(&root.canonicalize().unwrap_or_else(|_| root.clone())).ok();
    init_tracing(config.as_ref());

    match command {
        Commands::Serve { root, host, port } => {
            if init::ensure_initialized(&root)? {
                tracing::info!("已自动初始化项目");
            }
            let root = root.canonicalize()?;
            let config = AppConfig::load(&root)?;

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?
                .block_on(async move { run_server(&root, config, &host, port).await })?;
        }
        Commands::Check { root } => {
            let root = root.canonicalize()?;
            let result = check::run(&root)?;

            for w in &result.warnings {
                tracing::warn!("{w}");
            }
            for e in &result.errors {
                tracing::error!("{e}");
            }

            if result.errors.is_empty() {
                tracing::info!("检查通过（{} 个警告）", result.warnings.len());
            } else {
                anyhow::bail!(
                    "检查未通过：{} 个错误，{} 个警告",
                    result.errors.len(),
                    result.warnings.len()
                );
            }
        }
        Commands::Init { root } => {
            if init::ensure_initialized(&root)? {
                tracing::info!("已在 {} 写入默认配置", root.display());
            } else {
                tracing::info!("配置文件已存在，跳过初始化");
            }
        }
    }

    Ok(())
}

fn init_tracing(config: Option<&AppConfig>) {
    let default_level = config.map_or("info", |c| c.server.log_level.as_str());
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match config.map(|c| c.server.log_format).unwrap_or_default() {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn run_server(root: &Path, config: AppConfig, host: &str, port: u16) -> anyhow::Result<()> {
    let storage_dir = root.join(&config.storage.dir);
    std::fs::create_dir_all(&storage_dir)
        .with_context(|| format!("创建存储目录 {} 失败", storage_dir.display()))?;

    let app_state = state::AppState::new(config);

    // 启动后台定时清理过期会话
    server::cleanup::spawn_session_cleanup(app_state.clone());

    let app = server::router(app_state);

    let addr = format!("{host}:{port}");
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) if e.kind() == std::io::ErrorKind::AddrInUse => {
            tracing::error!("端口 {port} 已被占用，可通过 --port 或 {CONFIG_FILE} 的 server.port 更换");
            return Err(e.into());
        }
        Err(e) => return Err(e).with_context(|| format!("监听 {addr} 失败")),
    };
    tracing::info!("Mock API 服务启动：http://{}/api", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

const fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\ncommit:  ",
        env!("HALOLIGHT_GIT_COMMIT"),
        "\nbuild:   ",
        env!("HALOLIGHT_BUILD_TIME"),
        "\ntarget:  ",
        env!("HALOLIGHT_BUILD_TARGET"),
        "\nprofile: ",
        env!("HALOLIGHT_BUILD_PROFILE"),
    )
}
