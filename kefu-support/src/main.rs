use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use thiserror::Error;
use tracing::info;

use kefu_support::service::SupportService;
use kefu_support::storage::{MemStore, PgStore, SupportStore};
use kefu_support::{api, config};

/// 命令行参数 / Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "kefu-support HTTP Server", long_about = None)]
struct Args {
    /// 指定配置文件路径（TOML/JSON/YAML自动识别）
    /// Specify config file path (auto-detect TOML/JSON/YAML)
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("配置错误: {0}")]
    Config(String),
    #[error("数据库错误: {0}")]
    Db(#[from] kefu::DbError),
    #[error("存储初始化失败: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();
    let cm = kefu::init_global_config_manager(args.config.as_deref())
        .map_err(|e| AppError::Config(e.to_string()))?;
    cm.print_sources_info();
    let _ = kefu::init_tracing();
    let (server_cfg, storage_cfg) =
        config::load().map_err(|e| AppError::Config(e.to_string()))?;

    let store: Arc<dyn SupportStore> = match storage_cfg.backend.as_str() {
        "memory" => Arc::new(MemStore::new()),
        "postgres" => {
            let pg = PgStore::connect()
                .await
                .map_err(|e| AppError::Store(e.to_string()))?;
            kefu::check_health(pg.pool()).await?;
            info!("database group=default healthy");
            Arc::new(pg)
        }
        other => {
            return Err(AppError::Config(format!(
                "未知存储后端 / unknown storage backend: {}",
                other
            )))
        }
    };
    let service = web::Data::new(SupportService::new(store));

    let addr = format!("{}:{}", server_cfg.host, server_cfg.port);
    info!(
        "starting {} v{} on {} (storage={})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        addr,
        storage_cfg.backend
    );

    let service_for_app = service.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(service_for_app.clone())
            .configure(api::configure)
    });
    let server = match server_cfg.workers {
        Some(w) if w > 0 => server.workers(w),
        _ => server,
    };
    server.bind(&addr)?.run().await?;
    Ok(())
}
