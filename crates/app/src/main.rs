mod settings;

use std::sync::Arc;
use std::time::Duration;

use pulse_api::server::{AppState, start_server};
use pulse_feed::yahoo::YahooProvider;
use pulse_market::board::BoardRegistry;
use pulse_market::collector::BatchCollector;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
/// 负责加载配置、实例化具体实现组件并通过 Arc<dyn Trait> 注入到 API 层。
///
/// # Logic
/// 1. 初始化全局日志。
/// 2. 加载并校验配置。
/// 3. 实例化基础设施层（Yahoo 行情源）。
/// 4. 实例化领域层（批量采集器、看板注册表）。
/// 5. 启动 HTTP 服务，收到退出信号后优雅关闭。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. 初始化日志，guard 需存活到进程结束以刷新缓冲
    let _guard = init_tracing();
    info!("Pulse starting...");

    // 2. 加载配置
    let path = settings::config_path();
    let config = settings::load(&path)?;
    config.validate()?;
    info!(path = %path.display(), boards = config.boards.len(), "configuration loaded");

    // 3. 实例化基础设施层
    let feed = Arc::new(YahooProvider::new(&config.feed)?);

    // 4. 实例化领域层
    let collector = Arc::new(BatchCollector::new(feed, &config.collector));
    let boards = Arc::new(BoardRegistry::from_config(&config.boards)?);
    for board in boards.iter() {
        info!(board = %board.name, symbols = board.symbols.len(), "board registered");
    }

    // 5. 启动 API 服务
    let state = AppState {
        snapshots: collector,
        boards,
        refresh_interval: Duration::from_secs(config.dashboard.refresh_interval_secs),
    };
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    start_server(state, &bind_addr, shutdown_signal()).await?;

    info!("Shutdown complete");
    Ok(())
}

fn init_tracing() -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
    guard
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // 无法监听信号时保持运行，由进程管理器负责终止
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
