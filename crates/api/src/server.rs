//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use pulse_core::snapshot::port::SnapshotProvider;
use pulse_market::board::BoardRegistry;

use crate::routes::{dashboard, snapshot};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有字段在服务启动前由 DI 容器注入，运行期只读，无需加锁。
#[derive(Clone)]
pub struct AppState {
    /// 快照服务 (批量采集器)
    pub snapshots: Arc<dyn SnapshotProvider>,
    /// 看板注册表
    pub boards: Arc<BoardRegistry>,
    /// 仪表盘轮询间隔
    pub refresh_interval: Duration,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pulse 行情看板 API",
        version = "0.1.0",
        description = "按看板批量拉取日线行情，计算最新价、开盘价与涨跌幅。",
        license(name = "MIT")
    ),
    tags(
        (name = "快照 (Snapshot)", description = "看板证券的实时指标 JSON"),
        (name = "仪表盘 (Dashboard)", description = "自刷新的 HTML 页面")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册快照与仪表盘路由并收集 OpenAPI 文档。
/// 2. 合并 Swagger UI。
/// 3. 配置 CORS (允许所有来源)。
pub fn build_router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(snapshot::get_snapshot))
        .routes(routes!(dashboard::index))
        .routes(routes!(dashboard::board_dashboard))
        .with_state(state)
        .split_for_parts();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(cors)
}

/// 绑定端口并启动 HTTP 服务，直到 `shutdown` 完成后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:5000"`
/// * `shutdown` - 退出信号
pub async fn start_server<F>(
    state: AppState,
    bind_addr: &str,
    shutdown: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Pulse server listening on {}", listener.local_addr()?);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
