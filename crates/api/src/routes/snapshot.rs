//! # 快照路由控制器
//!
//! 每次请求都同步执行一次完整刷新，不做缓存。

use axum::Json;
use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::server::AppState;
use crate::types::{ApiErrorResponse, SnapshotResponse};

/// 获取看板快照
///
/// 对看板中的每个证券拉取最近的日线并计算涨跌幅。
/// 单个证券失败不会影响状态码，失败原因在 `errors` 中返回。
#[utoipa::path(
    get,
    path = "/api/{board}",
    tag = "快照 (Snapshot)",
    params(
        ("board" = String, Path, description = "看板名称，如 banknifty")
    ),
    responses(
        (status = 200, description = "本次刷新的快照", body = SnapshotResponse),
        (status = 404, description = "看板不存在", body = ApiErrorResponse)
    )
)]
pub async fn get_snapshot(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Json<SnapshotResponse>, ApiError> {
    let board = state
        .boards
        .get(&board)
        .ok_or_else(|| ApiError::NotFound(format!("unknown board: {}", board)))?;

    tracing::debug!(board = %board.name, symbols = board.symbols.len(), "snapshot requested");
    let snapshot = state.snapshots.snapshot(&board.symbols).await;

    Ok(Json(snapshot.into()))
}
