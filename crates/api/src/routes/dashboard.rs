//! # 仪表盘路由控制器
//!
//! 返回静态 HTML 页面，页面内脚本定时轮询 `/api/{board}` 并在浏览器端渲染与汇总。

use std::time::Duration;

use axum::extract::{Path, State};
use axum::response::Html;

use pulse_market::board::Board;

use crate::error::ApiError;
use crate::server::AppState;

const TEMPLATE: &str = include_str!("../../assets/dashboard.html");

/// 默认看板仪表盘
///
/// 渲染配置中的第一个看板。
#[utoipa::path(
    get,
    path = "/",
    tag = "仪表盘 (Dashboard)",
    responses(
        (status = 200, description = "HTML 页面", body = String, content_type = "text/html")
    )
)]
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let board = state
        .boards
        .default_board()
        .ok_or_else(|| ApiError::Internal("no boards configured".to_string()))?;
    Ok(Html(render_dashboard(&board, state.refresh_interval)))
}

/// 指定看板仪表盘
#[utoipa::path(
    get,
    path = "/dashboard/{board}",
    tag = "仪表盘 (Dashboard)",
    params(
        ("board" = String, Path, description = "看板名称，如 nifty50")
    ),
    responses(
        (status = 200, description = "HTML 页面", body = String, content_type = "text/html"),
        (status = 404, description = "看板不存在")
    )
)]
pub async fn board_dashboard(
    State(state): State<AppState>,
    Path(board): Path<String>,
) -> Result<Html<String>, ApiError> {
    let board = state
        .boards
        .get(&board)
        .ok_or_else(|| ApiError::NotFound(format!("unknown board: {}", board)))?;
    Ok(Html(render_dashboard(&board, state.refresh_interval)))
}

/// # Summary
/// 将看板信息填入页面模板。
///
/// # Logic
/// 1. 看板名称已在配置校验中限制为安全字符，可直接拼入脚本中的接口地址。
/// 2. 轮询间隔以毫秒写入脚本，最小 1 秒。
/// 3. 标题最后填入并做 HTML 转义，标题中的占位符文本不会被再次替换。
pub fn render_dashboard(board: &Board, refresh_interval: Duration) -> String {
    let refresh_ms = refresh_interval.max(Duration::from_secs(1)).as_millis();
    TEMPLATE
        .replace("{{endpoint}}", &format!("/api/{}", board.name))
        .replace("{{refresh_ms}}", &refresh_ms.to_string())
        .replace("{{title}}", &escape_html(&board.title))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
