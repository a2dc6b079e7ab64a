//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use pulse_core::market::entity::QuoteResult;
use pulse_core::snapshot::entity::Snapshot;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  快照 DTO
// ============================================================

/// 单个证券的指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    /// 证券代码
    #[schema(example = "HDFCBANK.NS")]
    pub symbol: String,
    /// 最新交易日收盘价
    #[schema(example = 1642.35)]
    pub price: f64,
    /// 相对前一交易日收盘的涨跌幅 (%)，未舍入
    #[schema(example = 1.2345678)]
    pub percent_change: f64,
    /// 最新交易日开盘价
    #[schema(example = 1630.0)]
    pub open_price: f64,
}

/// 一次刷新周期的快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotResponse {
    /// 成功的证券，保持看板中的顺序
    pub data: Vec<QuoteResponse>,
    /// 失败证券的错误描述，保持看板中的顺序
    #[schema(example = json!(["No sufficient data found for PNB.NS"]))]
    pub errors: Vec<String>,
}

impl From<QuoteResult> for QuoteResponse {
    fn from(quote: QuoteResult) -> Self {
        Self {
            symbol: quote.symbol,
            price: quote.price,
            percent_change: quote.percent_change,
            open_price: quote.open_price,
        }
    }
}

impl From<Snapshot> for SnapshotResponse {
    fn from(snapshot: Snapshot) -> Self {
        Self {
            data: snapshot.data.into_iter().map(Into::into).collect(),
            errors: snapshot.errors.iter().map(ToString::to_string).collect(),
        }
    }
}

// ============================================================
//  通用响应 DTO
// ============================================================

/// 构建失败响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// 固定为 false
    pub success: bool,
    /// 错误描述信息
    pub error: String,
}

impl ApiErrorResponse {
    /// 从错误信息构建
    pub fn from_msg(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            error: msg.into(),
        }
    }
}
