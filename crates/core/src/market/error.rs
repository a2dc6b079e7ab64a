use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 所有变体只携带字符串描述，可廉价克隆。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 数据解析错误，如 JSON 格式不匹配
    #[error("Parse error: {0}")]
    Parse(String),
    // 请求的证券不存在或无数据 (404)
    #[error("Data not found: {0}")]
    NotFound(String),
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// # Summary
/// 指标归约错误：两根 K 线存在，但无法得出有效的涨跌幅。
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceError {
    // 前收盘价为 0，无法计算百分比
    #[error("previous close is zero")]
    ZeroPreviousClose,
    // 价格中出现 NaN 或无穷大
    #[error("price is not a finite number")]
    NonFinite,
    // 最新交易日缺少开盘价
    #[error("latest session has no open price")]
    MissingOpen,
}
