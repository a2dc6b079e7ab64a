use chrono::NaiveDate;

/// # Summary
/// 单个交易日 (Session) 的价格数据。
///
/// # Invariants
/// - 由行情源产出，本系统只读。
/// - `date` 为交易所当地日期。
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    // 交易日
    pub date: NaiveDate,
    // 开盘价，行情源缺失时为 None
    pub open: Option<f64>,
    // 收盘价 (当日未收盘时为最新成交价)
    pub close: f64,
}

/// # Summary
/// 单个证券在一次刷新周期内的衍生指标。
///
/// # Invariants
/// - `symbol` 必须等于请求时的代码。
/// - `percent_change = (price - previous_close) / previous_close * 100`，保留完整精度，
///   只在展示层四舍五入。
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteResult {
    pub symbol: String,
    // 最新交易日收盘价
    pub price: f64,
    // 相对前一交易日收盘的涨跌幅 (%)
    pub percent_change: f64,
    // 最新交易日开盘价
    pub open_price: f64,
}
