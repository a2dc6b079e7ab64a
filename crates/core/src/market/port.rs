use crate::market::entity::PriceBar;
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 行情源接口（外部数据提供者）。
///
/// # Invariants
/// - 返回的 K 线按日期从旧到新排列。
/// - 实现者不做重试，失败直接以 `MarketError` 返回。
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// # Summary
    /// 获取某证券最近若干个交易日的日线数据。
    ///
    /// # Logic
    /// 1. 构建数据源请求。
    /// 2. 执行网络请求并解析响应数据。
    /// 3. 截取最近 `sessions` 根 K 线。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `sessions`: 需要的交易日数量上限。
    ///
    /// # Returns
    /// 成功返回按时间升序的 K 线列表（可能少于 `sessions` 根）。
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        sessions: usize,
    ) -> Result<Vec<PriceBar>, MarketError>;
}
