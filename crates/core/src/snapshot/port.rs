use crate::common::SymbolList;
use crate::snapshot::entity::Snapshot;
use async_trait::async_trait;

/// # Summary
/// 快照服务契约：对一个证券列表执行一次完整刷新。
///
/// # Invariants
/// - 永不返回错误，逐证券的失败记录在 `Snapshot::errors` 中。
/// - 每次调用都重新访问行情源，不做缓存。
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// # Summary
    /// 采集列表中所有证券的最新指标。
    ///
    /// # Arguments
    /// * `symbols`: 看板的证券列表。
    ///
    /// # Returns
    /// 本次刷新周期的快照。
    async fn snapshot(&self, symbols: &SymbolList) -> Snapshot;
}
