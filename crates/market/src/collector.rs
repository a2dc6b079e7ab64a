use crate::reducer::reduce;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream;
use pulse_core::common::SymbolList;
use pulse_core::config::CollectorConfig;
use pulse_core::market::port::QuoteSource;
use pulse_core::snapshot::entity::{ErrorRecord, Snapshot, SymbolOutcome};
use pulse_core::snapshot::port::SnapshotProvider;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// # Summary
/// 批量采集器：对一个证券列表执行一次刷新周期。
///
/// # Invariants
/// - 单个证券失败不会中断其余证券的处理。
/// - 输出顺序与输入列表一致，与并发度无关。
/// - 无重试、无缓存，每次调用都重新访问行情源。
pub struct BatchCollector {
    // 行情源
    source: Arc<dyn QuoteSource>,
    // 每个证券请求的交易日数量，至少为 2
    sessions: usize,
    // 同时在途的请求上限，1 即顺序执行
    concurrency: usize,
}

impl BatchCollector {
    /// # Summary
    /// 创建采集器。
    ///
    /// # Logic
    /// 1. `sessions` 小于 2 时提升为 2，否则永远无法得到涨跌幅。
    /// 2. `concurrency` 为 0 时按 1 处理。
    pub fn new(source: Arc<dyn QuoteSource>, config: &CollectorConfig) -> Self {
        Self {
            source,
            sessions: config.sessions.max(2),
            concurrency: config.concurrency.max(1),
        }
    }

    /// # Summary
    /// 对整个列表执行一次刷新周期。
    ///
    /// # Logic
    /// 1. 以 `concurrency` 为上限拉取各证券结果，`buffered` 保证按输入顺序产出。
    /// 2. 将结果划分为成功与失败两组。
    /// 3. 记录本周期的统计与耗时。
    ///
    /// # Arguments
    /// * `symbols`: 看板证券列表。
    ///
    /// # Returns
    /// 本周期的快照。
    pub async fn collect(&self, symbols: &SymbolList) -> Snapshot {
        let started = Instant::now();

        // future 是惰性的，只有被 buffered 轮询时才真正发起请求
        let pending: Vec<_> = symbols
            .iter()
            .map(|symbol| self.collect_symbol(symbol))
            .collect();

        let outcomes: Vec<SymbolOutcome> = stream::iter(pending)
            .buffered(self.concurrency)
            .collect()
            .await;

        let snapshot = Snapshot::from_outcomes(outcomes);
        info!(
            symbols = symbols.len(),
            quotes = snapshot.data.len(),
            errors = snapshot.errors.len(),
            elapsed = ?started.elapsed(),
            "refresh cycle finished"
        );
        snapshot
    }

    /// # Summary
    /// 处理单个证券，所有失败路径都转换为 `ErrorRecord`。
    ///
    /// # Logic
    /// 1. 行情源失败 -> 记录源错误。
    /// 2. 少于两根日线 -> 记录数据不足。
    /// 3. 取最后两根日线交给归约函数，归约失败 -> 记录不可用。
    pub async fn collect_symbol(&self, symbol: &str) -> SymbolOutcome {
        let bars = match self.source.fetch_recent_bars(symbol, self.sessions).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(symbol, error = %e, "quote source failed");
                return SymbolOutcome::Failed(ErrorRecord::source(symbol, e));
            }
        };

        let [.., previous, latest] = bars.as_slice() else {
            warn!(symbol, received = bars.len(), "insufficient history");
            return SymbolOutcome::Failed(ErrorRecord::insufficient_data(symbol, bars.len()));
        };

        match reduce(symbol, previous, latest) {
            Ok(quote) => {
                debug!(
                    symbol,
                    price = quote.price,
                    percent_change = quote.percent_change,
                    "quote reduced"
                );
                SymbolOutcome::Quote(quote)
            }
            Err(e) => {
                warn!(symbol, error = %e, "unusable price bars");
                SymbolOutcome::Failed(ErrorRecord::unusable(symbol, e))
            }
        }
    }
}

#[async_trait]
impl SnapshotProvider for BatchCollector {
    async fn snapshot(&self, symbols: &SymbolList) -> Snapshot {
        self.collect(symbols).await
    }
}
