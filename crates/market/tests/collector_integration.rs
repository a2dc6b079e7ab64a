use async_trait::async_trait;
use pulse_core::common::SymbolList;
use pulse_core::config::CollectorConfig;
use pulse_core::market::entity::PriceBar;
use pulse_core::market::error::MarketError;
use pulse_core::market::port::QuoteSource;
use pulse_core::snapshot::port::SnapshotProvider;
use pulse_core::testing::StaticQuoteSource;
use pulse_market::collector::BatchCollector;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn collector(source: Arc<dyn QuoteSource>, concurrency: usize) -> BatchCollector {
    BatchCollector::new(
        source,
        &CollectorConfig {
            sessions: 5,
            concurrency,
        },
    )
}

/// # Summary
/// 一个证券成功、一个证券源错误：成功结果保留，错误以消息记录。
#[tokio::test]
async fn test_success_and_source_failure() {
    let source = Arc::new(
        StaticQuoteSource::new()
            .with_bars("A", &[(100.0, 110.0), (111.0, 121.0)])
            .with_error("B", MarketError::Network("connection reset".into())),
    );
    let collector = collector(source, 1);

    let snapshot = collector.collect(&SymbolList::new(["A", "B"])).await;

    assert_eq!(snapshot.data.len(), 1);
    let a = &snapshot.data[0];
    assert_eq!(a.symbol, "A");
    assert_eq!(a.price, 121.0);
    assert_eq!(a.open_price, 111.0);
    assert_eq!(a.percent_change, (121.0 - 110.0) / 110.0 * 100.0);

    let errors: Vec<String> = snapshot.errors.iter().map(ToString::to_string).collect();
    assert_eq!(errors, vec!["Error for B: Network error: connection reset"]);
}

/// # Summary
/// 只有一根日线时记录数据不足。
#[tokio::test]
async fn test_single_bar_is_insufficient() {
    let source = Arc::new(StaticQuoteSource::new().with_bars("C", &[(10.0, 11.0)]));
    let collector = collector(source, 1);

    let snapshot = collector.collect(&SymbolList::new(["C"])).await;

    assert!(snapshot.data.is_empty());
    let errors: Vec<String> = snapshot.errors.iter().map(ToString::to_string).collect();
    assert_eq!(errors, vec!["No sufficient data found for C"]);
}

/// # Summary
/// 空列表不访问行情源，返回空快照。
#[tokio::test]
async fn test_empty_list() {
    let source = Arc::new(StaticQuoteSource::new());
    let collector = collector(source.clone(), 1);

    let snapshot = collector.collect(&SymbolList::new(Vec::<String>::new())).await;

    assert!(snapshot.data.is_empty());
    assert!(snapshot.errors.is_empty());
    assert_eq!(source.total_calls(), 0);
}

/// # Summary
/// 只使用最后两根日线，更早的数据不影响结果。
#[tokio::test]
async fn test_uses_two_most_recent_sessions() {
    let source = Arc::new(StaticQuoteSource::new().with_bars(
        "D",
        &[(1.0, 1.0), (2.0, 2.0), (3.0, 50.0), (48.0, 40.0)],
    ));
    let collector = collector(source, 1);

    let snapshot = collector.collect(&SymbolList::new(["D"])).await;

    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(snapshot.data[0].price, 40.0);
    assert_eq!(snapshot.data[0].open_price, 48.0);
    assert_eq!(snapshot.data[0].percent_change, -20.0);
}

/// # Summary
/// 前收盘价为 0 时记录错误而非输出无穷大。
#[tokio::test]
async fn test_zero_previous_close_is_reported() {
    let source = Arc::new(StaticQuoteSource::new().with_bars("Z", &[(1.0, 0.0), (1.0, 2.0)]));
    let collector = collector(source, 1);

    let snapshot = collector.collect(&SymbolList::new(["Z"])).await;

    assert!(snapshot.data.is_empty());
    assert_eq!(
        snapshot.errors[0].to_string(),
        "Error for Z: previous close is zero"
    );
}

/// # Summary
/// 失败证券不会移除或打乱其他证券的顺序，两组结果互不相交。
#[tokio::test]
async fn test_order_preserved_and_disjoint() {
    let source = Arc::new(
        StaticQuoteSource::new()
            .with_bars("S1", &[(1.0, 10.0), (1.0, 11.0)])
            .with_bars("S2", &[(1.0, 10.0)])
            .with_bars("S3", &[(1.0, 10.0), (1.0, 9.0)])
            .with_error("S4", MarketError::Parse("bad json".into()))
            .with_bars("S5", &[(1.0, 20.0), (1.0, 21.0)]),
    );
    let collector = collector(source, 1);
    let symbols = SymbolList::new(["S1", "S2", "S3", "S4", "S5", "S6"]);

    let snapshot = collector.collect(&symbols).await;

    let data: Vec<&str> = snapshot.data.iter().map(|q| q.symbol.as_str()).collect();
    let errors: Vec<&str> = snapshot.errors.iter().map(|e| e.symbol.as_str()).collect();
    assert_eq!(data, vec!["S1", "S3", "S5"]);
    assert_eq!(errors, vec!["S2", "S4", "S6"]);

    let data_set: HashSet<&str> = data.into_iter().collect();
    assert!(errors.iter().all(|s| !data_set.contains(s)));
}

/// # Summary
/// 每次刷新都重新访问行情源。
#[tokio::test]
async fn test_no_caching_between_cycles() {
    let source = Arc::new(
        StaticQuoteSource::new()
            .with_bars("A", &[(1.0, 1.0), (1.0, 2.0)])
            .with_bars("B", &[(1.0, 1.0), (1.0, 2.0)]),
    );
    let collector = collector(source.clone(), 1);
    let symbols = SymbolList::new(["A", "B"]);

    collector.snapshot(&symbols).await;
    collector.snapshot(&symbols).await;

    assert_eq!(source.calls_for("A"), 2);
    assert_eq!(source.calls_for("B"), 2);
    assert_eq!(source.total_calls(), 4);
}

/// # Summary
/// 延迟递减的行情源：越靠前的证券返回越慢，同时记录最大在途请求数。
struct SlowSource {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

#[async_trait]
impl QuoteSource for SlowSource {
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        _sessions: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let index: u32 = symbol.trim_start_matches('S').parse().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(u64::from(60 - index * 10))).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(pulse_core::testing::daily_bars(&[(1.0, 100.0), (1.0, 100.0 + f64::from(index))]))
    }
}

/// # Summary
/// 并发采集时仍按输入顺序输出，且在途请求不超过上限。
#[tokio::test]
async fn test_bounded_concurrency_keeps_order() {
    let source = Arc::new(SlowSource {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let collector = collector(source.clone(), 2);
    let symbols = SymbolList::new(["S1", "S2", "S3", "S4", "S5"]);

    let snapshot = collector.collect(&symbols).await;

    let data: Vec<&str> = snapshot.data.iter().map(|q| q.symbol.as_str()).collect();
    assert_eq!(data, vec!["S1", "S2", "S3", "S4", "S5"]);
    assert!(source.peak.load(Ordering::SeqCst) <= 2);
    assert!(snapshot.errors.is_empty());
}

/// # Summary
/// 并发度为 1 时严格顺序执行。
#[tokio::test]
async fn test_sequential_by_default() {
    let source = Arc::new(SlowSource {
        in_flight: AtomicUsize::new(0),
        peak: AtomicUsize::new(0),
    });
    let collector = BatchCollector::new(source.clone(), &CollectorConfig::default());

    collector.collect(&SymbolList::new(["S1", "S2", "S3"])).await;

    assert_eq!(source.peak.load(Ordering::SeqCst), 1);
}

/// 返回固定日线的行情源，用于构造开盘价缺失的场景
struct FixedBarsSource(Vec<PriceBar>);

#[async_trait]
impl QuoteSource for FixedBarsSource {
    async fn fetch_recent_bars(
        &self,
        _symbol: &str,
        _sessions: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        Ok(self.0.clone())
    }
}

/// # Summary
/// 前一交易日缺开盘价时仍以其收盘价为基准；最新交易日缺开盘价时记录错误。
#[tokio::test]
async fn test_missing_open_prices() {
    let mut bars = pulse_core::testing::daily_bars(&[(100.0, 100.0), (0.0, 200.0), (205.0, 210.0)]);
    bars[1].open = None;
    let snapshot = collector(Arc::new(FixedBarsSource(bars.clone())), 1)
        .collect(&SymbolList::new(["X"]))
        .await;

    assert_eq!(snapshot.data.len(), 1);
    assert_eq!(snapshot.data[0].percent_change, 5.0);
    assert_eq!(snapshot.data[0].open_price, 205.0);

    bars[2].open = None;
    let snapshot = collector(Arc::new(FixedBarsSource(bars)), 1)
        .collect(&SymbolList::new(["X"]))
        .await;

    assert!(snapshot.data.is_empty());
    let errors: Vec<String> = snapshot.errors.iter().map(ToString::to_string).collect();
    assert_eq!(errors, vec!["Error for X: latest session has no open price"]);
}
