//! 测试专用的内存行情源，仅在 `test-utils` feature 下编译。

use crate::market::entity::PriceBar;
use crate::market::error::MarketError;
use crate::market::port::QuoteSource;
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// # Summary
/// 预置数据的行情源，按证券代码返回固定 K 线或固定错误。
///
/// # Invariants
/// - 未登记的代码返回 `MarketError::NotFound`。
/// - 每次调用都会计数，用于验证无缓存行为。
#[derive(Default)]
pub struct StaticQuoteSource {
    fixtures: DashMap<String, Result<Vec<PriceBar>, MarketError>>,
    calls: DashMap<String, usize>,
    total_calls: AtomicUsize,
}

impl StaticQuoteSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以 (open, close) 序列登记 K 线，日期从 2024-01-01 起按日递增
    pub fn with_bars(self, symbol: &str, bars: &[(f64, f64)]) -> Self {
        self.fixtures
            .insert(symbol.to_string(), Ok(daily_bars(bars)));
        self
    }

    /// 登记一个固定错误
    pub fn with_error(self, symbol: &str, err: MarketError) -> Self {
        self.fixtures.insert(symbol.to_string(), Err(err));
        self
    }

    /// 某证券被请求的次数
    pub fn calls_for(&self, symbol: &str) -> usize {
        self.calls.get(symbol).map(|c| *c.value()).unwrap_or(0)
    }

    /// 所有证券的请求总次数
    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }
}

/// 构造按日递增的测试 K 线
pub fn daily_bars(bars: &[(f64, f64)]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or(NaiveDate::MIN);
    bars.iter()
        .zip(0i64..)
        .map(|(&(open, close), day)| PriceBar {
            date: start + Duration::days(day),
            open: Some(open),
            close,
        })
        .collect()
}

#[async_trait]
impl QuoteSource for StaticQuoteSource {
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        sessions: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        *self.calls.entry(symbol.to_string()).or_insert(0) += 1;
        self.total_calls.fetch_add(1, Ordering::SeqCst);

        match self.fixtures.get(symbol) {
            Some(entry) => {
                let bars = entry.value().clone()?;
                let skip = bars.len().saturating_sub(sessions);
                Ok(bars.into_iter().skip(skip).collect())
            }
            None => Err(MarketError::NotFound(format!("unknown symbol {symbol}"))),
        }
    }
}
