use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use pulse_core::common::time::{RealTimeProvider, TimeProvider};
use pulse_core::common::tls::ensure_crypto_provider;
use pulse_core::config::FeedConfig;
use pulse_core::market::entity::PriceBar;
use pulse_core::market::error::MarketError;
use pulse_core::market::port::QuoteSource;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

// 回溯窗口最多覆盖的交易日数，防止异常配置生成过大的时间跨度
const MAX_LOOKBACK_SESSIONS: usize = 365;

/// # Summary
/// Yahoo Finance 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，超时由配置决定。
/// - 不做重试，失败直接映射为 `MarketError`。
#[derive(Clone)]
pub struct YahooProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// API 根地址，如 `https://query1.finance.yahoo.com`
    base_url: String,
    /// 计算回溯窗口使用的时钟
    clock: Arc<dyn TimeProvider>,
}

impl YahooProvider {
    /// # Summary
    /// 根据行情源配置创建 YahooProvider。
    ///
    /// # Logic
    /// 1. 确保 rustls 加密后端已安装。
    /// 2. 设置伪装浏览器 Header (User-Agent) 以减少被拦截风险。
    /// 3. 按配置的超时初始化 reqwest 客户端。
    ///
    /// # Arguments
    /// * `config`: 行情源配置。
    ///
    /// # Returns
    /// 成功返回 YahooProvider，Header 或客户端构建失败返回 `MarketError::Network`。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        ensure_crypto_provider();

        let mut headers = reqwest::header::HeaderMap::new();
        let user_agent = config
            .user_agent
            .parse()
            .map_err(|e| MarketError::Network(format!("invalid user agent: {e}")))?;
        headers.insert(reqwest::header::USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| MarketError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            clock: Arc::new(RealTimeProvider),
        })
    }

    /// 替换时钟，主要用于测试固定回溯窗口
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// 按当前时钟计算请求窗口
    fn request_window(&self, sessions: usize) -> (DateTime<Utc>, DateTime<Utc>) {
        lookback_window(self.clock.now(), sessions)
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

/// # Summary
/// 计算请求的时间窗口。
///
/// # Logic
/// 1. 日历天数取 `2 * sessions + 7`，覆盖周末与节假日。
/// 2. 窗口终点为当前时间。
pub(crate) fn lookback_window(now: DateTime<Utc>, sessions: usize) -> (DateTime<Utc>, DateTime<Utc>) {
    let capped = sessions.min(MAX_LOOKBACK_SESSIONS);
    let days = 2 * i64::try_from(capped).unwrap_or(0) + 7;
    (now - Duration::days(days), now)
}

/// # Summary
/// Yahoo API 响应顶层结构。
///
/// # Invariants
/// - 映射自 Yahoo v8 chart 接口。
#[derive(Deserialize, Debug)]
pub(crate) struct YahooResponse {
    chart: YahooChart,
}

/// # Summary
/// Yahoo API 图表数据部分。
#[derive(Deserialize, Debug)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

/// # Summary
/// Yahoo API 错误详情。
#[derive(Deserialize, Debug)]
struct YahooError {
    #[serde(default)]
    code: String,
    description: String,
}

/// # Summary
/// Yahoo API 单个时间序列结果。
///
/// # Invariants
/// - 区间内无交易时 `timestamp` 字段缺失，按空序列处理。
#[derive(Deserialize, Debug)]
struct YahooResult {
    #[serde(default)]
    meta: YahooMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: YahooIndicators,
}

/// # Summary
/// Yahoo API 元数据，只关心交易所时区偏移。
#[derive(Deserialize, Debug, Default)]
struct YahooMeta {
    // 交易所相对 UTC 的秒数偏移
    #[serde(default)]
    gmtoffset: i64,
}

/// # Summary
/// Yahoo API 指标容器。
#[derive(Deserialize, Debug)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

/// # Summary
/// Yahoo API 原始报价数据，只取开盘与收盘。
#[derive(Deserialize, Debug)]
struct YahooQuote {
    /// 开盘价列表
    #[serde(default)]
    open: Vec<Option<f64>>,
    /// 收盘价列表
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl YahooError {
    fn into_market_error(self) -> MarketError {
        if self.code.eq_ignore_ascii_case("Not Found") {
            MarketError::NotFound(self.description)
        } else {
            MarketError::Unknown(self.description)
        }
    }
}

/// # Summary
/// 将 chart 响应转换为日线序列。
///
/// # Logic
/// 1. 若响应携带 error 对象则直接返回对应错误。
/// 2. 按时间戳逐根提取 open/close，缺失收盘价的 K 线跳过；开盘价缺失时保留为 `None`。
/// 3. 时间戳加上 `gmtoffset` 后取日期，作为交易所当地交易日。
/// 4. 连续两根同日期的 K 线只保留后者（盘中实时 K 线会与日线重复）。
/// 5. 截取最后 `sessions` 根。
pub(crate) fn parse_chart(
    response: YahooResponse,
    sessions: usize,
) -> Result<Vec<PriceBar>, MarketError> {
    if let Some(err) = response.chart.error {
        return Err(err.into_market_error());
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| results.pop())
        .ok_or_else(|| MarketError::NotFound("empty chart result".into()))?;

    let Some(quote) = result.indicators.quote.first() else {
        if result.timestamp.is_empty() {
            return Ok(Vec::new());
        }
        return Err(MarketError::Parse("No quote data".into()));
    };

    let offset = result.meta.gmtoffset;
    let mut bars: Vec<PriceBar> = Vec::with_capacity(result.timestamp.len());

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(close) = quote.close.get(i).copied().flatten() else {
            continue;
        };
        let open = quote.open.get(i).copied().flatten();

        let date = DateTime::from_timestamp(ts.saturating_add(offset), 0)
            .ok_or_else(|| MarketError::Parse(format!("invalid timestamp {ts}")))?
            .date_naive();

        let bar = PriceBar { date, open, close };
        match bars.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => bars.push(bar),
        }
    }

    let skip = bars.len().saturating_sub(sessions);
    Ok(bars.split_off(skip))
}

#[async_trait]
impl QuoteSource for YahooProvider {
    /// # Summary
    /// 从 Yahoo Finance 抓取最近若干交易日的日线数据。
    ///
    /// # Logic
    /// 1. 根据当前时间计算 period1 / period2。
    /// 2. 发起异步请求，HTTP 404 映射为 NotFound，其余非 2xx 映射为 Network。
    /// 3. 解析嵌套的 JSON 数据并截取最近 `sessions` 根日线。
    ///
    /// # Arguments
    /// * `symbol`: 证券代码。
    /// * `sessions`: 需要的交易日数量。
    ///
    /// # Returns
    /// 成功返回按时间升序的日线列表，失败返回 MarketError。
    async fn fetch_recent_bars(
        &self,
        symbol: &str,
        sessions: usize,
    ) -> Result<Vec<PriceBar>, MarketError> {
        let (start, end) = self.request_window(sessions);

        let resp = self
            .client
            .get(self.chart_url(symbol))
            .query(&[
                ("period1", start.timestamp().to_string().as_str()),
                ("period2", end.timestamp().to_string().as_str()),
                ("interval", "1d"),
            ])
            .send()
            .await
            .map_err(|e| MarketError::Network(e.to_string()))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            let description = resp
                .json::<YahooResponse>()
                .await
                .ok()
                .and_then(|body| body.chart.error)
                .map(|err| err.description)
                .unwrap_or_else(|| format!("no chart for {symbol}"));
            return Err(MarketError::NotFound(description));
        }
        if !status.is_success() {
            return Err(MarketError::Network(format!("HTTP {}", status)));
        }

        let json: YahooResponse = resp
            .json()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))?;

        let bars = parse_chart(json, sessions)?;
        debug!(symbol, bars = bars.len(), "fetched daily bars from Yahoo");
        Ok(bars)
    }
}
