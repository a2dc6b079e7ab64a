use pulse_core::market::entity::{PriceBar, QuoteResult};
use pulse_core::market::error::ReduceError;

/// # Summary
/// 计算相对前收盘价的涨跌幅 (%)。
///
/// # Logic
/// 1. 任一价格非有限数值时返回 `NonFinite`。
/// 2. 前收盘价为 0 时返回 `ZeroPreviousClose`。
/// 3. 按 `(price - previous_close) / previous_close * 100` 计算，不做舍入。
pub fn percent_change(previous_close: f64, price: f64) -> Result<f64, ReduceError> {
    if !previous_close.is_finite() || !price.is_finite() {
        return Err(ReduceError::NonFinite);
    }
    if previous_close == 0.0 {
        return Err(ReduceError::ZeroPreviousClose);
    }
    Ok((price - previous_close) / previous_close * 100.0)
}

/// # Summary
/// 将某证券最近两根日线归约为指标结果。
///
/// # Arguments
/// * `symbol`: 请求的证券代码，原样写入结果。
/// * `previous`: 倒数第二个交易日。
/// * `latest`: 最新交易日。
///
/// # Logic
/// 1. 只使用最新交易日的开盘价，缺失时返回 `MissingOpen`。
/// 2. 前一交易日的开盘价不参与计算，可以缺失。
///
/// # Returns
/// 成功返回 `QuoteResult`，价格不可用时返回 `ReduceError`。
pub fn reduce(
    symbol: &str,
    previous: &PriceBar,
    latest: &PriceBar,
) -> Result<QuoteResult, ReduceError> {
    let open_price = latest.open.ok_or(ReduceError::MissingOpen)?;
    if !open_price.is_finite() {
        return Err(ReduceError::NonFinite);
    }
    let percent_change = percent_change(previous.close, latest.close)?;

    Ok(QuoteResult {
        symbol: symbol.to_string(),
        price: latest.close,
        percent_change,
        open_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, open: f64, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            open: Some(open),
            close,
        }
    }

    #[test]
    fn test_reduce_uses_latest_bar_and_previous_close() {
        let quote = reduce("A", &bar(14, 100.0, 110.0), &bar(15, 111.0, 121.0)).unwrap();

        assert_eq!(quote.symbol, "A");
        assert_eq!(quote.price, 121.0);
        assert_eq!(quote.open_price, 111.0);
        assert_eq!(quote.percent_change, (121.0 - 110.0) / 110.0 * 100.0);
        assert!((quote.percent_change - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_negative_change() {
        let quote = reduce("B", &bar(14, 50.0, 200.0), &bar(15, 199.0, 150.0)).unwrap();
        assert_eq!(quote.percent_change, -25.0);
    }

    #[test]
    fn test_unchanged_close_is_zero() {
        let quote = reduce("C", &bar(14, 10.0, 42.5), &bar(15, 43.0, 42.5)).unwrap();
        assert_eq!(quote.percent_change, 0.0);
    }

    #[test]
    fn test_zero_previous_close() {
        assert_eq!(
            reduce("D", &bar(14, 1.0, 0.0), &bar(15, 1.0, 2.0)),
            Err(ReduceError::ZeroPreviousClose)
        );
    }

    #[test]
    fn test_non_finite_prices() {
        assert_eq!(percent_change(f64::NAN, 1.0), Err(ReduceError::NonFinite));
        assert_eq!(percent_change(1.0, f64::INFINITY), Err(ReduceError::NonFinite));
        assert_eq!(
            reduce("E", &bar(14, 1.0, 1.0), &bar(15, f64::NAN, 2.0)),
            Err(ReduceError::NonFinite)
        );
    }

    #[test]
    fn test_previous_open_is_not_needed() {
        let previous = PriceBar {
            open: None,
            ..bar(14, 0.0, 200.0)
        };
        let quote = reduce("F", &previous, &bar(15, 205.0, 210.0)).unwrap();
        assert_eq!(quote.percent_change, 5.0);
        assert_eq!(quote.open_price, 205.0);
    }

    #[test]
    fn test_latest_without_open() {
        let latest = PriceBar {
            open: None,
            ..bar(15, 0.0, 210.0)
        };
        assert_eq!(
            reduce("G", &bar(14, 195.0, 200.0), &latest),
            Err(ReduceError::MissingOpen)
        );
    }
}
