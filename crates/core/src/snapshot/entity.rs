use crate::market::entity::QuoteResult;
use crate::market::error::{MarketError, ReduceError};
use std::fmt;

/// # Summary
/// 单个证券失败的原因。
#[derive(Debug, Clone, PartialEq)]
pub enum FailureReason {
    // 返回的交易日不足两个
    InsufficientData { received: usize },
    // 行情源调用本身失败
    Source(MarketError),
    // K 线存在但无法归约为有效指标
    Unusable(ReduceError),
}

/// # Summary
/// 面向用户的单证券错误记录。
///
/// # Invariants
/// - 序列化为一条可读字符串，格式与 `Display` 一致。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    pub symbol: String,
    pub reason: FailureReason,
}

impl ErrorRecord {
    pub fn insufficient_data(symbol: impl Into<String>, received: usize) -> Self {
        Self {
            symbol: symbol.into(),
            reason: FailureReason::InsufficientData { received },
        }
    }

    pub fn source(symbol: impl Into<String>, err: MarketError) -> Self {
        Self {
            symbol: symbol.into(),
            reason: FailureReason::Source(err),
        }
    }

    pub fn unusable(symbol: impl Into<String>, err: ReduceError) -> Self {
        Self {
            symbol: symbol.into(),
            reason: FailureReason::Unusable(err),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::InsufficientData { .. } => {
                write!(f, "No sufficient data found for {}", self.symbol)
            }
            FailureReason::Source(err) => write!(f, "Error for {}: {}", self.symbol, err),
            FailureReason::Unusable(err) => write!(f, "Error for {}: {}", self.symbol, err),
        }
    }
}

/// # Summary
/// 单个证券在一次刷新中的结果：成功指标或错误记录，二者必居其一。
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Quote(QuoteResult),
    Failed(ErrorRecord),
}

/// # Summary
/// 一次完整刷新周期的结果集。
///
/// # Invariants
/// - `data` 与 `errors` 各自保持输入列表中的相对顺序。
/// - 同一证券不会同时出现在两个列表中。
/// - 每次请求重新构建，不缓存、不持久化。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub data: Vec<QuoteResult>,
    pub errors: Vec<ErrorRecord>,
}

impl Snapshot {
    /// # Summary
    /// 将按输入顺序排列的逐证券结果划分为成功与失败两组。
    ///
    /// # Arguments
    /// * `outcomes`: 与证券列表顺序一致的结果序列。
    ///
    /// # Returns
    /// 划分后的快照。
    pub fn from_outcomes<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = SymbolOutcome>,
    {
        let mut snapshot = Self::default();
        for outcome in outcomes {
            match outcome {
                SymbolOutcome::Quote(quote) => snapshot.data.push(quote),
                SymbolOutcome::Failed(record) => snapshot.errors.push(record),
            }
        }
        snapshot
    }
}
