use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod time;
pub mod tls;

/// # Summary
/// 有序、不可变的证券代码列表，每个看板 (Board) 持有一份。
///
/// # Invariants
/// - 构造后内容不可修改，克隆只增加引用计数。
/// - 保持配置中的原始顺序，快照输出顺序以此为准。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolList(Arc<[String]>);

impl SymbolList {
    /// 从任意字符串序列构造列表
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(symbols.into_iter().map(Into::into).collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

}

impl From<Vec<String>> for SymbolList {
    fn from(symbols: Vec<String>) -> Self {
        Self(symbols.into())
    }
}

impl From<SymbolList> for Vec<String> {
    fn from(list: SymbolList) -> Self {
        list.0.to_vec()
    }
}
