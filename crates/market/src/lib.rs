//! # `pulse-market` - 指标计算与批量采集
//!
//! - `reducer`: 由最近两根日线计算涨跌幅的纯函数。
//! - `collector`: 遍历看板证券列表，逐个调用行情源并汇总为快照。
//! - `board`: 由配置构建的看板注册表。

pub mod board;
pub mod collector;
pub mod reducer;
