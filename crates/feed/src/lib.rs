//! 行情源适配器实现。

pub mod yahoo;
