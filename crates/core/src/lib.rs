//! # `pulse-core` - 领域核心
//!
//! 行情看板的实体、错误与端口 (Port) 定义。
//! 本 crate 不包含任何网络或 HTTP 实现，具体适配器位于 `pulse-feed` 与 `pulse-api`。

pub mod common;
pub mod config;
pub mod market;
pub mod snapshot;

#[cfg(feature = "test-utils")]
pub mod testing;
