//! # `pulse-api` - HTTP 网关
//!
//! 使用 `axum` 构建路由，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - `GET /api/{board}`：对看板执行一次刷新并返回 JSON 快照
//! - `GET /`、`GET /dashboard/{board}`：返回自刷新的 HTML 仪表盘
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
