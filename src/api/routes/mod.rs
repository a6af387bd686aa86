//! Routes 模块
//!
//! 定义 API 路由。

pub mod combined_routes;
pub mod holland_routes;
pub mod ziwei_routes;
