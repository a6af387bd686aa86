//! Handlers 模块
//!
//! HTTP 请求处理程序。

pub mod combined_handler;
pub mod holland_handler;
pub mod ziwei_handler;

pub use combined_handler::*;
pub use holland_handler::*;
pub use ziwei_handler::*;

use crate::error::AppError;

/// 分析端点只接受 POST 和 OPTIONS
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
