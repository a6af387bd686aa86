//! 请求提取器

use axum::extract::FromRequest;

use crate::error::AppError;

/// JSON 请求体
///
/// 与 `axum::Json` 相同，但解析失败时返回统一的 400 错误响应。
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);
