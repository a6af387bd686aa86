//! DTO 模块
//!
//! 数据传输对象，用于 API 请求和响应的序列化。

pub mod combined_dto;
pub mod holland_dto;
pub mod ziwei_dto;

pub use combined_dto::*;
pub use holland_dto::*;
pub use ziwei_dto::*;

use serde::Serialize;

/// 成功响应
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 恒为 true
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }

    pub fn with_message(data: T, message: &'static str) -> Self {
        Self {
            success: true,
            message: Some(message),
            data,
        }
    }
}
