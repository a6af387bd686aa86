//! 错误处理模块
//!
//! 定义应用程序的错误类型和错误处理逻辑。
//!
//! 外部依赖（排盘服务、叙述生成服务）的故障不会出现在这里：它们在各自
//! 组件边界内被降级为占位数据或模板文本。能走到 HTTP 层的只有请求结构
//! 错误和内部故障。

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::security::validation::ValidationError;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    /// 参数验证错误
    #[error("{0}")]
    Validation(String),

    /// 请求体无法解析
    #[error("请求数据格式错误: {0}")]
    MalformedBody(String),

    /// 不支持的请求方法
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// 配置错误，只在启动阶段出现
    #[error("配置错误: {0}")]
    Config(String),
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

/// Axum response implementation for AppError
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status: StatusCode = (&self).into();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}

/// 错误响应
///
/// 与成功响应共用 `success` 字段，前端只需判断这一个标志。
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 恒为 false
    pub success: bool,
    /// 错误消息
    pub message: String,
    /// 诊断信息，仅在非生产环境下返回
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    /// 创建新错误响应
    pub fn new(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
            error: None,
        }
    }

    /// 添加诊断信息
    pub fn with_diagnostics(mut self, details: &str) -> Self {
        self.error = Some(details.to_string());
        self
    }
}

/// HTTP 状态码映射
impl From<&AppError> for StatusCode {
    fn from(err: &AppError) -> StatusCode {
        match err {
            AppError::Validation(_) | AppError::MalformedBody(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, AppError>;
