//! Request Validation Module
//!
//! Turns loosely-typed request bodies into validated domain inputs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error types
///
/// Display strings are user-facing and returned verbatim in 400 responses.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("缺少必需的出生信息参数: {field}")]
    MissingField { field: String },

    #[error("霍兰德测试需要{expected}道题的完整答案，{field} 收到 {got} 项")]
    AnswerCount {
        field: String,
        expected: usize,
        got: usize,
    },

    #[error("霍兰德测试答案 {field} 必须是数组")]
    NotASequence { field: String },

    #[error("参数 {field} 超出范围: 允许 {min}..={max}，实际为 {got}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        got: i64,
    },

    #[error("出生日期无效: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("无法识别的性别: {value}")]
    InvalidGender { value: String },

    #[error("参数 {field} 过长 (最多 {max} 个字符, 实际 {got})")]
    TooLong {
        field: String,
        max: usize,
        got: usize,
    },
}

impl ValidationError {
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field } => field.as_str(),
            Self::AnswerCount { field, .. } => field.as_str(),
            Self::NotASequence { field } => field.as_str(),
            Self::OutOfRange { field, .. } => field.as_str(),
            Self::InvalidDate { .. } => "birthDay",
            Self::InvalidGender { .. } => "gender",
            Self::TooLong { field, .. } => field.as_str(),
        }
    }
}

/// Validation result type
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;

/// Request validation trait
///
/// Consumes a request DTO and produces the domain input the services accept.
pub trait Validatable {
    type Validated;

    /// Validate the request data
    fn validate(self) -> ValidationResult<Self::Validated>;
}

/// Common validation helpers
pub mod validators {
    use super::*;

    /// Maximum length of free-text descriptors (name, location)
    pub const MAX_TEXT_LENGTH: usize = 64;

    /// Sanitize string input
    pub fn sanitize_string(input: &str) -> String {
        // Remove null bytes and control characters
        input
            .trim()
            .chars()
            .filter(|c| !c.is_control())
            .collect()
    }

    /// Sanitize an optional descriptor and fall back to `default` when it is blank.
    pub fn text_or_default(
        field: &str,
        value: Option<&str>,
        default: &str,
    ) -> ValidationResult<String> {
        let cleaned = value.map(sanitize_string).unwrap_or_default();
        if cleaned.is_empty() {
            return Ok(default.to_string());
        }

        let got = cleaned.chars().count();
        if got > MAX_TEXT_LENGTH {
            return Err(ValidationError::TooLong {
                field: field.to_string(),
                max: MAX_TEXT_LENGTH,
                got,
            });
        }
        Ok(cleaned)
    }

    /// Require a present value inside an inclusive range
    pub fn required_in_range(
        field: &str,
        value: Option<i64>,
        min: i64,
        max: i64,
    ) -> ValidationResult<i64> {
        let value = value.ok_or_else(|| ValidationError::MissingField {
            field: field.to_string(),
        })?;
        in_range(field, value, min, max)
    }

    /// Check a value against an inclusive range
    pub fn in_range(field: &str, value: i64, min: i64, max: i64) -> ValidationResult<i64> {
        if value < min || value > max {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min,
                max,
                got: value,
            });
        }
        Ok(value)
    }
}
