//! 霍兰德测试答卷

use serde_json::Value;

use crate::security::validation::{ValidationError, ValidationResult};

/// 题目数量
pub const ANSWER_COUNT: usize = 24;

/// 单题最高评分
pub const MAX_RATING: u8 = 5;

/// 24 道题的评分
///
/// 长度在构造时保证。缺失、非整数或超出 0..=5 的单项按 0 计，不视为错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryAnswer([u8; ANSWER_COUNT]);

impl InventoryAnswer {
    pub fn new(ratings: [u8; ANSWER_COUNT]) -> Self {
        Self(ratings.map(|r| if r > MAX_RATING { 0 } else { r }))
    }

    /// 从请求中的 JSON 值构造
    pub fn from_json(field: &str, value: Option<&Value>) -> ValidationResult<Self> {
        let items = match value {
            None | Some(Value::Null) => {
                return Err(ValidationError::AnswerCount {
                    field: field.to_string(),
                    expected: ANSWER_COUNT,
                    got: 0,
                });
            }
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(ValidationError::NotASequence {
                    field: field.to_string(),
                });
            }
        };

        if items.len() != ANSWER_COUNT {
            return Err(ValidationError::AnswerCount {
                field: field.to_string(),
                expected: ANSWER_COUNT,
                got: items.len(),
            });
        }

        let mut ratings = [0u8; ANSWER_COUNT];
        for (slot, item) in ratings.iter_mut().zip(items) {
            *slot = rating_of(item);
        }
        Ok(Self(ratings))
    }

    pub fn rating(&self, index: usize) -> u8 {
        self.0.get(index).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&r| u32::from(r)).sum()
    }
}

/// 答卷人的附加信息
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Respondent {
    pub name: String,
    pub gender: Option<String>,
    /// 前端已有的紫微信息，原样写入提示词
    pub ziwei_info: Option<Value>,
}

fn rating_of(value: &Value) -> u8 {
    value
        .as_f64()
        .filter(|v| v.fract() == 0.0 && (0.0..=f64::from(MAX_RATING)).contains(v))
        .map(|v| v as u8)
        .unwrap_or(0)
}
