//! 叙述文本

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 生成服务返回的 token 用量
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// 附在结构化结果上的叙述文本
///
/// `source` 标明文本来自外部生成服务还是本地模板；`text` 永不为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum NarrativeResult {
    External {
        text: String,
        model: String,
        timestamp: DateTime<Utc>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        usage: Option<TokenUsage>,
    },
    Fallback {
        text: String,
        timestamp: DateTime<Utc>,
    },
}

impl NarrativeResult {
    pub fn external(text: String, model: String, usage: Option<TokenUsage>) -> Self {
        NarrativeResult::External {
            text,
            model,
            timestamp: Utc::now(),
            usage,
        }
    }

    pub fn fallback(text: String) -> Self {
        NarrativeResult::Fallback {
            text,
            timestamp: Utc::now(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            NarrativeResult::External { text, .. } | NarrativeResult::Fallback { text, .. } => {
                text
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, NarrativeResult::Fallback { .. })
    }
}
