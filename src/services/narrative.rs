//! 叙述生成客户端
//!
//! 对外部文本生成服务的单次调用。任何失败（网络错误、非 2xx、响应缺字段、
//! 超时）都折叠为 [`NarrativeOutcome::Unavailable`]，不会以错误形式越过
//! 本模块边界；调用方据此换用模板文本。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::NarrativeConfig;
use crate::error::{AppError, Result};
use crate::models::narrative::TokenUsage;

/// 生成预算
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationBudget {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// 一次生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct NarrativeRequest {
    /// system 角色提示，可缺省
    pub system: Option<String>,
    pub prompt: String,
    pub budget: GenerationBudget,
}

/// 外部服务生成的文本
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedText {
    pub text: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// 不可用原因
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnavailableReason {
    #[error("narrative service not configured")]
    NotConfigured,

    #[error("narrative call timed out after {0:?}")]
    Timeout(Duration),

    #[error("narrative transport error: {0}")]
    Transport(String),

    #[error("narrative service returned status {0}")]
    Status(u16),

    #[error("narrative response malformed: {0}")]
    MalformedResponse(String),
}

/// 生成结果：成功，或需要回退
#[derive(Debug, Clone, PartialEq)]
pub enum NarrativeOutcome {
    Generated(GeneratedText),
    Unavailable(UnavailableReason),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    /// 单次有界调用，不重试
    async fn generate(&self, request: &NarrativeRequest) -> NarrativeOutcome;
}

/// 未配置 API Key 时使用：始终回退
pub struct DisabledNarrativeClient;

#[async_trait]
impl NarrativeClient for DisabledNarrativeClient {
    async fn generate(&self, _request: &NarrativeRequest) -> NarrativeOutcome {
        NarrativeOutcome::Unavailable(UnavailableReason::NotConfigured)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// DeepSeek chat-completions 客户端
pub struct DeepSeekClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl DeepSeekClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    async fn complete(
        &self,
        request: &NarrativeRequest,
    ) -> std::result::Result<GeneratedText, UnavailableReason> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&ChatCompletionRequest {
                model: &self.model,
                messages,
                temperature: request.budget.temperature,
                max_tokens: request.budget.max_tokens,
            })
            .send()
            .await
            .map_err(|e| UnavailableReason::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UnavailableReason::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UnavailableReason::Transport(e.to_string()))?;
        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| UnavailableReason::MalformedResponse(e.to_string()))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| {
                UnavailableReason::MalformedResponse("missing choices[0].message.content".into())
            })?;

        Ok(GeneratedText {
            text,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
            usage: parsed.usage,
        })
    }
}

#[async_trait]
impl NarrativeClient for DeepSeekClient {
    async fn generate(&self, request: &NarrativeRequest) -> NarrativeOutcome {
        debug!(
            max_tokens = request.budget.max_tokens,
            temperature = request.budget.temperature,
            "calling narrative service"
        );

        // 超时即丢弃进行中的请求 future，调用方不会看到半截结果
        match tokio::time::timeout(self.timeout, self.complete(request)).await {
            Ok(Ok(generated)) => NarrativeOutcome::Generated(generated),
            Ok(Err(reason)) => NarrativeOutcome::Unavailable(reason),
            Err(_) => NarrativeOutcome::Unavailable(UnavailableReason::Timeout(self.timeout)),
        }
    }
}

/// 根据配置创建客户端；无可用 API Key 时返回 [`DisabledNarrativeClient`]
pub fn create_narrative_client(config: &NarrativeConfig) -> Result<Arc<dyn NarrativeClient>> {
    match config.api_key() {
        Some(api_key) => {
            let client =
                DeepSeekClient::new(&config.base_url, api_key, &config.model, config.timeout())?;
            Ok(Arc::new(client))
        }
        None => Ok(Arc::new(DisabledNarrativeClient)),
    }
}
