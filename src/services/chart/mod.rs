//! 排盘服务
//!
//! 紫微斗数排盘本身由外部排盘库完成，这里只定义调用边界，并把它的原始
//! 输出标准化为固定的十二宫结构。

pub mod http;
pub mod normalizer;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ChartConfig;
use crate::error::{AppError, Result};

pub use http::HttpChartProvider;
pub use normalizer::{normalize, time_slot};

/// 排盘错误
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("排盘服务不可用: {0}")]
    Unavailable(String),

    #[error("排盘服务返回状态码 {0}")]
    Status(u16),

    #[error("排盘结果格式错误: {0}")]
    InvalidResponse(String),

    #[error("命盘中缺少宫位: {0}")]
    MissingPalace(String),

    #[error("宫位 {name} 数据格式错误: {source}")]
    MalformedPalace {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<reqwest::Error> for ChartError {
    fn from(e: reqwest::Error) -> Self {
        ChartError::Unavailable(e.to_string())
    }
}

/// 排盘参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AstrolabeQuery {
    /// `YYYY-MM-DD`
    pub solar_date: String,
    /// 时辰序号 0..=11
    pub time_index: u8,
    /// 性别参数
    pub gender: &'static str,
    pub locale: String,
}

/// 排盘库边界
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartProvider: Send + Sync {
    async fn astrolabe(&self, query: &AstrolabeQuery) -> std::result::Result<RawChart, ChartError>;
}

/// 始终不可用的排盘后端
pub struct DisabledChartProvider;

#[async_trait]
impl ChartProvider for DisabledChartProvider {
    async fn astrolabe(&self, _query: &AstrolabeQuery) -> std::result::Result<RawChart, ChartError> {
        Err(ChartError::Unavailable("排盘后端未启用".to_string()))
    }
}

pub fn create_chart_provider(config: &ChartConfig) -> Result<Arc<dyn ChartProvider>> {
    match config.backend.as_str() {
        "http" => {
            let provider = HttpChartProvider::new(&config.service_url, config.timeout())
                .map_err(|e| AppError::Config(e.to_string()))?;
            Ok(Arc::new(provider))
        }
        "disabled" => Ok(Arc::new(DisabledChartProvider)),
        other => Err(AppError::Config(format!("未知的排盘后端: {}", other))),
    }
}

/// 排盘库的原始输出
///
/// 形状不受本服务控制，读取时逐项容错。
#[derive(Debug, Clone, PartialEq)]
pub struct RawChart(Value);

impl RawChart {
    pub fn from_value(value: Value) -> std::result::Result<Self, ChartError> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(ChartError::InvalidResponse(
                "astrolabe is not a JSON object".to_string(),
            ))
        }
    }

    /// 字符串类型的描述字段（`lunarDate`、`soul` 等）
    pub fn descriptor(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// 按宫名读取宫位
    ///
    /// `palaces` 可以是数组（每项带 `name`）或以宫名为键的对象。
    /// 宫名比较时忽略末尾的“宫”字。
    pub fn palace(&self, name: &str) -> std::result::Result<RawPalace, ChartError> {
        let wanted = name.trim_end_matches('宫');
        let found = match self.0.get("palaces") {
            Some(Value::Array(items)) => items.iter().find(|item| {
                item.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.trim_end_matches('宫') == wanted)
            }),
            Some(Value::Object(map)) => map
                .iter()
                .find(|(key, _)| key.trim_end_matches('宫') == wanted)
                .map(|(_, v)| v),
            _ => None,
        };

        let value = found.ok_or_else(|| ChartError::MissingPalace(name.to_string()))?;
        RawPalace::deserialize(value).map_err(|source| ChartError::MalformedPalace {
            name: name.to_string(),
            source,
        })
    }
}

/// 原始宫位
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPalace {
    #[serde(default)]
    pub earthly_branch: Option<String>,
    #[serde(default)]
    pub major_stars: Option<Vec<RawStar>>,
    #[serde(default)]
    pub minor_stars: Option<Vec<RawStar>>,
}

/// 原始星曜
#[derive(Debug, Clone, Deserialize)]
pub struct RawStar {
    pub name: String,
    #[serde(default)]
    pub brightness: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub mutagen: Option<String>,
}
