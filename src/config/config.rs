use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 占位用的 API Key，视同未配置
const PLACEHOLDER_API_KEYS: &[&str] = &["your-deepseek-api-key-here", "sk-your-deepseek-api-key"];

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 最大请求体大小（字节）
    pub max_request_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            max_request_size: 256 * 1024,
        }
    }
}

/// 叙述生成服务配置（DeepSeek chat-completions 兼容接口）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// API 密钥；缺省时只使用模板文本
    pub api_key: Option<String>,
    /// 服务地址
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// 单次调用超时（毫秒），必须小于宿主 10 秒上限
    pub timeout_ms: u64,
    /// 一次分析内所有生成调用共用的时间预算（毫秒），同样小于宿主上限
    pub pipeline_budget_ms: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.deepseek.com".into(),
            model: "deepseek-chat".into(),
            timeout_ms: 7_000,
            pipeline_budget_ms: 9_000,
        }
    }
}

impl NarrativeConfig {
    /// 可用的 API Key。空字符串和示例占位符视为未配置。
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_API_KEYS.contains(key))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pipeline_budget(&self) -> Duration {
        Duration::from_millis(self.pipeline_budget_ms)
    }
}

/// 排盘服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// 后端类型: "http" 或 "disabled"
    pub backend: String,
    /// 排盘服务地址
    pub service_url: String,
    /// 排盘语言
    pub locale: String,
    /// 请求超时（毫秒）
    pub timeout_ms: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            backend: "disabled".into(),
            service_url: String::new(),
            locale: "zh-CN".into(),
            timeout_ms: 2_000,
        }
    }
}

impl ChartConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
    /// 日志文件目录，缺省输出到 stdout
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            structured: false,
            log_dir: None,
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 叙述生成服务配置
    pub narrative: NarrativeConfig,
    /// 排盘服务配置
    pub chart: ChartConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::development()
    }
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig::default(),
            narrative: NarrativeConfig::default(),
            chart: ChartConfig::default(),
            logging: LoggingConfig {
                level: "debug".into(),
                ..LoggingConfig::default()
            },
            app_name: "zhixiang".into(),
            environment: "development".into(),
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config.logging.structured = true;
        config
    }

    /// 生产环境下不向客户端暴露诊断信息
    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
