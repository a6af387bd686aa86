use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use std::path::PathBuf;

/// 宿主对单次请求施加的硬上限（毫秒），叙述调用必须留出余量
pub const HOST_DEADLINE_MS: u64 = 10_000;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 优先级从低到高：
    /// 1. 内置默认值
    /// 2. ./config.toml
    /// 3. `ZHIXIANG_` 前缀的环境变量（`__` 分隔层级）
    /// 4. `DEEPSEEK_API_KEY`
    pub fn load() -> Result<AppConfig, figment::Error> {
        Self::load_from(default_config_path())
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        Self::figment(path).extract()
    }

    fn figment(path: PathBuf) -> Figment {
        Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("ZHIXIANG_").split("__"))
            .merge(
                Env::raw()
                    .only(&["DEEPSEEK_API_KEY"])
                    .map(|_| "narrative.api_key".into()),
            )
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.narrative.base_url.trim().is_empty() {
            return Err(ConfigValidationError::MissingNarrativeUrl);
        }

        if config.narrative.timeout_ms == 0 || config.narrative.timeout_ms >= HOST_DEADLINE_MS {
            return Err(ConfigValidationError::InvalidNarrativeTimeout(
                config.narrative.timeout_ms,
            ));
        }

        if config.narrative.pipeline_budget_ms < config.narrative.timeout_ms
            || config.narrative.pipeline_budget_ms >= HOST_DEADLINE_MS
        {
            return Err(ConfigValidationError::InvalidPipelineBudget(
                config.narrative.pipeline_budget_ms,
            ));
        }

        match config.chart.backend.as_str() {
            "http" if config.chart.service_url.trim().is_empty() => {
                Err(ConfigValidationError::MissingChartServiceUrl)
            }
            "http" | "disabled" => Ok(()),
            other => Err(ConfigValidationError::UnknownChartBackend(other.to_string())),
        }
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("叙述服务地址未配置")]
    MissingNarrativeUrl,

    #[error("叙述服务超时无效: {0}ms，必须在 1..{HOST_DEADLINE_MS}ms 之间")]
    InvalidNarrativeTimeout(u64),

    #[error("生成时间预算无效: {0}ms，必须不小于单次超时且小于 {HOST_DEADLINE_MS}ms")]
    InvalidPipelineBudget(u64),

    #[error("排盘后端为 http 时必须配置 service_url")]
    MissingChartServiceUrl,

    #[error("未知的排盘后端: {0}")]
    UnknownChartBackend(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = ConfigLoader::load()?;
            assert_eq!(config.server.port, 8080);
            assert_eq!(config.narrative.timeout_ms, 7_000);
            assert_eq!(config.chart.backend, "disabled");
            assert!(config.narrative.api_key().is_none());
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                environment = "production"

                [server]
                port = 9000

                [chart]
                backend = "http"
                service_url = "http://localhost:3100"
                "#,
            )?;
            jail.set_env("ZHIXIANG_SERVER__PORT", "9100");
            jail.set_env("ZHIXIANG_NARRATIVE__TIMEOUT_MS", "5000");
            jail.set_env("DEEPSEEK_API_KEY", "sk-test");

            let config = ConfigLoader::load()?;
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.narrative.timeout_ms, 5000);
            assert_eq!(config.narrative.api_key(), Some("sk-test"));
            assert_eq!(config.chart.service_url, "http://localhost:3100");
            assert!(config.is_production());
            assert!(ConfigLoader::validate(&config).is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::development();
        config.narrative.timeout_ms = HOST_DEADLINE_MS;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidNarrativeTimeout(_))
        ));

        let mut config = AppConfig::development();
        config.chart.backend = "http".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::MissingChartServiceUrl)
        ));

        let mut config = AppConfig::development();
        config.chart.backend = "wasm".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::UnknownChartBackend(_))
        ));

        let mut config = AppConfig::development();
        config.narrative.pipeline_budget_ms = HOST_DEADLINE_MS;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPipelineBudget(_))
        ));

        let mut config = AppConfig::development();
        config.narrative.timeout_ms = 5_000;
        config.narrative.pipeline_budget_ms = 4_000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPipelineBudget(4_000))
        ));

        let mut config = AppConfig::development();
        config.server.port = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidPort)
        ));
    }
}
