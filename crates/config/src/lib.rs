//! wdms-config - 配置加载库

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use thiserror::Error;

/// 环境变量前缀，嵌套字段使用 `__` 分隔（如 `WDMS_BATCH__MAX_ITEMS`）
pub const ENV_PREFIX: &str = "WDMS_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] figment::Error),
}

/// 遥测配置
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 输出 JSON 格式日志
    #[serde(default)]
    pub json: bool,
    /// 安装 Prometheus recorder
    #[serde(default)]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json: false,
            metrics: false,
        }
    }
}

/// 批处理配置
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// 单次批处理允许的最大条目数
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

fn default_max_items() -> usize {
    500
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
        }
    }
}

/// 定时任务配置
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default)]
    pub enabled: bool,
    /// cron 表达式（含秒字段）
    #[serde(default = "default_cron")]
    pub cron: String,
}

fn default_cron() -> String {
    // 每天凌晨 3 点
    "0 0 3 * * *".to_string()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cron: default_cron(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app_name: String,
    #[serde(default = "default_app_env")]
    pub app_env: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

fn default_app_env() -> String {
    "development".to_string()
}

/// 合并后的配置源：default.toml -> {APP_ENV}.toml -> 环境变量
///
/// 服务可以用它提取自己的配置段
pub fn figment(config_dir: &str) -> Figment {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| default_app_env());

    Figment::new()
        .merge(Toml::file(format!("{}/default.toml", config_dir)))
        .merge(Toml::file(format!("{}/{}.toml", config_dir, env)))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        Ok(figment(config_dir).extract()?)
    }
}
