//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（narrator.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["narrator", "narrator.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `NARRATOR_VOICE__NAME=Samantha`
/// - `NARRATOR_VOICE__SPEED=1.25`
/// - `NARRATOR_EXPORT__DIR=/tmp/chapters`
/// - `NARRATOR_LOG__LEVEL=debug`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    builder = builder
        .set_default("voice.name", "default")?
        .set_default("voice.speed", 1.0)?
        .set_default("voice.pitch", 1.0)?
        .set_default("voice.volume", 0.8)?
        .set_default("input.max_file_size", 10 * 1024 * 1024)?
        .set_default("input.accepted_extensions", vec!["txt"])?
        .set_default("export.dir", "data/exports")?
        .set_default("engine.latency_ms_per_1k_chars", 200)?
        .set_default("engine.chars_per_second", 15.0)?
        .set_default("engine.playback_tick_ms", 250)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 前缀 NARRATOR_，层级分隔符 __
    builder = builder.add_source(
        Environment::with_prefix("NARRATOR")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    config
        .voice
        .to_voice_config()
        .validate()
        .map_err(|e| ConfigError::ValidationError(format!("Invalid voice settings: {}", e)))?;

    if config.input.max_file_size == 0 {
        return Err(ConfigError::ValidationError(
            "Max file size cannot be 0".to_string(),
        ));
    }

    if config.input.accepted_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "At least one accepted extension is required".to_string(),
        ));
    }

    if let Some(pattern) = &config.input.heading_pattern {
        Regex::new(pattern).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid heading pattern: {}", e))
        })?;
    }

    if config.export.dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "Export directory cannot be empty".to_string(),
        ));
    }

    if config.engine.chars_per_second <= 0.0 {
        return Err(ConfigError::ValidationError(
            "Engine chars_per_second must be positive".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Narrator Configuration ===");
    tracing::info!(
        "Voice: {} (speed {}, pitch {}, volume {})",
        config.voice.name,
        config.voice.speed,
        config.voice.pitch,
        config.voice.volume
    );
    tracing::info!("Accepted Extensions: {:?}", config.input.accepted_extensions);
    tracing::info!("Max File Size: {} bytes", config.input.max_file_size);
    if let Some(pattern) = &config.input.heading_pattern {
        tracing::info!("Heading Pattern: {}", pattern);
    }
    tracing::info!("Export Directory: {:?}", config.export.dir);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("==============================");
}
