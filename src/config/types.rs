//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::voice::{VoiceConfig, DEFAULT_VOICE};

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 默认合成参数
    #[serde(default)]
    pub voice: VoiceSettings,

    /// 输入文件配置
    #[serde(default)]
    pub input: InputConfig,

    /// 章节导出配置
    #[serde(default)]
    pub export: ExportConfig,

    /// 模拟语音引擎配置
    #[serde(default)]
    pub engine: EngineConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 默认合成参数
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceSettings {
    /// 音色名称，`default` 表示系统默认
    #[serde(default = "default_voice")]
    pub name: String,

    #[serde(default = "default_speed")]
    pub speed: f32,

    #[serde(default = "default_pitch")]
    pub pitch: f32,

    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_voice() -> String {
    DEFAULT_VOICE.to_string()
}

fn default_speed() -> f32 {
    1.0
}

fn default_pitch() -> f32 {
    1.0
}

fn default_volume() -> f32 {
    0.8
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            name: default_voice(),
            speed: default_speed(),
            pitch: default_pitch(),
            volume: default_volume(),
        }
    }
}

impl VoiceSettings {
    pub fn to_voice_config(&self) -> VoiceConfig {
        VoiceConfig {
            voice: self.name.clone(),
            speed: self.speed,
            pitch: self.pitch,
            volume: self.volume,
        }
    }
}

/// 输入文件配置
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// 文件最大大小（字节），默认 10MB
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,

    /// 接受的扩展名
    #[serde(default = "default_accepted_extensions")]
    pub accepted_extensions: Vec<String>,

    /// 自定义章节标题正则，未设置时使用内置规则
    #[serde(default)]
    pub heading_pattern: Option<String>,
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10 MB
}

fn default_accepted_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
            accepted_extensions: default_accepted_extensions(),
            heading_pattern: None,
        }
    }
}

/// 章节导出配置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// 导出目录
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("data/exports")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

/// 模拟语音引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// 每 1000 字符的合成延迟（毫秒）
    #[serde(default = "default_latency")]
    pub latency_ms_per_1k_chars: u64,

    /// 1.0 倍速下每秒朗读字符数
    #[serde(default = "default_chars_per_second")]
    pub chars_per_second: f32,

    /// 播放进度上报间隔（毫秒）
    #[serde(default = "default_tick_ms")]
    pub playback_tick_ms: u64,
}

fn default_latency() -> u64 {
    200
}

fn default_chars_per_second() -> f32 {
    15.0
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            latency_ms_per_1k_chars: default_latency(),
            chars_per_second: default_chars_per_second(),
            playback_tick_ms: default_tick_ms(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
