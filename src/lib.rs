//! Narrator - 文本分章朗读器
//!
//! 架构设计: Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Chapter: 章节实体与状态流转
//! - Segmenter: 按标题行切分章节
//! - Voice: 合成参数与可用音色
//! - Playback: 播放状态机
//!
//! 应用层 (application/):
//! - Ports: 端口定义（SpeechEngine, TextSource, ChapterExport）
//! - Controller: 合成与播放编排
//! - Commands: 用户命令与快捷键
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: 模拟语音引擎、文件读取与导出
//! - Events: 控制器事件广播

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
