//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（SpeechEngine、TextSource、ChapterExport）
//! - controller: 章节合成与播放控制器
//! - commands: 用户命令及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod controller;
pub mod error;
pub mod ports;

// Re-exports
pub use commands::{
    handlers::PlaybackCommandHandler, CommandOutcome, PlaybackCommand, PlaybackCommandResponse,
};

pub use controller::{GenerateAllReport, GenerateOutcome, PlaybackController};

pub use error::ApplicationError;

pub use ports::{
    // Chapter export
    ChapterExportPort,
    ExportError,
    // Speech engine
    PlaybackEvent,
    SpeechEnginePort,
    SpeechError,
    SynthesisRequest,
    SynthesisResult,
    // Text source
    TextSourceError,
    TextSourcePort,
};
