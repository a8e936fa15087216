//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod chapter_export;
mod speech_engine;
mod text_source;

pub use chapter_export::{ChapterExportPort, ExportError};
pub use speech_engine::{
    PlaybackEvent, SpeechEnginePort, SpeechError, SynthesisRequest, SynthesisResult,
};
pub use text_source::{TextSourceError, TextSourcePort};
