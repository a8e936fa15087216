//! Chapter Context - 章节限界上下文
//!
//! 职责:
//! - 章节实体与合成状态机
//! - 合成结果引用

mod entities;
mod errors;

pub use entities::{AudioHandle, Chapter, ChapterAudio, ChapterStatus};
pub use errors::ChapterError;
