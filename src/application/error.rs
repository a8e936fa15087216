//! 应用层错误定义
//!
//! 控制器操作的统一错误类型。所有错误都是局部可恢复的，出错后模型保持在操作前的状态

use thiserror::Error;

use crate::application::ports::{ExportError, SpeechError, TextSourceError};
use crate::domain::chapter::ChapterError;
use crate::domain::voice::VoiceError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 章节合成失败（章节已回到 pending）
    #[error("Synthesis failed for chapter {index}: {message}")]
    SynthesisFailure { index: usize, message: String },

    /// 输入文本为空或无法使用
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 章节索引越界
    #[error("Chapter index {index} out of range (chapters: {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// 状态无效
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 播放控制错误
    #[error("Playback error: {0}")]
    PlaybackError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl ApplicationError {
    /// 创建合成失败错误
    pub fn synthesis(index: usize, message: impl Into<String>) -> Self {
        Self::SynthesisFailure {
            index,
            message: message.into(),
        }
    }

    /// 创建输入无效错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

impl From<VoiceError> for ApplicationError {
    fn from(err: VoiceError) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ChapterError> for ApplicationError {
    fn from(err: ChapterError) -> Self {
        Self::InvalidState(err.to_string())
    }
}

impl From<SpeechError> for ApplicationError {
    fn from(err: SpeechError) -> Self {
        Self::PlaybackError(err.to_string())
    }
}

impl From<TextSourceError> for ApplicationError {
    fn from(err: TextSourceError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

impl From<ExportError> for ApplicationError {
    fn from(err: ExportError) -> Self {
        Self::StorageError(err.to_string())
    }
}
