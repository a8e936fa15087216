//! Chapter Context - Entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChapterError;

/// 章节合成状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    /// 等待合成
    Pending,
    /// 正在合成
    Processing,
    /// 合成完成
    Completed,
}

impl ChapterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChapterStatus::Pending => "pending",
            ChapterStatus::Processing => "processing",
            ChapterStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for ChapterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 合成结果的不透明引用（由语音引擎分配）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioHandle(String);

impl AudioHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 章节音频
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterAudio {
    pub handle: AudioHandle,
    pub duration_ms: Option<u64>,
    pub generated_at: DateTime<Utc>,
}

/// 章节 - 最小合成/播放单位
///
/// 不变量:
/// - audio 仅在 status = Completed 时存在
/// - 状态只允许 Pending -> Processing -> Completed 或 Processing -> Pending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    title: String,
    content: String,
    status: ChapterStatus,
    audio: Option<ChapterAudio>,
}

impl Chapter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            status: ChapterStatus::Pending,
            audio: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> ChapterStatus {
        self.status
    }

    pub fn audio(&self) -> Option<&ChapterAudio> {
        self.audio.as_ref()
    }

    pub fn audio_handle(&self) -> Option<&AudioHandle> {
        self.audio.as_ref().map(|a| &a.handle)
    }

    pub fn is_processing(&self) -> bool {
        self.status == ChapterStatus::Processing
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChapterStatus::Completed
    }

    /// 标题与内容是否一致（重新分章时用于保留已合成结果）
    pub fn same_text(&self, other: &Chapter) -> bool {
        self.title == other.title && self.content == other.content
    }

    pub(crate) fn append_line(&mut self, line: &str) {
        self.content.push_str(line);
        self.content.push('\n');
    }

    pub(crate) fn has_text(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Pending -> Processing
    pub fn start_processing(&mut self) -> Result<(), ChapterError> {
        self.transition(ChapterStatus::Processing)?;
        self.status = ChapterStatus::Processing;
        Ok(())
    }

    /// Processing -> Completed
    pub fn complete(&mut self, audio: ChapterAudio) -> Result<(), ChapterError> {
        self.transition(ChapterStatus::Completed)?;
        self.status = ChapterStatus::Completed;
        self.audio = Some(audio);
        Ok(())
    }

    /// Processing -> Pending（合成失败）
    pub fn revert_to_pending(&mut self) -> Result<(), ChapterError> {
        self.transition(ChapterStatus::Pending)?;
        self.status = ChapterStatus::Pending;
        Ok(())
    }

    /// 从上一轮分章结果继承已完成的音频
    pub(crate) fn adopt_audio(&mut self, audio: ChapterAudio) {
        self.status = ChapterStatus::Completed;
        self.audio = Some(audio);
    }

    fn transition(&self, to: ChapterStatus) -> Result<(), ChapterError> {
        let allowed = matches!(
            (self.status, to),
            (ChapterStatus::Pending, ChapterStatus::Processing)
                | (ChapterStatus::Processing, ChapterStatus::Completed)
                | (ChapterStatus::Processing, ChapterStatus::Pending)
        );
        if allowed {
            Ok(())
        } else {
            Err(ChapterError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }
}
