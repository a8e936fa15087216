//! Speech Engine Port - 语音合成引擎抽象
//!
//! 引擎是单消费者的共享资源：同一时刻只能处理一个合成请求

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::chapter::AudioHandle;
use crate::domain::playback::PlaybackId;
use crate::domain::voice::{VoiceConfig, VoiceInfo};

/// 语音引擎错误
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech engine not initialized")]
    NotInitialized,

    #[error("Speech engine busy")]
    Busy,

    #[error("Synthesis failed: {0}")]
    SynthesisFailed(String),

    #[error("Unknown audio handle: {0}")]
    UnknownHandle(String),

    #[error("Playback error: {0}")]
    Playback(String),
}

/// 合成请求
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// 要合成的文本
    pub text: String,
    /// 已按可用音色解析过的参数
    pub voice: VoiceConfig,
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    pub handle: AudioHandle,
    /// 音频时长（毫秒）
    pub duration_ms: Option<u64>,
}

/// 播放过程中由引擎上报的事件
///
/// `playback` 原样回传 `play` 时传入的标识
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// 当前进度 (0.0 - 1.0)
    Progress { playback: PlaybackId, progress: f32 },
    /// 播放自然结束
    Finished { playback: PlaybackId },
}

impl PlaybackEvent {
    pub fn playback(&self) -> PlaybackId {
        match self {
            PlaybackEvent::Progress { playback, .. } | PlaybackEvent::Finished { playback } => {
                *playback
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, PlaybackEvent::Finished { .. })
    }
}

/// Speech Engine Port
#[async_trait]
pub trait SpeechEnginePort: Send + Sync {
    /// 初始化引擎（加载音色等）
    async fn initialize(&self) -> Result<(), SpeechError> {
        Ok(())
    }

    /// 当前可用音色
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError>;

    /// 合成文本
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResult, SpeechError>;

    /// 从头播放；之后上报的事件都带上 `playback`
    async fn play(&self, handle: &AudioHandle, playback: PlaybackId) -> Result<(), SpeechError>;

    async fn pause(&self) -> Result<(), SpeechError>;

    async fn resume(&self) -> Result<(), SpeechError>;

    /// 终止当前播放
    async fn cancel(&self) -> Result<(), SpeechError>;

    /// 释放不再使用的合成结果
    async fn release(&self, _handle: &AudioHandle) {}
}
