//! Event Publisher Implementation
//!
//! 向展示层广播控制器状态变化

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::domain::chapter::ChapterStatus;
use crate::domain::playback::PlaybackState;

/// 控制器事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ControllerEvent {
    /// 章节列表被整体替换
    ChaptersReplaced { total: usize },
    /// 章节合成状态变更
    ChapterStatusChanged {
        index: usize,
        title: String,
        status: ChapterStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    /// 章节合成失败
    SynthesisFailed { index: usize, error: String },
    /// 当前章节变化
    CurrentChapterChanged { index: usize },
    /// 播放状态变化
    PlaybackStateChanged { state: PlaybackState, progress: f32 },
    /// 可用音色列表更新
    VoicesUpdated { count: usize },
}

/// 事件发布器
pub struct EventPublisher {
    channel: broadcast::Sender<ControllerEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(256);
        Self { channel: tx }
    }

    /// 订阅控制器事件
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.channel.subscribe()
    }

    pub fn publish_chapters_replaced(&self, total: usize) {
        self.publish(ControllerEvent::ChaptersReplaced { total });
    }

    /// 发布章节状态变更事件
    pub fn publish_chapter_status(
        &self,
        index: usize,
        title: &str,
        status: ChapterStatus,
        duration_ms: Option<u64>,
    ) {
        self.publish(ControllerEvent::ChapterStatusChanged {
            index,
            title: title.to_string(),
            status,
            duration_ms,
        });
    }

    /// 发布合成失败事件
    pub fn publish_synthesis_failed(&self, index: usize, error: &str) {
        self.publish(ControllerEvent::SynthesisFailed {
            index,
            error: error.to_string(),
        });
    }

    pub fn publish_current_chapter(&self, index: usize) {
        self.publish(ControllerEvent::CurrentChapterChanged { index });
    }

    pub fn publish_playback_state(&self, state: PlaybackState, progress: f32) {
        self.publish(ControllerEvent::PlaybackStateChanged { state, progress });
    }

    pub fn publish_voices_updated(&self, count: usize) {
        self.publish(ControllerEvent::VoicesUpdated { count });
    }

    fn publish(&self, event: ControllerEvent) {
        if let Err(e) = self.channel.send(event) {
            tracing::trace!(error = %e, "Failed to publish event (no receivers)");
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}
