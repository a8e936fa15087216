//! Playback Commands - 用户操作命令

use crate::application::controller::{GenerateAllReport, GenerateOutcome};
use crate::domain::playback::PlaybackState;

/// 控制器命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    Play,
    Pause,
    /// 播放中则暂停，否则播放
    Toggle,
    Stop,
    Next,
    Previous,
    Select(usize),
    Generate(usize),
    GenerateAll,
}

impl PlaybackCommand {
    /// 键盘快捷键映射
    ///
    /// - 空格: 播放/暂停
    /// - 右方向键: 下一章
    /// - 左方向键: 上一章
    /// - Esc: 停止
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" => Some(Self::Toggle),
            "ArrowRight" => Some(Self::Next),
            "ArrowLeft" => Some(Self::Previous),
            "Escape" => Some(Self::Stop),
            _ => None,
        }
    }
}

/// 命令执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// 状态已按命令改变
    Applied,
    /// 命令在当前状态下不适用（越界、无音频等）
    Ignored,
    Generated(GenerateOutcome),
    GeneratedAll(GenerateAllReport),
}

/// 命令响应
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackCommandResponse {
    pub outcome: CommandOutcome,
    pub current_index: usize,
    pub playback_state: PlaybackState,
    pub progress: f32,
}
