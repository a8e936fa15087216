//! 播放状态机
//!
//! Stopped <-> Playing <-> Paused，任何状态都可以 stop，stop 总是清零进度

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "stopped",
            PlaybackState::Playing => "playing",
            PlaybackState::Paused => "paused",
        }
    }
}

/// 一次从头开始的播放的标识
///
/// 引擎上报的事件带有该标识，与当前播放不符的事件会被丢弃。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackId(u64);

impl PlaybackId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 播放进度与状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transport {
    state: PlaybackState,
    /// 0.0 - 1.0
    progress: f32,
    playback: PlaybackId,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            state: PlaybackState::Stopped,
            progress: 0.0,
            playback: PlaybackId::default(),
        }
    }
}

impl Transport {
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// 最近一次开始的播放
    pub fn playback(&self) -> PlaybackId {
        self.playback
    }

    /// 以新的标识从头开始播放
    pub fn start(&mut self, playback: PlaybackId) {
        self.playback = playback;
        self.state = PlaybackState::Playing;
        self.progress = 0.0;
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    /// 只有播放中才会进入 Paused
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
        self.progress = 0.0;
    }

    /// 非播放状态下忽略进度上报
    pub fn advance(&mut self, progress: f32) {
        if self.state == PlaybackState::Playing {
            self.progress = progress.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_pause_resume() {
        let mut transport = Transport::default();
        assert_eq!(transport.state(), PlaybackState::Stopped);

        transport.play();
        transport.advance(0.25);
        transport.pause();
        assert_eq!(transport.state(), PlaybackState::Paused);
        assert_eq!(transport.progress(), 0.25);

        transport.play();
        assert!(transport.is_playing());
        assert_eq!(transport.progress(), 0.25);
    }

    #[test]
    fn test_stop_resets_from_any_state() {
        for setup in [
            PlaybackState::Stopped,
            PlaybackState::Playing,
            PlaybackState::Paused,
        ] {
            let mut transport = Transport::default();
            if setup != PlaybackState::Stopped {
                transport.play();
                transport.advance(0.6);
            }
            if setup == PlaybackState::Paused {
                transport.pause();
            }
            transport.stop();
            assert_eq!(transport.state(), PlaybackState::Stopped);
            assert_eq!(transport.progress(), 0.0);
        }
    }

    #[test]
    fn test_pause_when_stopped_is_noop() {
        let mut transport = Transport::default();
        transport.pause();
        assert_eq!(transport.state(), PlaybackState::Stopped);
    }

    #[test]
    fn test_progress_clamped_and_ignored_when_idle() {
        let mut transport = Transport::default();
        transport.advance(0.5);
        assert_eq!(transport.progress(), 0.0);

        transport.play();
        transport.advance(1.7);
        assert_eq!(transport.progress(), 1.0);
    }

    #[test]
    fn test_start_assigns_new_playback() {
        let mut transport = Transport::default();
        let first = transport.playback().next();
        transport.start(first);
        transport.advance(0.4);
        transport.pause();

        let second = transport.playback().next();
        assert_ne!(first, second);
        transport.start(second);
        assert_eq!(transport.playback(), second);
        assert!(transport.is_playing());
        assert_eq!(transport.progress(), 0.0);
    }
}
