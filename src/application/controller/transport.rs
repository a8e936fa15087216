//! 播放控制与章节导航

use super::{ControllerState, PlaybackController};
use crate::application::error::ApplicationError;
use crate::application::ports::PlaybackEvent;
use crate::domain::playback::PlaybackState;

impl PlaybackController {
    /// 播放当前章节
    ///
    /// 当前章节没有已完成的音频时不做任何事并返回 `false`。
    /// 暂停状态下继续播放，停止状态下从头播放。
    pub async fn play(&self) -> Result<bool, ApplicationError> {
        let mut state = self.state.lock().await;
        let index = state.current_index;

        let Some(handle) = state
            .current_chapter()
            .and_then(|c| c.audio_handle())
            .cloned()
        else {
            tracing::debug!(chapter_index = index, "No audio for current chapter, play ignored");
            return Ok(false);
        };

        match state.transport.state() {
            PlaybackState::Playing => return Ok(true),
            PlaybackState::Paused => {
                self.engine.resume().await?;
                state.transport.play();
                tracing::info!(chapter_index = index, "Playback resumed");
            }
            PlaybackState::Stopped => {
                let playback = state.transport.playback().next();
                self.engine.play(&handle, playback).await?;
                state.transport.start(playback);
                tracing::info!(
                    chapter_index = index,
                    handle = %handle,
                    playback = %playback,
                    "Playback started"
                );
            }
        }

        self.publish_transport(&state);
        Ok(true)
    }

    /// 暂停播放
    pub async fn pause(&self) -> Result<(), ApplicationError> {
        let mut state = self.state.lock().await;
        if state.transport.is_playing() {
            self.engine.pause().await?;
            state.transport.pause();
            tracing::info!(
                chapter_index = state.current_index,
                progress = state.transport.progress(),
                "Playback paused"
            );
            self.publish_transport(&state);
        }
        Ok(())
    }

    /// 播放中则暂停，否则播放
    ///
    /// 无音频可播时返回 `false`
    pub async fn toggle(&self) -> Result<bool, ApplicationError> {
        if self.is_playing().await {
            self.pause().await?;
            Ok(true)
        } else {
            self.play().await
        }
    }

    /// 停止播放，进度归零
    pub async fn stop(&self) {
        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;
    }

    /// 下一章；已在最后一章时不做任何事
    pub async fn next(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.current_index + 1 >= state.chapters.len() {
            return false;
        }
        let target = state.current_index + 1;
        self.move_to(&mut state, target).await;
        true
    }

    /// 上一章；已在第一章时不做任何事
    pub async fn previous(&self) -> bool {
        let mut state = self.state.lock().await;
        if state.current_index == 0 || state.chapters.is_empty() {
            return false;
        }
        let target = state.current_index - 1;
        self.move_to(&mut state, target).await;
        true
    }

    /// 直接跳转到指定章节
    pub async fn select_chapter(&self, index: usize) -> Result<(), ApplicationError> {
        let mut state = self.state.lock().await;
        if index >= state.chapters.len() {
            return Err(ApplicationError::out_of_range(index, state.chapters.len()));
        }
        self.move_to(&mut state, index).await;
        Ok(())
    }

    /// 处理引擎上报的播放事件
    ///
    /// 来自更早一次播放的事件（已停止、已切换章节）直接丢弃。
    pub async fn handle_playback_event(&self, event: PlaybackEvent) {
        let mut state = self.state.lock().await;
        if event.playback() != state.transport.playback() {
            tracing::debug!(
                event_playback = %event.playback(),
                current_playback = %state.transport.playback(),
                "Stale playback event dropped"
            );
            return;
        }

        match event {
            PlaybackEvent::Progress { progress, .. } => {
                state.transport.advance(progress);
                tracing::trace!(progress = state.transport.progress(), "Playback progress");
            }
            PlaybackEvent::Finished { .. } => {
                if state.transport.state() == PlaybackState::Stopped {
                    return;
                }
                state.transport.stop();
                tracing::info!(chapter_index = state.current_index, "Playback finished");
                self.publish_transport(&state);
            }
        }
    }

    pub(super) async fn stop_locked(&self, state: &mut ControllerState) {
        if let Err(e) = self.engine.cancel().await {
            tracing::warn!(error = %e, "Engine cancel failed, resetting playback anyway");
        }
        let was = state.transport.state();
        state.transport.stop();
        if was != PlaybackState::Stopped {
            tracing::info!(chapter_index = state.current_index, "Playback stopped");
            self.publish_transport(state);
        }
    }

    async fn move_to(&self, state: &mut ControllerState, index: usize) {
        self.stop_locked(state).await;
        state.current_index = index;
        tracing::debug!(chapter_index = index, "Current chapter changed");
        self.events.publish_current_chapter(index);
    }

    fn publish_transport(&self, state: &ControllerState) {
        self.events
            .publish_playback_state(state.transport.state(), state.transport.progress());
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::infrastructure::events::ControllerEvent;

    async fn ready_harness() -> Harness {
        let harness = Harness::new();
        harness.controller.load_text(TWO_CHAPTERS).await.unwrap();
        harness.controller.generate_all().await;
        harness
    }

    #[tokio::test]
    async fn test_play_requires_completed_audio() {
        let harness = Harness::new();
        harness.controller.load_text(TWO_CHAPTERS).await.unwrap();

        assert!(!harness.controller.play().await.unwrap());
        assert!(!harness.controller.is_playing().await);
        assert!(harness.engine.calls().iter().all(|c| !c.starts_with("play")));
    }

    #[tokio::test]
    async fn test_play_pause_resume() {
        let harness = ready_harness().await;

        assert!(harness.controller.play().await.unwrap());
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Playing);

        harness.controller.pause().await.unwrap();
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Paused);
        assert!(!harness.controller.is_playing().await);

        harness.controller.play().await.unwrap();
        assert!(harness.controller.is_playing().await);

        let calls = harness.engine.calls();
        let tail: Vec<&str> = calls.iter().rev().take(3).rev().map(String::as_str).collect();
        assert!(tail[0].starts_with("play:"));
        assert_eq!(&tail[1..], &["pause", "resume"]);
    }

    #[tokio::test]
    async fn test_stop_resets_from_playing_and_paused() {
        let harness = ready_harness().await;

        harness.controller.play().await.unwrap();
        harness
            .controller
            .handle_playback_event(harness.progress_event(0.4))
            .await;
        assert_eq!(harness.controller.progress().await, 0.4);
        harness.controller.stop().await;
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
        assert_eq!(harness.controller.progress().await, 0.0);

        harness.controller.play().await.unwrap();
        harness
            .controller
            .handle_playback_event(harness.progress_event(0.7))
            .await;
        harness.controller.pause().await.unwrap();
        harness.controller.stop().await;
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
        assert_eq!(harness.controller.progress().await, 0.0);
    }

    #[tokio::test]
    async fn test_stop_survives_engine_error() {
        let harness = ready_harness().await;
        harness.controller.play().await.unwrap();
        harness.engine.fail_cancel(true);

        harness.controller.stop().await;
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn test_navigation_bounds_are_noops() {
        let harness = ready_harness().await;
        let mut events = harness.events.subscribe();

        assert!(!harness.controller.previous().await);
        assert_eq!(harness.controller.current_index().await, 0);

        assert!(harness.controller.next().await);
        assert_eq!(harness.controller.current_index().await, 1);

        harness.controller.play().await.unwrap();
        let calls_before = harness.engine.calls().len();
        assert!(!harness.controller.next().await);
        assert_eq!(harness.controller.current_index().await, 1);
        // 边界处不触发停止
        assert!(harness.controller.is_playing().await);
        assert_eq!(harness.engine.calls().len(), calls_before);

        assert!(harness.controller.previous().await);
        assert_eq!(harness.controller.current_index().await, 0);
        assert!(!harness.controller.is_playing().await);

        let mut changes = Vec::new();
        while let Ok(event) = events.try_recv() {
            if let ControllerEvent::CurrentChapterChanged { index } = event {
                changes.push(index);
            }
        }
        assert_eq!(changes, vec![1, 0]);
    }

    #[tokio::test]
    async fn test_navigation_on_empty_list() {
        let harness = Harness::new();
        assert!(!harness.controller.next().await);
        assert!(!harness.controller.previous().await);
        assert!(!harness.controller.play().await.unwrap());
    }

    #[tokio::test]
    async fn test_select_chapter_stops_and_moves() {
        let harness = ready_harness().await;
        harness.controller.play().await.unwrap();

        harness.controller.select_chapter(1).await.unwrap();
        assert_eq!(harness.controller.current_index().await, 1);
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);

        let err = harness.controller.select_chapter(2).await.unwrap_err();
        assert!(matches!(err, ApplicationError::IndexOutOfRange { index: 2, len: 2 }));
        assert_eq!(harness.controller.current_index().await, 1);
    }

    #[tokio::test]
    async fn test_toggle() {
        let harness = ready_harness().await;
        harness.controller.toggle().await.unwrap();
        assert!(harness.controller.is_playing().await);
        harness.controller.toggle().await.unwrap();
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_finished_event_returns_to_stopped() {
        let harness = ready_harness().await;
        harness.controller.play().await.unwrap();
        harness
            .controller
            .handle_playback_event(harness.progress_event(0.9))
            .await;
        harness
            .controller
            .handle_playback_event(harness.finished_event())
            .await;

        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
        assert_eq!(harness.controller.progress().await, 0.0);

        // 结束后再次播放从头开始
        harness.controller.play().await.unwrap();
        assert!(harness.engine.calls().last().unwrap().starts_with("play:"));
    }

    #[tokio::test]
    async fn test_progress_ignored_while_paused() {
        let harness = ready_harness().await;
        harness.controller.play().await.unwrap();
        harness.controller.pause().await.unwrap();
        harness
            .controller
            .handle_playback_event(harness.progress_event(0.8))
            .await;
        assert_eq!(harness.controller.progress().await, 0.0);
    }

    #[tokio::test]
    async fn test_events_from_previous_playback_are_dropped() {
        let harness = ready_harness().await;

        harness.controller.play().await.unwrap();
        let first = harness.engine.last_playback();
        assert!(harness.controller.next().await);
        harness.controller.play().await.unwrap();
        let second = harness.engine.last_playback();
        assert_ne!(first, second);

        // 上一章遗留在通道里的事件
        harness
            .controller
            .handle_playback_event(PlaybackEvent::Progress {
                playback: first,
                progress: 0.9,
            })
            .await;
        harness
            .controller
            .handle_playback_event(PlaybackEvent::Finished { playback: first })
            .await;
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Playing);
        assert_eq!(harness.controller.progress().await, 0.0);

        harness
            .controller
            .handle_playback_event(harness.progress_event(0.5))
            .await;
        assert_eq!(harness.controller.progress().await, 0.5);

        harness
            .controller
            .handle_playback_event(harness.finished_event())
            .await;
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
    }

    #[tokio::test]
    async fn test_replay_after_stop_ignores_old_finish() {
        let harness = ready_harness().await;

        harness.controller.play().await.unwrap();
        let old_finish = harness.finished_event();
        harness.controller.stop().await;
        harness.controller.play().await.unwrap();

        harness.controller.handle_playback_event(old_finish).await;
        assert!(harness.controller.is_playing().await);
    }

    #[tokio::test]
    async fn test_pause_and_resume_keep_playback() {
        let harness = ready_harness().await;
        harness.controller.play().await.unwrap();
        let playing = harness.engine.last_playback();

        harness.controller.pause().await.unwrap();
        harness.controller.play().await.unwrap();
        assert_eq!(harness.engine.last_playback(), playing);

        harness
            .controller
            .handle_playback_event(harness.progress_event(0.3))
            .await;
        assert_eq!(harness.controller.progress().await, 0.3);
    }

    #[tokio::test]
    async fn test_toggle_without_audio_reports_nothing_changed() {
        let harness = Harness::new();
        harness.controller.load_text(TWO_CHAPTERS).await.unwrap();
        assert!(!harness.controller.toggle().await.unwrap());
        assert_eq!(harness.controller.playback_state().await, PlaybackState::Stopped);
    }
}
