//! Playback Command Handler

use std::sync::Arc;

use crate::application::commands::playback_commands::*;
use crate::application::controller::PlaybackController;
use crate::application::error::ApplicationError;

/// 把用户命令分派给控制器
///
/// 越界导航与无音频时的播放不算错误，返回 `Ignored`。
pub struct PlaybackCommandHandler {
    controller: Arc<PlaybackController>,
}

impl PlaybackCommandHandler {
    pub fn new(controller: Arc<PlaybackController>) -> Self {
        Self { controller }
    }

    pub async fn handle(
        &self,
        cmd: PlaybackCommand,
    ) -> Result<PlaybackCommandResponse, ApplicationError> {
        tracing::debug!(command = ?cmd, "Handling playback command");

        let outcome = match cmd {
            PlaybackCommand::Play => applied_if(self.controller.play().await?),
            PlaybackCommand::Pause => {
                self.controller.pause().await?;
                CommandOutcome::Applied
            }
            PlaybackCommand::Toggle => applied_if(self.controller.toggle().await?),
            PlaybackCommand::Stop => {
                self.controller.stop().await;
                CommandOutcome::Applied
            }
            PlaybackCommand::Next => applied_if(self.controller.next().await),
            PlaybackCommand::Previous => applied_if(self.controller.previous().await),
            PlaybackCommand::Select(index) => match self.controller.select_chapter(index).await {
                Ok(()) => CommandOutcome::Applied,
                Err(ApplicationError::IndexOutOfRange { index, len }) => {
                    tracing::debug!(index = index, len = len, "Select out of range, ignored");
                    CommandOutcome::Ignored
                }
                Err(e) => return Err(e),
            },
            PlaybackCommand::Generate(index) => match self.controller.generate(index).await {
                Ok(outcome) => CommandOutcome::Generated(outcome),
                Err(ApplicationError::IndexOutOfRange { index, len }) => {
                    tracing::debug!(index = index, len = len, "Generate out of range, ignored");
                    CommandOutcome::Ignored
                }
                Err(e) => return Err(e),
            },
            PlaybackCommand::GenerateAll => {
                CommandOutcome::GeneratedAll(self.controller.generate_all().await)
            }
        };

        Ok(PlaybackCommandResponse {
            outcome,
            current_index: self.controller.current_index().await,
            playback_state: self.controller.playback_state().await,
            progress: self.controller.progress().await,
        })
    }

    /// 处理键盘输入；未绑定的按键返回 `None`
    pub async fn handle_key(
        &self,
        key: &str,
    ) -> Option<Result<PlaybackCommandResponse, ApplicationError>> {
        let cmd = PlaybackCommand::from_key(key)?;
        Some(self.handle(cmd).await)
    }
}

fn applied_if(changed: bool) -> CommandOutcome {
    if changed {
        CommandOutcome::Applied
    } else {
        CommandOutcome::Ignored
    }
}
