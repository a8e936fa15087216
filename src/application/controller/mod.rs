//! Playback Controller - 章节合成与播放编排
//!
//! 所有状态都在 `state` 锁内修改，锁从不跨越合成调用持有；
//! 合成请求另由 `engine_gate` 串行化，保证引擎同一时刻只服务一个请求。

mod generation;
mod transport;

#[cfg(test)]
mod testing;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::error::ApplicationError;
use crate::application::ports::{ChapterExportPort, SpeechEnginePort, TextSourcePort};
use crate::domain::chapter::{AudioHandle, Chapter};
use crate::domain::playback::{PlaybackState, Transport};
use crate::domain::voice::{VoiceCatalog, VoiceConfig, VoiceInfo};
use crate::domain::{segment_with, HeadingMatcher, RegexHeadingMatcher};
use crate::infrastructure::events::EventPublisher;

pub use generation::{GenerateAllReport, GenerateOutcome};

/// 控制器内部状态
struct ControllerState {
    chapters: Vec<Chapter>,
    current_index: usize,
    transport: Transport,
    voice: VoiceConfig,
    catalog: VoiceCatalog,
    /// 每次重新分章递增，用于丢弃过期的合成结果
    epoch: u64,
}

impl ControllerState {
    fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters.get(self.current_index)
    }
}

/// 播放控制器
pub struct PlaybackController {
    state: Mutex<ControllerState>,
    engine_gate: Mutex<()>,
    engine: Arc<dyn SpeechEnginePort>,
    text_source: Arc<dyn TextSourcePort>,
    exporter: Arc<dyn ChapterExportPort>,
    events: Arc<EventPublisher>,
    matcher: Arc<dyn HeadingMatcher>,
}

impl PlaybackController {
    pub fn new(
        engine: Arc<dyn SpeechEnginePort>,
        text_source: Arc<dyn TextSourcePort>,
        exporter: Arc<dyn ChapterExportPort>,
        events: Arc<EventPublisher>,
        voice: VoiceConfig,
    ) -> Result<Self, ApplicationError> {
        voice.validate()?;
        Ok(Self {
            state: Mutex::new(ControllerState {
                chapters: Vec::new(),
                current_index: 0,
                transport: Transport::default(),
                voice,
                catalog: VoiceCatalog::default(),
                epoch: 0,
            }),
            engine_gate: Mutex::new(()),
            engine,
            text_source,
            exporter,
            events,
            matcher: Arc::new(RegexHeadingMatcher::default()),
        })
    }

    /// 替换标题判定规则（下次加载文本时生效）
    pub fn with_heading_matcher(mut self, matcher: Arc<dyn HeadingMatcher>) -> Self {
        self.matcher = matcher;
        self
    }

    /// 初始化引擎并拉取音色列表
    pub async fn initialize(&self) -> Result<(), ApplicationError> {
        self.engine.initialize().await?;
        self.refresh_voices().await
    }

    /// 重新向引擎查询可用音色
    pub async fn refresh_voices(&self) -> Result<(), ApplicationError> {
        let voices = self.engine.list_voices().await?;
        self.update_voices(voices).await;
        Ok(())
    }

    /// 接收引擎推送的音色列表（可在任意时刻调用）
    pub async fn update_voices(&self, voices: Vec<VoiceInfo>) {
        let count = voices.len();
        self.state.lock().await.catalog.replace(voices);
        tracing::info!(count = count, "Voice list updated");
        self.events.publish_voices_updated(count);
    }

    pub async fn voices(&self) -> Vec<VoiceInfo> {
        self.state.lock().await.catalog.voices().to_vec()
    }

    pub async fn voice_config(&self) -> VoiceConfig {
        self.state.lock().await.voice.clone()
    }

    /// 更新合成参数，校验失败时保留原配置
    pub async fn set_voice_config(&self, voice: VoiceConfig) -> Result<(), ApplicationError> {
        voice.validate()?;
        tracing::debug!(
            voice = %voice.voice,
            speed = voice.speed,
            pitch = voice.pitch,
            volume = voice.volume,
            "Voice config updated"
        );
        self.state.lock().await.voice = voice;
        Ok(())
    }

    /// 加载文本并重新分章
    ///
    /// 旧章节列表被整体替换；同一位置标题和内容都未变的已完成章节保留其音频。
    /// 返回新章节数。
    pub async fn load_text(&self, text: &str) -> Result<usize, ApplicationError> {
        let mut chapters = segment_with(text, self.matcher.as_ref());
        if chapters.is_empty() {
            return Err(ApplicationError::invalid_input("input text is empty"));
        }

        let mut state = self.state.lock().await;
        self.stop_locked(&mut state).await;

        let mut stale: Vec<AudioHandle> = Vec::new();
        let mut kept = 0usize;
        for (index, old) in std::mem::take(&mut state.chapters).into_iter().enumerate() {
            let Some(audio) = old.audio() else { continue };
            match chapters.get_mut(index) {
                Some(new) if new.same_text(&old) => {
                    new.adopt_audio(audio.clone());
                    kept += 1;
                }
                _ => stale.push(audio.handle.clone()),
            }
        }

        let total = chapters.len();
        state.chapters = chapters;
        state.current_index = 0;
        state.epoch += 1;
        let epoch = state.epoch;
        drop(state);

        for handle in &stale {
            self.engine.release(handle).await;
        }

        tracing::info!(
            total_chapters = total,
            kept_audio = kept,
            released_audio = stale.len(),
            epoch = epoch,
            "Chapters replaced"
        );
        self.events.publish_chapters_replaced(total);
        self.events.publish_current_chapter(0);

        Ok(total)
    }

    /// 通过文本源读取文件后加载
    pub async fn load_file(&self, path: &Path) -> Result<usize, ApplicationError> {
        let text = self.text_source.read_text(path).await?;
        tracing::info!(path = %path.display(), bytes = text.len(), "Text file loaded");
        self.load_text(&text).await
    }

    /// 章节快照
    pub async fn chapters(&self) -> Vec<Chapter> {
        self.state.lock().await.chapters.clone()
    }

    pub async fn chapter(&self, index: usize) -> Option<Chapter> {
        self.state.lock().await.chapters.get(index).cloned()
    }

    pub async fn chapter_count(&self) -> usize {
        self.state.lock().await.chapters.len()
    }

    pub async fn current_index(&self) -> usize {
        self.state.lock().await.current_index
    }

    pub async fn current_chapter(&self) -> Option<Chapter> {
        self.state.lock().await.current_chapter().cloned()
    }

    pub async fn playback_state(&self) -> PlaybackState {
        self.state.lock().await.transport.state()
    }

    pub async fn is_playing(&self) -> bool {
        self.state.lock().await.transport.is_playing()
    }

    pub async fn progress(&self) -> f32 {
        self.state.lock().await.transport.progress()
    }

    /// 导出已完成章节的原文
    pub async fn export_chapter(&self, index: usize) -> Result<PathBuf, ApplicationError> {
        let (title, content) = {
            let state = self.state.lock().await;
            let chapter = state
                .chapters
                .get(index)
                .ok_or_else(|| ApplicationError::out_of_range(index, state.chapters.len()))?;
            if !chapter.is_completed() {
                return Err(ApplicationError::invalid_state(format!(
                    "chapter {} is {}, not completed",
                    index,
                    chapter.status()
                )));
            }
            (chapter.title().to_string(), chapter.content().to_string())
        };

        let path = self.exporter.export(&title, &content).await?;
        tracing::info!(chapter_index = index, path = %path.display(), "Chapter exported");
        Ok(path)
    }
}
