//! 控制器测试用的端口替身

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::PlaybackController;
use crate::application::ports::{
    ChapterExportPort, ExportError, PlaybackEvent, SpeechEnginePort, SpeechError,
    SynthesisRequest, SynthesisResult, TextSourceError, TextSourcePort,
};
use crate::domain::chapter::AudioHandle;
use crate::domain::playback::PlaybackId;
use crate::domain::voice::{VoiceConfig, VoiceInfo};
use crate::infrastructure::events::EventPublisher;

pub const TWO_CHAPTERS: &str = "Chapter 1\nHello\nChapter 2\nWorld\n";

/// 记录所有调用的引擎
#[derive(Default)]
pub struct RecordingEngine {
    requests: Mutex<Vec<SynthesisRequest>>,
    calls: Mutex<Vec<String>>,
    released: Mutex<Vec<AudioHandle>>,
    last_playback: Mutex<Option<PlaybackId>>,
    failing_texts: Mutex<HashSet<String>>,
    fail_cancel: AtomicBool,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    next_id: AtomicUsize,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(&self, text: &str) {
        self.failing_texts.lock().unwrap().insert(text.to_string());
    }

    pub fn clear_failures(&self) {
        self.failing_texts.lock().unwrap().clear();
    }

    pub fn fail_cancel(&self, fail: bool) {
        self.fail_cancel.store(fail, Ordering::SeqCst);
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.text.clone())
            .collect()
    }

    pub fn request_voices(&self) -> Vec<VoiceConfig> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.voice.clone())
            .collect()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn released(&self) -> Vec<AudioHandle> {
        self.released.lock().unwrap().clone()
    }

    /// 最近一次 `play` 收到的播放标识
    pub fn last_playback(&self) -> PlaybackId {
        self.last_playback.lock().unwrap().expect("play was never called")
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl SpeechEnginePort for RecordingEngine {
    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        Ok(vec![
            VoiceInfo::new("Alice", "en-US"),
            VoiceInfo::new("Li", "zh-CN"),
        ])
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResult, SpeechError> {
        let text = request.text.clone();
        self.requests.lock().unwrap().push(request);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_texts.lock().unwrap().contains(&text) {
            return Err(SpeechError::SynthesisFailed("scripted failure".to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(SynthesisResult {
            handle: AudioHandle::new(format!("clip-{}", id)),
            duration_ms: Some(1000),
        })
    }

    async fn play(&self, handle: &AudioHandle, playback: PlaybackId) -> Result<(), SpeechError> {
        *self.last_playback.lock().unwrap() = Some(playback);
        self.record(format!("play:{}", handle));
        Ok(())
    }

    async fn pause(&self) -> Result<(), SpeechError> {
        self.record("pause");
        Ok(())
    }

    async fn resume(&self) -> Result<(), SpeechError> {
        self.record("resume");
        Ok(())
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        self.record("cancel");
        if self.fail_cancel.load(Ordering::SeqCst) {
            return Err(SpeechError::Playback("cancel failed".to_string()));
        }
        Ok(())
    }

    async fn release(&self, handle: &AudioHandle) {
        self.released.lock().unwrap().push(handle.clone());
    }
}

/// 内存文本源
#[derive(Default)]
pub struct MemoryTextSource {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryTextSource {
    pub fn insert(&self, path: &str, text: &str) {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), text.to_string());
    }
}

#[async_trait]
impl TextSourcePort for MemoryTextSource {
    async fn read_text(&self, path: &Path) -> Result<String, TextSourceError> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| TextSourceError::NotFound(path.display().to_string()))
    }
}

/// 记录导出内容
#[derive(Default)]
pub struct MemoryExporter {
    written: Mutex<Vec<(String, String)>>,
}

impl MemoryExporter {
    pub fn written(&self) -> Vec<(String, String)> {
        self.written.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChapterExportPort for MemoryExporter {
    async fn export(&self, title: &str, content: &str) -> Result<PathBuf, ExportError> {
        self.written
            .lock()
            .unwrap()
            .push((title.to_string(), content.to_string()));
        Ok(PathBuf::from(format!("{}.txt", title)))
    }
}

pub struct Harness {
    pub controller: PlaybackController,
    pub engine: Arc<RecordingEngine>,
    pub text_source: Arc<MemoryTextSource>,
    pub exporter: Arc<MemoryExporter>,
    pub events: Arc<EventPublisher>,
}

impl Harness {
    pub fn new() -> Self {
        let engine = Arc::new(RecordingEngine::new());
        let text_source = Arc::new(MemoryTextSource::default());
        let exporter = Arc::new(MemoryExporter::default());
        let events = Arc::new(EventPublisher::new());
        let controller = PlaybackController::new(
            engine.clone(),
            text_source.clone(),
            exporter.clone(),
            events.clone(),
            VoiceConfig::default(),
        )
        .unwrap();

        Self {
            controller,
            engine,
            text_source,
            exporter,
            events,
        }
    }

    /// 当前播放的进度事件
    pub fn progress_event(&self, progress: f32) -> PlaybackEvent {
        PlaybackEvent::Progress {
            playback: self.engine.last_playback(),
            progress,
        }
    }

    /// 当前播放的结束事件
    pub fn finished_event(&self) -> PlaybackEvent {
        PlaybackEvent::Finished {
            playback: self.engine.last_playback(),
        }
    }

    pub fn into_controller(self) -> PlaybackController {
        self.controller
    }
}
