//! Simulated Speech Engine - 不产生真实音频的语音引擎
//!
//! 合成只记录文本并按长度估算时长；播放由后台计时任务模拟，
//! 通过 `PlaybackEvent` 通道上报进度和结束。

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::ports::{
    PlaybackEvent, SpeechEnginePort, SpeechError, SynthesisRequest, SynthesisResult,
};
use crate::domain::chapter::AudioHandle;
use crate::domain::playback::PlaybackId;
use crate::domain::voice::{VoiceInfo, DEFAULT_VOICE};

/// Simulated Speech Engine 配置
#[derive(Debug, Clone)]
pub struct SimulatedSpeechEngineConfig {
    /// 每 1000 字符的合成延迟（毫秒）
    pub latency_ms_per_1k_chars: u64,
    /// 1.0 倍速下每秒朗读字符数
    pub chars_per_second: f32,
    /// 播放进度上报间隔（毫秒）
    pub tick_ms: u64,
    /// 初始化后可用的音色
    pub voices: Vec<VoiceInfo>,
}

impl Default for SimulatedSpeechEngineConfig {
    fn default() -> Self {
        Self {
            latency_ms_per_1k_chars: 200,
            chars_per_second: 15.0,
            tick_ms: 250,
            voices: vec![
                VoiceInfo::new("Samantha", "en-US"),
                VoiceInfo::new("Daniel", "en-GB"),
                VoiceInfo::new("Tingting", "zh-CN"),
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct StoredClip {
    duration_ms: u64,
}

struct ActivePlayback {
    token: CancellationToken,
    paused: Arc<AtomicBool>,
}

/// 合成期间占用引擎，离开作用域时释放
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Simulated Speech Engine
///
/// 单消费者：合成进行中再次请求会返回 `SpeechError::Busy`
pub struct SimulatedSpeechEngine {
    config: SimulatedSpeechEngineConfig,
    initialized: AtomicBool,
    busy: AtomicBool,
    clips: DashMap<String, StoredClip>,
    active: Mutex<Option<ActivePlayback>>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl SimulatedSpeechEngine {
    /// 创建引擎，返回播放事件接收端
    pub fn new(
        config: SimulatedSpeechEngineConfig,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = Self {
            config,
            initialized: AtomicBool::new(false),
            busy: AtomicBool::new(false),
            clips: DashMap::new(),
            active: Mutex::new(None),
            events: tx,
        };
        (engine, rx)
    }

    /// 当前保存的合成结果数量
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    fn estimate_duration_ms(&self, chars: usize, speed: f32) -> u64 {
        let rate = (self.config.chars_per_second * speed).max(f32::EPSILON);
        ((chars as f32 / rate) * 1000.0).ceil() as u64
    }

    fn knows_voice(&self, voice: &str) -> bool {
        voice == DEFAULT_VOICE || self.config.voices.iter().any(|v| v.name == voice)
    }

    fn spawn_ticker(
        &self,
        playback: PlaybackId,
        duration_ms: u64,
        token: CancellationToken,
        paused: Arc<AtomicBool>,
    ) {
        let tick_ms = self.config.tick_ms.max(1);
        let events = self.events.clone();

        tokio::spawn(async move {
            let mut elapsed_ms = 0u64;
            let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
            interval.tick().await;

            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }
                if paused.load(Ordering::SeqCst) {
                    continue;
                }

                elapsed_ms = (elapsed_ms + tick_ms).min(duration_ms);
                let progress = if duration_ms == 0 {
                    1.0
                } else {
                    elapsed_ms as f32 / duration_ms as f32
                };
                if events
                    .send(PlaybackEvent::Progress { playback, progress })
                    .is_err()
                {
                    break;
                }
                if elapsed_ms >= duration_ms {
                    let _ = events.send(PlaybackEvent::Finished { playback });
                    break;
                }
            }
        });
    }
}

#[async_trait]
impl SpeechEnginePort for SimulatedSpeechEngine {
    async fn initialize(&self) -> Result<(), SpeechError> {
        self.initialized.store(true, Ordering::SeqCst);
        tracing::info!(
            voices = self.config.voices.len(),
            "SimulatedSpeechEngine initialized"
        );
        Ok(())
    }

    async fn list_voices(&self) -> Result<Vec<VoiceInfo>, SpeechError> {
        // 初始化前与浏览器引擎一致，返回空列表
        if !self.initialized.load(Ordering::SeqCst) {
            return Ok(Vec::new());
        }
        Ok(self.config.voices.clone())
    }

    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResult, SpeechError> {
        if !self.initialized.load(Ordering::SeqCst) {
            return Err(SpeechError::NotInitialized);
        }
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(SpeechError::Busy);
        }
        let _busy = BusyGuard(&self.busy);

        if request.text.trim().is_empty() {
            return Err(SpeechError::SynthesisFailed("empty text".to_string()));
        }
        if !self.knows_voice(&request.voice.voice) {
            return Err(SpeechError::SynthesisFailed(format!(
                "unknown voice: {}",
                request.voice.voice
            )));
        }

        let chars = request.text.chars().count();
        let latency_ms = self.config.latency_ms_per_1k_chars * chars as u64 / 1000;

        tracing::debug!(
            text_len = chars,
            voice = %request.voice.voice,
            speed = request.voice.speed,
            latency_ms = latency_ms,
            "SimulatedSpeechEngine: synthesizing"
        );

        tokio::time::sleep(Duration::from_millis(latency_ms)).await;

        let duration_ms = self.estimate_duration_ms(chars, request.voice.speed);
        let id = format!("sim-{}", Uuid::new_v4());
        self.clips.insert(id.clone(), StoredClip { duration_ms });

        Ok(SynthesisResult {
            handle: AudioHandle::new(id),
            duration_ms: Some(duration_ms),
        })
    }

    async fn play(&self, handle: &AudioHandle, playback: PlaybackId) -> Result<(), SpeechError> {
        let clip = self
            .clips
            .get(handle.as_str())
            .map(|c| c.clone())
            .ok_or_else(|| SpeechError::UnknownHandle(handle.to_string()))?;

        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            previous.token.cancel();
        }

        let token = CancellationToken::new();
        let paused = Arc::new(AtomicBool::new(false));
        self.spawn_ticker(playback, clip.duration_ms, token.clone(), paused.clone());
        *active = Some(ActivePlayback { token, paused });

        tracing::debug!(
            handle = %handle,
            playback = %playback,
            duration_ms = clip.duration_ms,
            "SimulatedSpeechEngine: playing"
        );
        Ok(())
    }

    async fn pause(&self) -> Result<(), SpeechError> {
        if let Some(playback) = self.active.lock().await.as_ref() {
            playback.paused.store(true, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn resume(&self) -> Result<(), SpeechError> {
        if let Some(playback) = self.active.lock().await.as_ref() {
            playback.paused.store(false, Ordering::SeqCst);
        }
        Ok(())
    }

    async fn cancel(&self) -> Result<(), SpeechError> {
        if let Some(playback) = self.active.lock().await.take() {
            playback.token.cancel();
        }
        Ok(())
    }

    async fn release(&self, handle: &AudioHandle) {
        if self.clips.remove(handle.as_str()).is_some() {
            tracing::debug!(handle = %handle, "SimulatedSpeechEngine: clip released");
        }
    }
}
