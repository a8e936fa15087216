//! Narrator - 文本分章朗读器
//!
//! 用法: `narrator <file.txt> [--export]`
//!
//! 读取文本、分章、依次合成全部章节，然后朗读第一章。

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use narrator::application::PlaybackController;
use narrator::config::{load_config, print_config, AppConfig};
use narrator::domain::RegexHeadingMatcher;
use narrator::infrastructure::adapters::{
    FileChapterExporter, FileTextSource, SimulatedSpeechEngine, SimulatedSpeechEngineConfig,
};
use narrator::infrastructure::events::EventPublisher;
use tokio::sync::broadcast::error::RecvError;

fn init_logging(config: &AppConfig) {
    let log_filter = format!("{},narrator={}", config.log.level, config.log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_logging(&config);
    print_config(&config);

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: narrator <file.txt> [--export]")?;
    let export = args.any(|a| a == "--export");

    // 创建适配器
    let engine_config = SimulatedSpeechEngineConfig {
        latency_ms_per_1k_chars: config.engine.latency_ms_per_1k_chars,
        chars_per_second: config.engine.chars_per_second,
        tick_ms: config.engine.playback_tick_ms,
        ..Default::default()
    };
    let (engine, mut playback_rx) = SimulatedSpeechEngine::new(engine_config);
    let text_source = FileTextSource::new(
        config.input.accepted_extensions.clone(),
        config.input.max_file_size,
    );
    let exporter = FileChapterExporter::new(&config.export.dir).await?;
    let events = Arc::new(EventPublisher::new());

    // 控制器事件以 JSON 形式写入 debug 日志
    let mut event_rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match event_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped = skipped, "Event logger lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match serde_json::to_string(&event) {
                Ok(json) => tracing::debug!(event = %json, "Controller event"),
                Err(e) => tracing::warn!(error = %e, "Failed to serialize controller event"),
            }
        }
    });

    let mut controller = PlaybackController::new(
        Arc::new(engine),
        Arc::new(text_source),
        Arc::new(exporter),
        events,
        config.voice.to_voice_config(),
    )?;
    if let Some(pattern) = &config.input.heading_pattern {
        let matcher = RegexHeadingMatcher::with_pattern(pattern)?;
        controller = controller.with_heading_matcher(Arc::new(matcher));
    }

    controller.initialize().await?;

    let total = controller.load_file(&path).await?;
    tracing::info!(path = %path.display(), chapters = total, "Text loaded");
    for (index, chapter) in controller.chapters().await.iter().enumerate() {
        tracing::info!(
            "  [{}] {} ({} chars)",
            index,
            chapter.title(),
            chapter.content().chars().count()
        );
    }

    let report = controller.generate_all().await;
    tracing::info!(
        completed = report.completed,
        skipped = report.skipped,
        failed = report.failed.len(),
        "Synthesis finished"
    );

    if controller.play().await? {
        loop {
            tokio::select! {
                event = playback_rx.recv() => {
                    let Some(event) = event else { break };
                    let finished = event.is_finished();
                    controller.handle_playback_event(event).await;
                    if finished && !controller.is_playing().await {
                        break;
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received interrupt, stopping playback");
                    controller.stop().await;
                    break;
                }
            }
        }
    } else {
        tracing::warn!("First chapter has no audio, nothing to play");
    }

    if export {
        for index in 0..controller.chapter_count().await {
            match controller.export_chapter(index).await {
                Ok(path) => tracing::info!(chapter_index = index, path = %path.display(), "Chapter exported"),
                Err(e) => tracing::warn!(chapter_index = index, error = %e, "Chapter not exported"),
            }
        }
    }

    Ok(())
}
