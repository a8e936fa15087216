//! 章节合成
//!
//! 合成被拆成两个事件：请求发出（章节进入 processing）与结果到达（completed / 回到 pending）。
//! 结果到达时若章节列表已被替换（epoch 变化），结果被丢弃并释放。

use chrono::Utc;

use super::PlaybackController;
use crate::application::error::ApplicationError;
use crate::application::ports::{SpeechError, SynthesisRequest, SynthesisResult};
use crate::domain::chapter::ChapterAudio;

/// 单个章节合成的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// 合成成功
    Completed,
    /// 已在合成中，本次调用被忽略
    AlreadyProcessing,
    /// 已有音频，无需合成
    AlreadyCompleted,
    /// 合成期间章节列表已被替换，结果被丢弃
    Discarded,
}

/// 批量合成汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateAllReport {
    pub completed: usize,
    pub skipped: usize,
    pub discarded: usize,
    /// 合成失败的章节索引
    pub failed: Vec<usize>,
}

struct GenerationTicket {
    epoch: u64,
    index: usize,
    request: SynthesisRequest,
}

enum Begin {
    Issued(GenerationTicket),
    Skipped(GenerateOutcome),
}

impl PlaybackController {
    /// 合成指定章节
    ///
    /// 章节处于 processing 时直接返回 `AlreadyProcessing`，不会发出第二个请求。
    /// 失败时章节回到 pending 并返回 `SynthesisFailure`。
    pub async fn generate(&self, index: usize) -> Result<GenerateOutcome, ApplicationError> {
        let ticket = match self.begin_generation(index).await? {
            Begin::Issued(ticket) => ticket,
            Begin::Skipped(outcome) => return Ok(outcome),
        };

        let result = {
            let _gate = self.engine_gate.lock().await;
            self.engine.synthesize(ticket.request.clone()).await
        };

        self.finish_generation(ticket, result).await
    }

    /// 依次合成所有章节
    ///
    /// 严格串行：上一章节的合成（无论成败）结束后才开始下一章节。
    /// 章节列表在过程中被替换时提前结束。
    pub async fn generate_all(&self) -> GenerateAllReport {
        let (total, epoch) = {
            let state = self.state.lock().await;
            (state.chapters.len(), state.epoch)
        };

        tracing::info!(total_chapters = total, "Generating all chapters");

        let mut report = GenerateAllReport::default();
        for index in 0..total {
            if self.state.lock().await.epoch != epoch {
                tracing::warn!(
                    next_index = index,
                    "Chapters replaced during batch generation, stopping"
                );
                break;
            }

            match self.generate(index).await {
                Ok(GenerateOutcome::Completed) => report.completed += 1,
                Ok(GenerateOutcome::Discarded) => report.discarded += 1,
                Ok(_) => report.skipped += 1,
                Err(e) => {
                    tracing::warn!(chapter_index = index, error = %e, "Chapter skipped after failure");
                    report.failed.push(index);
                }
            }
        }

        tracing::info!(
            completed = report.completed,
            skipped = report.skipped,
            failed = report.failed.len(),
            "Batch generation finished"
        );

        report
    }

    async fn begin_generation(&self, index: usize) -> Result<Begin, ApplicationError> {
        let mut state = self.state.lock().await;
        let len = state.chapters.len();
        let voice = state.voice.resolve(&state.catalog);
        let epoch = state.epoch;

        let chapter = state
            .chapters
            .get_mut(index)
            .ok_or_else(|| ApplicationError::out_of_range(index, len))?;

        if chapter.is_processing() {
            tracing::debug!(chapter_index = index, "Chapter already processing, skipping");
            return Ok(Begin::Skipped(GenerateOutcome::AlreadyProcessing));
        }
        if chapter.is_completed() {
            tracing::debug!(chapter_index = index, "Chapter already completed, skipping");
            return Ok(Begin::Skipped(GenerateOutcome::AlreadyCompleted));
        }

        chapter.start_processing()?;
        let request = SynthesisRequest {
            text: chapter.content().to_string(),
            voice,
        };

        tracing::info!(
            chapter_index = index,
            title = %chapter.title(),
            text_len = request.text.len(),
            voice = %request.voice.voice,
            "Synthesis requested"
        );
        self.events
            .publish_chapter_status(index, chapter.title(), chapter.status(), None);

        Ok(Begin::Issued(GenerationTicket {
            epoch,
            index,
            request,
        }))
    }

    async fn finish_generation(
        &self,
        ticket: GenerationTicket,
        result: Result<SynthesisResult, SpeechError>,
    ) -> Result<GenerateOutcome, ApplicationError> {
        let mut state = self.state.lock().await;

        if state.epoch != ticket.epoch {
            drop(state);
            tracing::info!(
                chapter_index = ticket.index,
                "Chapters replaced during synthesis, discarding result"
            );
            if let Ok(result) = result {
                self.engine.release(&result.handle).await;
            }
            return Ok(GenerateOutcome::Discarded);
        }

        let len = state.chapters.len();
        let chapter = state
            .chapters
            .get_mut(ticket.index)
            .ok_or_else(|| ApplicationError::out_of_range(ticket.index, len))?;

        match result {
            Ok(result) => {
                let duration_ms = result.duration_ms;
                chapter.complete(ChapterAudio {
                    handle: result.handle,
                    duration_ms,
                    generated_at: Utc::now(),
                })?;
                tracing::info!(
                    chapter_index = ticket.index,
                    duration_ms = ?duration_ms,
                    "Synthesis completed"
                );
                self.events.publish_chapter_status(
                    ticket.index,
                    chapter.title(),
                    chapter.status(),
                    duration_ms,
                );
                Ok(GenerateOutcome::Completed)
            }
            Err(e) => {
                chapter.revert_to_pending()?;
                tracing::error!(chapter_index = ticket.index, error = %e, "Synthesis failed");
                self.events.publish_chapter_status(
                    ticket.index,
                    chapter.title(),
                    chapter.status(),
                    None,
                );
                self.events
                    .publish_synthesis_failed(ticket.index, &e.to_string());
                Err(ApplicationError::synthesis(ticket.index, e.to_string()))
            }
        }
    }
}
