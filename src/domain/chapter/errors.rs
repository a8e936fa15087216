//! Chapter Context - Errors

use thiserror::Error;

use super::ChapterStatus;

#[derive(Debug, Error)]
pub enum ChapterError {
    #[error("无效的状态转换: {from} -> {to}")]
    InvalidTransition {
        from: ChapterStatus,
        to: ChapterStatus,
    },
}
