//! Domain Layer - 领域层
//!
//! 包含:
//! - Chapter Context: 章节与合成状态
//! - Voice Context: 合成参数与可用音色
//! - 章节分割器与播放状态机

pub mod chapter;
pub mod playback;
pub mod voice;

mod segmenter;

pub use segmenter::{
    segment, segment_with, HeadingMatcher, RegexHeadingMatcher, DEFAULT_HEADING_PATTERN,
    FULL_TEXT_TITLE, INTRODUCTION_TITLE,
};
