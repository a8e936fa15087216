//! Voice Context - 音色限界上下文
//!
//! 职责:
//! - 合成参数（音色、语速、音调、音量）及校验
//! - 可用音色列表

mod errors;
mod value_objects;

pub use errors::VoiceError;
pub use value_objects::{
    VoiceCatalog, VoiceConfig, VoiceInfo, DEFAULT_VOICE, PITCH_RANGE, SPEED_RANGE, VOLUME_RANGE,
};
