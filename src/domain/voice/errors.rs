//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("无效的音色名称: {0:?}")]
    InvalidName(String),

    #[error("参数超出范围: {field} = {value}")]
    OutOfRange { field: &'static str, value: f32 },
}
