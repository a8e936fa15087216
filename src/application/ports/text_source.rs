//! Text Source Port - 文本读取抽象
//!
//! 文件类型和大小校验由具体实现负责

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextSourceError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("File too large: {size} bytes, limit {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("File is not valid UTF-8: {0}")]
    Encoding(String),

    #[error("IO error: {0}")]
    IoError(String),
}

#[async_trait]
pub trait TextSourcePort: Send + Sync {
    /// 读取文件的全部文本
    async fn read_text(&self, path: &Path) -> Result<String, TextSourceError>;
}
