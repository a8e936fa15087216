//! Chapter Export Port - 章节文本导出

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid file name: {0:?}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    IoError(String),
}

#[async_trait]
pub trait ChapterExportPort: Send + Sync {
    /// 写出 `{title}.txt`，返回实际写入路径
    ///
    /// 不覆盖已有文件；重名时由实现另取文件名
    async fn export(&self, title: &str, content: &str) -> Result<PathBuf, ExportError>;
}
