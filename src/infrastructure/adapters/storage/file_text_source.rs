//! File Text Source - 从本地文件读取待朗读文本

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;

use crate::application::ports::{TextSourceError, TextSourcePort};

/// 本地文件文本源
///
/// 只接受配置中的扩展名（忽略大小写），超过大小上限的文件直接拒绝。
pub struct FileTextSource {
    accepted_extensions: Vec<String>,
    max_file_size: u64,
}

impl FileTextSource {
    pub fn new(accepted_extensions: Vec<String>, max_file_size: u64) -> Self {
        let accepted_extensions = accepted_extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        Self {
            accepted_extensions,
            max_file_size,
        }
    }

    fn check_extension(&self, path: &Path) -> Result<(), TextSourceError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if self.accepted_extensions.iter().any(|a| *a == ext) {
            Ok(())
        } else {
            Err(TextSourceError::UnsupportedType(path.display().to_string()))
        }
    }
}

#[async_trait]
impl TextSourcePort for FileTextSource {
    async fn read_text(&self, path: &Path) -> Result<String, TextSourceError> {
        self.check_extension(path)?;

        let metadata = fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => TextSourceError::NotFound(path.display().to_string()),
            _ => TextSourceError::IoError(e.to_string()),
        })?;

        if metadata.len() > self.max_file_size {
            return Err(TextSourceError::TooLarge {
                size: metadata.len(),
                limit: self.max_file_size,
            });
        }

        let bytes = fs::read(path)
            .await
            .map_err(|e| TextSourceError::IoError(e.to_string()))?;
        let text = String::from_utf8(bytes).map_err(|e| TextSourceError::Encoding(e.to_string()))?;

        tracing::debug!(path = %path.display(), size = metadata.len(), "Text file read");

        // 去掉 UTF-8 BOM
        Ok(match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        })
    }
}
