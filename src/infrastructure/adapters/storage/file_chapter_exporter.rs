//! File Chapter Exporter - 把章节文本写到导出目录

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::application::ports::{ChapterExportPort, ExportError};

/// 同名文件的最大序号
const MAX_NAME_ATTEMPTS: usize = 1000;

/// 文件系统章节导出
pub struct FileChapterExporter {
    /// 导出根目录
    base_dir: PathBuf,
}

impl FileChapterExporter {
    /// 创建导出器，目录不存在时自动创建
    pub async fn new(base_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let base_dir = base_dir.as_ref().to_path_buf();

        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| ExportError::IoError(e.to_string()))?;

        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// 创建不与已有文件重名的导出文件：`name.txt`、`name (2).txt`、`name (3).txt` ...
    async fn create_unique(&self, name: &str) -> Result<(PathBuf, fs::File), ExportError> {
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let file_name = if attempt == 1 {
                format!("{}.txt", name)
            } else {
                format!("{} ({}).txt", name, attempt)
            };
            let path = self.base_dir.join(file_name);

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(ExportError::IoError(e.to_string())),
            }
        }

        Err(ExportError::IoError(format!(
            "no free file name for {:?} after {} attempts",
            name, MAX_NAME_ATTEMPTS
        )))
    }
}

/// 把章节标题转换成安全的文件名
///
/// 路径分隔符、保留字符和控制字符替换为 `_`，去掉首尾空白和结尾的点。
pub fn sanitize_file_name(title: &str) -> Option<String> {
    let replaced: String = title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let name = replaced.trim().trim_end_matches('.').trim_end();
    if name.is_empty() || name.chars().all(|c| c == '_' || c == '.') {
        None
    } else {
        Some(name.to_string())
    }
}

#[async_trait]
impl ChapterExportPort for FileChapterExporter {
    async fn export(&self, title: &str, content: &str) -> Result<PathBuf, ExportError> {
        let name =
            sanitize_file_name(title).ok_or_else(|| ExportError::InvalidName(title.to_string()))?;
        let (path, mut file) = self.create_unique(&name).await?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| ExportError::IoError(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| ExportError::IoError(e.to_string()))?;

        tracing::debug!(path = %path.display(), size = content.len(), "Chapter exported");

        Ok(path)
    }
}
