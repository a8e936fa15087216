//! Storage Adapters

mod file_chapter_exporter;
mod file_text_source;

pub use file_chapter_exporter::{sanitize_file_name, FileChapterExporter};
pub use file_text_source::FileTextSource;
