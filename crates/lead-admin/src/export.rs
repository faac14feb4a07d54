//! Destinations for exported lead files.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Receives the bytes of an export under a suggested file name.
pub trait ExportSink: Send + Sync {
    /// Store the file, returning where it went.
    fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf>;
}

/// `leads_export_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("leads_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Writes exports into a directory, replacing files of the same name.
#[derive(Debug, Clone)]
pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for DirectoryExportSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, bytes)?;
        tracing::info!(path = %path.display(), bytes = bytes.len(), "export written");
        Ok(path)
    }
}
