//! Writes exported zone files into a directory.

use std::path::PathBuf;

use zonedash_core::ExportSink;

pub struct DirectoryExportSink {
    dir: PathBuf,
}

impl DirectoryExportSink {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectoryExportSink {
    fn save(&self, file_name: &str, contents: &[u8]) -> std::io::Result<String> {
        // Zone names never contain separators, but the file name comes from the server
        let file_name = file_name.replace(['/', '\\'], "_");
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path.display().to_string())
    }
}
