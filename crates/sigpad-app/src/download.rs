//! Download delivery for exported files.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Receives exported files by name.
///
/// Implementations decide where the bytes land; the pad only names the
/// file and hands over the finished contents.
pub trait DownloadSink {
    /// Deliver a finished file to the user.
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Writes downloads into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DownloadSink for DirectorySink {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        log::info!("wrote {}", path.display());
        Ok(())
    }
}
