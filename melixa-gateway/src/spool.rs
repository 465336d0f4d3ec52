//! Upload spooling with guaranteed cleanup
//!
//! Uploads are written to the spool directory under a random name
//! before being forwarded upstream. The spool entry is an RAII guard:
//! dropping it removes the file, so every handler exit path (success,
//! upstream failure, early return) leaves the spool directory clean.

use std::path::{Path, PathBuf};

use tokio::fs::File;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

/// A spooled upload on disk, deleted on drop
#[derive(Debug)]
pub struct SpooledUpload {
    path: PathBuf,
}

impl SpooledUpload {
    /// Create a fresh spool file, returning the guard and an open
    /// handle for writing the upload into it.
    pub async fn create(spool_dir: &Path) -> std::io::Result<(Self, File)> {
        let path = spool_dir.join(Uuid::new_v4().simple().to_string());
        let file = File::create(&path).await?;
        Ok((Self { path }, file))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open the spooled file as a streaming request body, so forwarding
    /// never loads the whole upload into memory.
    pub async fn streaming_body(&self) -> std::io::Result<reqwest::Body> {
        let file = File::open(&self.path).await?;
        Ok(reqwest::Body::wrap_stream(ReaderStream::new(file)))
    }
}

impl Drop for SpooledUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(
                "Failed to remove spooled upload {}: {}",
                self.path.display(),
                e
            );
        } else {
            tracing::debug!("Removed spooled upload {}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_spool_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let (spool, mut file) = SpooledUpload::create(dir.path()).await.unwrap();
        file.write_all(b"fake mp3 bytes").await.unwrap();
        file.flush().await.unwrap();
        drop(file);

        let path = spool.path().to_path_buf();
        assert!(path.exists());

        drop(spool);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_spool_files_get_unique_names() {
        let dir = tempfile::tempdir().unwrap();

        let (a, _fa) = SpooledUpload::create(dir.path()).await.unwrap();
        let (b, _fb) = SpooledUpload::create(dir.path()).await.unwrap();

        assert_ne!(a.path(), b.path());
    }
}
