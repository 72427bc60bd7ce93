use crate::domain::ports::ChunkSource;
use crate::utils::error::{ContactError, Result};
use std::fs::File;
use std::path::Path;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;

/// Temp file holding one uploaded CSV for the lifetime of an import job.
///
/// The file is removed by [`TempUpload::close`]; if the job future is dropped
/// first (timeout, client disconnect) the inner `NamedTempFile` removes it on drop.
pub struct TempUpload {
    file: NamedTempFile,
}

impl TempUpload {
    pub fn create(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let file = tempfile::Builder::new()
            .prefix("contacts-")
            .suffix(".csv")
            .tempfile_in(dir)?;

        tracing::debug!("Created upload file {}", file.path().display());
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Copies the source into the temp file, failing once more than `max_bytes` arrive.
    pub async fn receive<C>(&self, source: &mut C, max_bytes: u64) -> Result<u64>
    where
        C: ChunkSource + ?Sized,
    {
        let mut writer = tokio::fs::File::from_std(self.file.reopen()?);
        let mut written: u64 = 0;

        while let Some(chunk) = source.next_chunk().await? {
            written += chunk.len() as u64;
            if written > max_bytes {
                return Err(ContactError::PayloadTooLarge { limit: max_bytes });
            }
            writer.write_all(&chunk).await?;
        }

        writer.flush().await?;
        tracing::debug!("Received {} bytes into {}", written, self.path().display());
        Ok(written)
    }

    /// Fresh read handle positioned at the start of the file.
    pub fn reopen(&self) -> Result<File> {
        Ok(self.file.reopen()?)
    }

    pub fn close(self) -> Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        tracing::debug!("Removed upload file {}", path.display());
        Ok(())
    }
}
