//! Local persistence for client-side state.
//!
//! ```text
//! {storage_dir}/
//! └── theme.toml            # light/dark preference
//!
//! {export_dir}/
//! └── students_YYYY-MM-DD.{xlsx,csv,pdf}
//! ```

pub mod export;
pub mod theme;

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

pub use export::write_export;
pub use theme::{Theme, ThemeStore};

/// Write bytes atomically (write to temp, then rename).
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_atomic_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/file.bin");
        write_atomic(&path, b"abc").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"abc");

        write_atomic(&path, b"xyz").await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"xyz");
        assert!(!dir.path().join("nested/deeper/file.bin.tmp").exists());
    }
}
