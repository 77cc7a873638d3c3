//! Saving downloaded student exports.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Write export bytes to `dir/file_name` and return the full path.
///
/// An existing file of the same name (same format, same day) is replaced.
pub async fn write_export(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
    if file_name.is_empty() || file_name.contains(['/', '\\']) {
        return Err(AppError::validation(format!(
            "invalid export file name: {file_name:?}"
        )));
    }
    let path = dir.join(file_name);
    super::write_atomic(&path, bytes).await?;
    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_export(dir.path(), "students_2025-03-01.csv", b"id,name\n")
            .await
            .unwrap();
        assert_eq!(path, dir.path().join("students_2025-03-01.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"id,name\n");
    }

    #[tokio::test]
    async fn test_rejects_path_in_name() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_export(dir.path(), "../escape.csv", b"").await;
        assert!(matches!(err, Err(AppError::Validation(_))));
    }
}
