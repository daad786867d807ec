//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage location exists at startup.

use std::path::Path;

use tracing::info;

/// Create the parent directory of a SQLite file if it is missing.
/// `None` (in-memory databases, bare file names) is a no-op.
pub async fn ensure_storage_dir(db_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(parent) = db_file.and_then(Path::parent) else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        info!(dir = %parent.display(), "created storage directory");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_parent() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("task-env-{}", uuid::Uuid::new_v4()));
        let file = dir.join("nested").join("tasks.db");
        ensure_storage_dir(Some(&file)).await?;
        assert!(dir.join("nested").is_dir());
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }

    #[tokio::test]
    async fn bare_file_name_is_noop() -> anyhow::Result<()> {
        ensure_storage_dir(Some(Path::new("tasks.db"))).await?;
        ensure_storage_dir(None).await?;
        Ok(())
    }
}
