//! JSON snapshot files, one per collection.

use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{Collection, Document, StoreError, StoreResult};

fn snapshot_path(dir: &Path, collection: &str) -> PathBuf {
    dir.join(format!("{}.json", collection))
}

pub(super) async fn load_into<T: Document>(
    dir: &Path,
    collection: &Collection<T>,
) -> StoreResult<()> {
    let path = snapshot_path(dir, T::COLLECTION);
    if !path.exists() {
        return Ok(());
    }
    let contents = fs::read(&path).await?;
    let docs: Vec<T> = serde_json::from_slice(&contents)?;
    debug!("Loaded {} documents from {}", docs.len(), path.display());
    collection.replace_all(docs);
    Ok(())
}

/// Write to a temporary file in the same directory, then rename over the target.
pub(super) async fn save<T: Document>(dir: &Path, collection: &Collection<T>) -> StoreResult<()> {
    let path = snapshot_path(dir, T::COLLECTION);
    let data = serde_json::to_vec_pretty(&collection.snapshot())?;

    fs::create_dir_all(dir).await?;
    let temp_file = NamedTempFile::new_in(dir)?;
    let temp_path = temp_file.path().to_path_buf();

    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(&data).await?;
    file.flush().await?;
    drop(file);

    temp_file
        .persist(&path)
        .map_err(|e| StoreError::Io(e.error))?;
    debug!("Saved {} to {}", T::COLLECTION, path.display());
    Ok(())
}
