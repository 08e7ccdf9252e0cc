//! Document store.
//!
//! Every entity lives in its own [`Collection`], a concurrent id → document map.
//! A [`Store`] opened on a data directory snapshots each collection to
//! `<dir>/<collection>.json` on [`Store::flush`] and reloads it on [`Store::open`].

mod collection;
mod snapshot;

pub use collection::Collection;

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::info;

use crate::models::{AuditLog, Booking, OwnerPromotionRequest, Property, User};
use crate::wizard::PropertyDraft;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection} not found: {id}")]
    NotFound { collection: &'static str, id: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A value that can be kept in a [`Collection`].
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection name, also used as the snapshot file stem
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
}

#[derive(Clone, Default)]
pub struct Store {
    pub users: Collection<User>,
    pub properties: Collection<Property>,
    pub bookings: Collection<Booking>,
    pub audit_logs: Collection<AuditLog>,
    pub promotions: Collection<OwnerPromotionRequest>,
    pub drafts: Collection<PropertyDraft>,
    data_dir: Option<PathBuf>,
}

impl Store {
    /// An empty store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a store backed by `dir`, loading any snapshots already there.
    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let store = Self {
            data_dir: Some(dir.clone()),
            ..Self::default()
        };
        snapshot::load_into(&dir, &store.users).await?;
        snapshot::load_into(&dir, &store.properties).await?;
        snapshot::load_into(&dir, &store.bookings).await?;
        snapshot::load_into(&dir, &store.audit_logs).await?;
        snapshot::load_into(&dir, &store.promotions).await?;
        snapshot::load_into(&dir, &store.drafts).await?;

        info!(
            "Opened store at {} ({} users, {} properties, {} bookings)",
            dir.display(),
            store.users.len(),
            store.properties.len(),
            store.bookings.len()
        );
        Ok(store)
    }

    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    /// Write every collection to the data directory. No-op for in-memory stores.
    pub async fn flush(&self) -> StoreResult<()> {
        let Some(dir) = &self.data_dir else {
            return Ok(());
        };
        snapshot::save(dir, &self.users).await?;
        snapshot::save(dir, &self.properties).await?;
        snapshot::save(dir, &self.bookings).await?;
        snapshot::save(dir, &self.audit_logs).await?;
        snapshot::save(dir, &self.promotions).await?;
        snapshot::save(dir, &self.drafts).await?;
        Ok(())
    }
}
