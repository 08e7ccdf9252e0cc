//! Business operations over the [`Store`].
//!
//! [`Marketplace`] is the single entry point; each submodule adds one group of
//! operations to it. Role checks are repeated here even when the HTTP layer
//! already enforced them, so the CLI and tests get the same rules.

mod audit;
mod bookings;
mod drafts;
mod promotions;
mod properties;
mod stats;
mod users;

pub use stats::DashboardStats;

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::config::{AppConfig, ChatConfig, SearchConfig};
use crate::store::Store;

#[derive(Clone)]
pub struct Marketplace {
    store: Store,
    search: SearchConfig,
    chat: ChatConfig,
    bootstrap_admins: Arc<HashSet<String>>,
    /// Serializes check-then-insert sequences (user sync, duplicate checks)
    write_lock: Arc<Mutex<()>>,
}

impl Marketplace {
    pub fn new(store: Store, config: &AppConfig) -> Self {
        Self {
            store,
            search: config.search.clone(),
            chat: config.chat.clone(),
            bootstrap_admins: Arc::new(HashSet::new()),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// An in-memory marketplace with default settings.
    pub fn in_memory() -> Self {
        Self::new(Store::in_memory(), &AppConfig::default())
    }

    /// Subjects that become admins on first sign-in.
    pub fn with_bootstrap_admins(mut self, subjects: impl IntoIterator<Item = String>) -> Self {
        self.bootstrap_admins = Arc::new(subjects.into_iter().collect());
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn chat_config(&self) -> &ChatConfig {
        &self.chat
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // the guarded data is `()`, so a poisoned lock is still usable
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
