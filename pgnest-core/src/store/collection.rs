use std::sync::Arc;

use dashmap::DashMap;

use super::{Document, StoreError, StoreResult};

/// Concurrent map of documents keyed by id.
///
/// Updates go through [`Collection::update`], which edits a copy and only
/// writes it back when the closure succeeds. The closure runs while the
/// document's shard is locked, so it must not touch the same collection.
#[derive(Debug)]
pub struct Collection<T: Document> {
    docs: Arc<DashMap<String, T>>,
}

impl<T: Document> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            docs: Arc::clone(&self.docs),
        }
    }
}

impl<T: Document> Default for Collection<T> {
    fn default() -> Self {
        Self {
            docs: Arc::new(DashMap::new()),
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new document. Fails if the id is taken.
    pub fn insert(&self, doc: T) -> StoreResult<()> {
        match self.docs.entry(doc.id().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(entry) => Err(StoreError::Conflict(format!(
                "{} already contains {}",
                T::COLLECTION,
                entry.key()
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(doc);
                Ok(())
            }
        }
    }

    pub fn get(&self, id: &str) -> StoreResult<T> {
        self.docs
            .get(id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    pub fn find_one(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.docs
            .iter()
            .find(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.docs
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn count(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.docs
            .iter()
            .filter(|entry| predicate(entry.value()))
            .count()
    }

    pub fn all(&self) -> Vec<T> {
        self.find(|_| true)
    }

    /// Apply `f` to the document with `id` atomically.
    pub fn update<R, E>(&self, id: &str, f: impl FnOnce(&mut T) -> Result<R, E>) -> Result<R, E>
    where
        E: From<StoreError>,
    {
        let mut entry = self.docs.get_mut(id).ok_or_else(|| StoreError::NotFound {
            collection: T::COLLECTION,
            id: id.to_string(),
        })?;
        let mut doc = entry.value().clone();
        let result = f(&mut doc)?;
        *entry.value_mut() = doc;
        Ok(result)
    }

    pub fn remove(&self, id: &str) -> StoreResult<T> {
        self.docs
            .remove(id)
            .map(|(_, doc)| doc)
            .ok_or_else(|| StoreError::NotFound {
                collection: T::COLLECTION,
                id: id.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// All documents ordered by id, for stable snapshots.
    pub(super) fn snapshot(&self) -> Vec<T> {
        let mut docs = self.all();
        docs.sort_by(|a, b| a.id().cmp(b.id()));
        docs
    }

    pub(super) fn replace_all(&self, docs: Vec<T>) {
        self.docs.clear();
        for doc in docs {
            self.docs.insert(doc.id().to_string(), doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_insert_get_remove() {
        let notes = Collection::new();
        notes.insert(note("a", "first")).unwrap();
        assert!(matches!(
            notes.insert(note("a", "again")),
            Err(StoreError::Conflict(_))
        ));
        assert_eq!(notes.get("a").unwrap().body, "first");
        assert_eq!(notes.remove("a").unwrap().body, "first");
        assert!(matches!(
            notes.get("a"),
            Err(StoreError::NotFound { collection: "notes", .. })
        ));
    }

    #[test]
    fn test_update_commits_only_on_success() {
        let notes = Collection::new();
        notes.insert(note("a", "first")).unwrap();

        let failed: Result<(), StoreError> = notes.update("a", |n| {
            n.body = "changed".to_string();
            Err(StoreError::Conflict("nope".to_string()))
        });
        assert!(failed.is_err());
        assert_eq!(notes.get("a").unwrap().body, "first");

        let len: Result<usize, StoreError> = notes.update("a", |n| {
            n.body = "second".to_string();
            Ok(n.body.len())
        });
        assert_eq!(len.unwrap(), 6);
        assert_eq!(notes.get("a").unwrap().body, "second");

        let missing: Result<(), StoreError> = notes.update("zzz", |_| Ok(()));
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_find_and_count() {
        let notes = Collection::new();
        for (id, body) in [("a", "x"), ("b", "yy"), ("c", "zz")] {
            notes.insert(note(id, body)).unwrap();
        }
        assert_eq!(notes.count(|n| n.body.len() == 2), 2);
        assert_eq!(notes.find(|n| n.body == "x").len(), 1);
        assert!(notes.find_one(|n| n.body == "nope").is_none());
        let ids: Vec<_> = notes.snapshot().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clones_share_state() {
        let notes = Collection::new();
        let other = notes.clone();
        notes.insert(note("a", "x")).unwrap();
        assert_eq!(other.len(), 1);
    }
}
