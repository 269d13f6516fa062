// src/store/memory.rs
use std::cell::RefCell;
use std::collections::BTreeMap;

use super::hash::compute_revision;
use super::rows::StoredQuery;
use super::{SaveOutcome, SpecStore, StoreResult};
use crate::spec::QuerySpec;

/// Store keeping documents in memory, in their stored (text-blob) form.
#[derive(Debug, Default)]
pub struct MemorySpecStore {
    documents: RefCell<BTreeMap<String, (String, StoredQuery)>>,
}

impl MemorySpecStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored form of a document, as a persistence layer would hold it.
    pub fn stored(&self, name: &str) -> Option<StoredQuery> {
        self.documents.borrow().get(name).map(|(_, doc)| doc.clone())
    }
}

impl SpecStore for MemorySpecStore {
    fn load(&self, name: &str) -> StoreResult<Option<QuerySpec>> {
        match self.stored(name) {
            Some(doc) => Ok(Some(doc.into_spec()?)),
            None => Ok(None),
        }
    }

    fn save(&self, spec: &QuerySpec) -> StoreResult<SaveOutcome> {
        let doc = StoredQuery::from_spec(spec)?;
        let revision = compute_revision(&doc)?;
        let mut documents = self.documents.borrow_mut();
        if let Some((current, _)) = documents.get(&spec.name) {
            if *current == revision {
                return Ok(SaveOutcome::Unchanged(revision));
            }
        }
        documents.insert(spec.name.clone(), (revision.clone(), doc));
        Ok(SaveOutcome::Saved(revision))
    }

    fn delete(&self, name: &str) -> StoreResult<bool> {
        Ok(self.documents.borrow_mut().remove(name).is_some())
    }

    fn list(&self) -> StoreResult<Vec<String>> {
        Ok(self.documents.borrow().keys().cloned().collect())
    }
}
