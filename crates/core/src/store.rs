//! Client-side document cache.
//!
//! Holds the authoritative in-session list of one workspace's documents
//! plus the active-document id. Every optimistic write goes through an
//! explicit edit lifecycle: `begin_*` applies the change locally and hands
//! back a pending token holding the prior state; the caller resolves the
//! token with `commit` (replace with the persisted row) or `roll_back`
//! (restore the prior state), so a failed save never leaves the cache
//! silently diverged from the store.

use uuid::Uuid;

use crate::document::model::{Document, DocumentPatch};

#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
    active: Option<Uuid>,
}

/// Token for an in-flight field update. Must be resolved exactly once.
#[must_use = "resolve the pending edit with commit or roll_back"]
#[derive(Debug)]
pub struct PendingEdit {
    prior: Document,
}

/// Token for an in-flight removal (archive). Must be resolved exactly once.
#[must_use = "resolve the pending removal with commit_remove or roll_back_remove"]
#[derive(Debug)]
pub struct PendingRemoval {
    prior: Document,
    index: usize,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list (initial load). Clears the active id if it
    /// no longer resolves.
    pub fn load(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        if let Some(active) = self.active {
            if self.get(active).is_none() {
                self.active = None;
            }
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn get(&self, id: Uuid) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn active(&self) -> Option<Uuid> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|id| self.get(id))
    }

    /// Select a document. Unknown ids are rejected rather than stored.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.get(id).is_some() {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn select_first(&mut self) {
        self.active = self.documents.first().map(|d| d.id);
    }

    /// Append a freshly persisted document.
    pub fn insert(&mut self, doc: Document) {
        self.documents.push(doc);
    }

    /// Apply a patch optimistically. Returns `None` when the id is not in
    /// the cache.
    pub fn begin_patch(&mut self, id: Uuid, patch: &DocumentPatch) -> Option<PendingEdit> {
        let doc = self.documents.iter_mut().find(|d| d.id == id)?;
        let prior = doc.clone();
        patch.apply_to(doc);
        Some(PendingEdit { prior })
    }

    /// The save landed: adopt the row the store returned (it carries the
    /// authoritative `updated_at`).
    pub fn commit(&mut self, pending: PendingEdit, persisted: Document) {
        let _ = pending;
        if let Some(doc) = self.documents.iter_mut().find(|d| d.id == persisted.id) {
            *doc = persisted;
        }
    }

    /// The save failed: restore the prior row.
    pub fn roll_back(&mut self, pending: PendingEdit) {
        if let Some(doc) = self
            .documents
            .iter_mut()
            .find(|d| d.id == pending.prior.id)
        {
            *doc = pending.prior;
        }
    }

    /// Remove a document optimistically (archive). Clears the active id
    /// when it pointed at the removed row.
    pub fn begin_remove(&mut self, id: Uuid) -> Option<PendingRemoval> {
        let index = self.documents.iter().position(|d| d.id == id)?;
        let prior = self.documents.remove(index);
        if self.active == Some(id) {
            self.active = None;
        }
        Some(PendingRemoval { prior, index })
    }

    pub fn commit_remove(&mut self, pending: PendingRemoval) {
        let _ = pending;
    }

    /// The archive failed: put the row back where it was.
    pub fn roll_back_remove(&mut self, pending: PendingRemoval) {
        let index = pending.index.min(self.documents.len());
        self.documents.insert(index, pending.prior);
    }
}
