//! Workspace session: the shell that wires everything together.
//!
//! One session serves one client: it loads the workspace and its documents
//! through the gateway, keeps the optimistic [`DocumentStore`] and the
//! sidebar [`TreeIndex`] in step, and owns the [`EditorAdapter`] for the
//! active page — remounting it whenever the active identity changes, never
//! mutating it across a switch.
//!
//! Nothing here is fatal. Failed persistence rolls the optimistic state
//! back and queues a [`Notice`] for the UI to show.

use std::sync::Arc;

use uuid::Uuid;

use treehouse_editor::{EditorAdapter, Node};

use crate::document::model::{Document, DocumentPatch, Workspace};
use crate::gateway::Gateway;
use crate::store::DocumentStore;
use crate::tree::expand::ExpandedState;
use crate::tree::index::{TreeIndex, VisibleRow};

/// Transient user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

pub struct WorkspaceSession {
    gateway: Arc<dyn Gateway>,
    workspace: Option<Workspace>,
    store: DocumentStore,
    tree: TreeIndex,
    expanded: ExpandedState,
    editor: Option<EditorAdapter>,
    notices: Vec<Notice>,
}

impl WorkspaceSession {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            workspace: None,
            store: DocumentStore::new(),
            tree: TreeIndex::new(),
            expanded: ExpandedState::new(),
            editor: None,
            notices: Vec::new(),
        }
    }

    /// Fetch the workspace and its documents; the first document (if any)
    /// becomes active.
    pub async fn load(&mut self) {
        let workspace = match self.gateway.get_or_create_workspace().await {
            Ok(ws) => ws,
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                return;
            }
        };
        let documents = match self.gateway.list_documents(workspace.id).await {
            Ok(docs) => docs,
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                return;
            }
        };

        self.workspace = Some(workspace);
        self.store.load(documents);
        self.tree = TreeIndex::from_documents(self.store.documents());
        self.store.select_first();
        self.remount_editor();
    }

    /// Create a page (root or under a parent), make it active.
    pub async fn create_document(&mut self, parent: Option<Uuid>) -> Option<Uuid> {
        let Some(workspace_id) = self.workspace.as_ref().map(|ws| ws.id) else {
            self.notices.push(Notice::error("No workspace loaded"));
            return None;
        };

        match self.gateway.create_document(workspace_id, parent).await {
            Ok(doc) => {
                let id = doc.id;
                self.tree.insert(id, doc.parent_document_id);
                self.store.insert(doc);
                self.store.select(id);
                self.remount_editor();
                self.notices.push(Notice::info("Page created"));
                Some(id)
            }
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()));
                None
            }
        }
    }

    /// Switch the active page. Unknown ids are rejected and leave the
    /// current editor untouched.
    pub fn select(&mut self, id: Uuid) -> bool {
        if self.store.select(id) {
            self.remount_editor();
            true
        } else {
            false
        }
    }

    /// Rename the active page (empty titles fall back to the placeholder).
    pub async fn rename(&mut self, title: &str) {
        let Some(id) = self.store.active() else {
            return;
        };
        self.persist_patch(id, DocumentPatch::title(title)).await;
    }

    /// Apply a native editor change to the active page and persist the
    /// serialized snapshot.
    pub async fn edit_content(&mut self, doc: Node) {
        let Some(id) = self.store.active() else {
            return;
        };
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let serialized = editor.apply(doc);
        self.persist_patch(id, DocumentPatch::content(serialized))
            .await;
    }

    /// Move a page under a new parent (or back to the root).
    pub async fn move_document(&mut self, id: Uuid, new_parent: Option<Uuid>) {
        self.persist_patch(id, DocumentPatch::reparent(new_parent))
            .await;
    }

    /// Archive a page. The subtree below it drops out of the sidebar but
    /// its rows stay listed (no cascade).
    pub async fn archive(&mut self, id: Uuid) {
        let was_active = self.store.active() == Some(id);
        let Some(pending) = self.store.begin_remove(id) else {
            return;
        };
        self.tree.remove(id);

        match self.gateway.archive_document(id).await {
            Ok(()) => {
                self.store.commit_remove(pending);
                if was_active {
                    self.store.select_first();
                }
                self.remount_editor();
                self.notices.push(Notice::info("Page archived"));
            }
            Err(err) => {
                self.store.roll_back_remove(pending);
                // Rebuilding puts the row back among its original siblings.
                self.tree = TreeIndex::from_documents(self.store.documents());
                if was_active {
                    self.store.select(id);
                }
                self.remount_editor();
                self.notices.push(Notice::error(err.to_string()));
            }
        }
    }

    pub fn toggle_expanded(&mut self, id: Uuid) {
        self.expanded.toggle(id);
    }

    /// Sidebar rows for the current tree and expand state.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.tree.visible_rows(&self.expanded)
    }

    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    pub fn documents(&self) -> &[Document] {
        self.store.documents()
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.store.active_document()
    }

    pub fn editor(&self) -> Option<&EditorAdapter> {
        self.editor.as_ref()
    }

    pub fn tree(&self) -> &TreeIndex {
        &self.tree
    }

    /// Drain queued notifications for display.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Optimistically apply `patch`, persist it, and commit or roll back.
    async fn persist_patch(&mut self, id: Uuid, patch: DocumentPatch) {
        let reparent = patch.reparents();
        let Some(pending) = self.store.begin_patch(id, &patch) else {
            return;
        };

        match self.gateway.update_document(id, patch).await {
            Ok(row) => {
                let content = row.content.clone();
                self.store.commit(pending, row);
                if let Some(new_parent) = reparent {
                    // Already validated by the gateway; a stale index entry
                    // is not worth failing the edit over.
                    if let Err(err) = self.tree.reparent(id, new_parent) {
                        tracing::debug!(%id, %err, "sidebar index skipped a reparent");
                    }
                }
                if self.store.active() == Some(id) {
                    if let Some(editor) = self.editor.as_mut() {
                        editor.sync_persisted(content.as_deref());
                    }
                }
            }
            Err(err) => {
                self.store.roll_back(pending);
                if reparent.is_some() {
                    self.tree = TreeIndex::from_documents(self.store.documents());
                }
                self.notices.push(Notice::error(err.to_string()));
            }
        }
    }

    /// Tear down and recreate the editor when the active identity changed;
    /// keep it mounted (cursor intact) when it did not.
    fn remount_editor(&mut self) {
        let target = self
            .store
            .active_document()
            .map(|d| (d.id, d.content.clone()));
        match target {
            Some((id, content)) => {
                let stale = self
                    .editor
                    .as_ref()
                    .map(|e| e.document_id() != id)
                    .unwrap_or(true);
                if stale {
                    self.editor = Some(EditorAdapter::mount(id, content.as_deref()));
                }
            }
            None => self.editor = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use treehouse_editor::parse_content;

    use crate::gateway::memory::MemoryGateway;
    use crate::gateway::{GatewayError, MSG_SAVE_CHANGES};

    /// Delegating gateway whose writes can be made to fail, for driving
    /// the rollback paths.
    struct FlakyGateway {
        inner: MemoryGateway,
        fail_writes: AtomicBool,
    }

    impl FlakyGateway {
        fn new() -> Self {
            Self {
                inner: MemoryGateway::seeded(),
                fail_writes: AtomicBool::new(false),
            }
        }

        fn fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        fn check(&self) -> Result<(), GatewayError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(GatewayError::Unavailable(MSG_SAVE_CHANGES))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl Gateway for FlakyGateway {
        async fn get_or_create_workspace(&self) -> Result<Workspace, GatewayError> {
            self.inner.get_or_create_workspace().await
        }

        async fn list_documents(&self, workspace_id: Uuid) -> Result<Vec<Document>, GatewayError> {
            self.inner.list_documents(workspace_id).await
        }

        async fn get_document(&self, id: Uuid) -> Result<Document, GatewayError> {
            self.inner.get_document(id).await
        }

        async fn create_document(
            &self,
            workspace_id: Uuid,
            parent_id: Option<Uuid>,
        ) -> Result<Document, GatewayError> {
            self.check()?;
            self.inner.create_document(workspace_id, parent_id).await
        }

        async fn update_document(
            &self,
            id: Uuid,
            patch: DocumentPatch,
        ) -> Result<Document, GatewayError> {
            self.check()?;
            self.inner.update_document(id, patch).await
        }

        async fn archive_document(&self, id: Uuid) -> Result<(), GatewayError> {
            self.check()?;
            self.inner.archive_document(id).await
        }
    }

    async fn loaded_session() -> WorkspaceSession {
        let mut session = WorkspaceSession::new(Arc::new(MemoryGateway::seeded()));
        session.load().await;
        session
    }

    #[tokio::test]
    async fn load_selects_the_first_document_and_mounts_the_editor() {
        let mut session = loaded_session().await;
        let active = session.active_document().unwrap();
        assert_eq!(active.title, "Getting Started");
        let editor = session.editor().unwrap();
        assert_eq!(editor.document_id(), active.id);
        assert!(editor.snapshot().plain_text().contains("Welcome"));
        assert!(session.take_notices().is_empty());
    }

    #[tokio::test]
    async fn load_of_an_empty_workspace_leaves_nothing_selected() {
        let mut session = WorkspaceSession::new(Arc::new(MemoryGateway::new()));
        session.load().await;
        assert!(session.active_document().is_none());
        assert!(session.editor().is_none());
    }

    #[tokio::test]
    async fn create_makes_the_new_page_active() {
        let mut session = loaded_session().await;
        let first = session.active_document().unwrap().id;

        let id = session.create_document(None).await.unwrap();
        assert_ne!(id, first);
        assert_eq!(session.active_document().unwrap().id, id);
        assert_eq!(session.active_document().unwrap().title, crate::UNTITLED);
        assert!(session.tree().roots().contains(&id));
        // Fresh page, fresh adapter.
        assert_eq!(session.editor().unwrap().document_id(), id);
    }

    #[tokio::test]
    async fn create_under_a_parent_lands_in_its_child_list() {
        let mut session = loaded_session().await;
        let parent = session.active_document().unwrap().id;
        let child = session.create_document(Some(parent)).await.unwrap();
        assert_eq!(session.tree().children(parent), &[child]);
    }

    #[tokio::test]
    async fn switching_documents_remounts_the_editor() {
        let mut session = loaded_session().await;
        let first = session.active_document().unwrap().id;
        let second = session.create_document(None).await.unwrap();

        assert_eq!(session.editor().unwrap().document_id(), second);
        assert!(session.select(first));
        assert_eq!(session.editor().unwrap().document_id(), first);
    }

    #[tokio::test]
    async fn selecting_an_unknown_id_is_rejected() {
        let mut session = loaded_session().await;
        let before = session.active_document().unwrap().id;
        assert!(!session.select(Uuid::new_v4()));
        assert_eq!(session.active_document().unwrap().id, before);
    }

    #[tokio::test]
    async fn rename_persists_and_advances_updated_at() {
        let mut session = loaded_session().await;
        let before = session.active_document().unwrap().clone();

        session.rename("Field Notes").await;

        let after = session.active_document().unwrap();
        assert_eq!(after.title, "Field Notes");
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn edit_content_round_trips_through_the_store() {
        let mut session = loaded_session().await;
        let edited = Node::doc(vec![Node::paragraph(vec![Node::text("brand new text")])]);

        session.edit_content(edited.clone()).await;

        let active = session.active_document().unwrap();
        let persisted = active.content.as_deref().unwrap();
        assert_eq!(parse_content(persisted).unwrap(), edited);
        // The echo back from the commit must not disturb the editor.
        assert_eq!(session.editor().unwrap().snapshot(), &edited);
    }

    #[tokio::test]
    async fn failed_update_rolls_back_and_raises_a_notice() {
        let gateway = Arc::new(FlakyGateway::new());
        let mut session = WorkspaceSession::new(gateway.clone());
        session.load().await;
        let before = session.active_document().unwrap().clone();

        gateway.fail_writes(true);
        session.rename("Lost Title").await;

        assert_eq!(session.active_document().unwrap(), &before);
        let notices = session.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, NoticeKind::Error);
        assert_eq!(notices[0].message, MSG_SAVE_CHANGES);
    }

    #[tokio::test]
    async fn archive_selects_the_next_page() {
        let mut session = loaded_session().await;
        let first = session.active_document().unwrap().id;
        let second = session.create_document(None).await.unwrap();
        session.select(first);

        session.archive(first).await;

        assert_eq!(session.active_document().unwrap().id, second);
        assert!(!session.tree().contains(first));
        assert!(session.documents().iter().all(|d| d.id != first));
    }

    #[tokio::test]
    async fn failed_archive_restores_list_tree_and_selection() {
        let gateway = Arc::new(FlakyGateway::new());
        let mut session = WorkspaceSession::new(gateway.clone());
        session.load().await;
        let id = session.active_document().unwrap().id;

        gateway.fail_writes(true);
        session.archive(id).await;

        assert_eq!(session.active_document().unwrap().id, id);
        assert!(session.tree().roots().contains(&id));
        assert_eq!(session.take_notices().last().unwrap().kind, NoticeKind::Error);
    }

    #[tokio::test]
    async fn visible_rows_follow_expansion() {
        let mut session = loaded_session().await;
        let parent = session.active_document().unwrap().id;
        let child = session.create_document(Some(parent)).await.unwrap();

        let rows = session.visible_rows();
        assert!(rows.iter().all(|r| r.id != child));

        session.toggle_expanded(parent);
        let rows = session.visible_rows();
        assert!(rows.iter().any(|r| r.id == child && r.depth == 1));
    }
}
