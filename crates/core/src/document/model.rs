use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level container owning a forest of documents, scoped to one user.
/// Maps to the `workspaces` PostgreSQL table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub user_id: String,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A page: one node in a workspace's forest, keyed by a nullable parent
/// reference. Maps to the `documents` PostgreSQL table.
///
/// `content` is the serialized rich-text blob; persistence treats it as
/// opaque, only `treehouse-editor` understands its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
    pub workspace_id: Uuid,
    pub parent_document_id: Option<Uuid>,
    pub user_id: String,
    pub is_archived: bool,
    pub is_published: bool,
    pub icon: Option<String>,
    pub cover_image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a document. `None` means "leave untouched"; the
/// doubly wrapped fields distinguish "missing" from an explicit null
/// (e.g. `parentDocumentId: null` moves a page back to the root).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub parent_document_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<Option<String>>,
}

/// Keep an explicit JSON `null` as `Some(None)` instead of collapsing it
/// into the "field absent" case.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl DocumentPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(Some(content.into())),
            ..Self::default()
        }
    }

    pub fn reparent(parent: Option<Uuid>) -> Self {
        Self {
            parent_document_id: Some(parent),
            ..Self::default()
        }
    }

    /// Whether the patch changes the parent reference.
    pub fn reparents(&self) -> Option<Option<Uuid>> {
        self.parent_document_id
    }

    /// Merge the provided fields into a row. Does not stamp `updated_at`;
    /// the store doing the write owns the clock.
    pub fn apply_to(&self, doc: &mut Document) {
        if let Some(title) = &self.title {
            doc.title = crate::document::validate::normalize_title(title);
        }
        if let Some(content) = &self.content {
            doc.content = content.clone();
        }
        if let Some(parent) = self.parent_document_id {
            doc.parent_document_id = parent;
        }
        if let Some(published) = self.is_published {
            doc.is_published = published;
        }
        if let Some(icon) = &self.icon {
            doc.icon = icon.clone();
        }
        if let Some(cover) = &self.cover_image {
            doc.cover_image = cover.clone();
        }
    }
}
