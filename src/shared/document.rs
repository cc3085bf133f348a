/**
 * Document Model
 *
 * This module defines the document record shared between the HTTP API and the
 * stores. Documents are plain values: every change produces a new value which
 * the caller writes back with a single store `replace`.
 *
 * # Invariants
 *
 * - Exactly one owner, fixed at creation
 * - The owner never appears in `collaborators`
 * - `collaborators` holds no duplicates (order carries no meaning)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::identity::UserId;

/// Opaque document identifier, also used as the realtime room id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(pub Uuid);

impl DocumentId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Declared file kind of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DocumentKind {
    /// Markdown
    #[default]
    #[serde(rename = "md")]
    Markdown,
    /// Plain text
    #[serde(rename = "txt")]
    Plain,
    /// Rich text
    #[serde(rename = "docx")]
    Rich,
}

impl DocumentKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Plain => "txt",
            Self::Rich => "docx",
        }
    }

    /// Whether raw file content of this kind can be imported as text
    pub fn is_importable(&self) -> bool {
        matches!(self, Self::Markdown | Self::Plain)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md" => Ok(Self::Markdown),
            "txt" => Ok(Self::Plain),
            "docx" => Ok(Self::Rich),
            other => Err(SharedError::unsupported_kind(other)),
        }
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    pub title: String,
    /// Opaque text blob
    pub content: String,
    pub file_type: DocumentKind,
    pub owner: UserId,
    pub collaborators: Vec<UserId>,
    pub is_public: bool,
    /// Incremented on every store write
    pub version: i64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Create a private document with no collaborators
    pub fn new(owner: UserId, title: String, content: String, file_type: DocumentKind) -> Self {
        let now = Utc::now();
        Self {
            id: DocumentId::new(),
            title,
            content,
            file_type,
            owner,
            collaborators: Vec::new(),
            is_public: false,
            version: 0,
            last_modified: now,
            created_at: now,
        }
    }

    /// Whether `user` is in the collaborator set
    pub fn has_collaborator(&self, user: UserId) -> bool {
        self.collaborators.contains(&user)
    }

    /// Owner-owned copy with the same content and kind
    pub fn duplicate_for(&self, owner: UserId) -> Self {
        Self::new(
            owner,
            format!("{} (Copy)", self.title),
            self.content.clone(),
            self.file_type,
        )
    }
}

/// Partial update of a document's editable fields
///
/// `None` leaves the field untouched. Empty strings are normalised to `None`
/// before they get here, so a patch never blanks a title or content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub file_type: Option<DocumentKind>,
}

impl DocumentPatch {
    /// Build a patch from raw request fields
    ///
    /// Empty strings count as absent; an unrecognised kind is ignored.
    pub fn from_raw(
        title: Option<String>,
        content: Option<String>,
        file_type: Option<String>,
    ) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());
        Self {
            title: non_empty(title),
            content: non_empty(content),
            file_type: file_type.and_then(|k| k.parse().ok()),
        }
    }

    /// Apply to `doc`, returning the updated value with a fresh timestamp
    pub fn apply(self, doc: &Document, now: DateTime<Utc>) -> Document {
        Document {
            title: self.title.unwrap_or_else(|| doc.title.clone()),
            content: self.content.unwrap_or_else(|| doc.content.clone()),
            file_type: self.file_type.unwrap_or(doc.file_type),
            last_modified: now,
            ..doc.clone()
        }
    }
}

/// Strip the final extension from an uploaded file name.
///
/// Falls back to the full name when stripping would leave nothing.
pub fn title_from_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < base.len() => base[..idx].to_string(),
        _ => base.to_string(),
    }
}
