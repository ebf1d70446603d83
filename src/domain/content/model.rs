//! Module content domain entities

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Draft,
    Published,
}

impl std::fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => write!(f, "draft"),
            Self::Published => write!(f, "published"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingFormat {
    Markdown,
    Plain,
    Html,
}

/// The material carried by a content item
#[derive(Debug, Clone)]
pub enum ContentKind {
    Reading {
        format: ReadingFormat,
        body: String,
    },
    File {
        file_name: String,
        file_size: i64,
        mime_type: String,
        storage_path: String,
    },
}

impl ContentKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Reading { .. } => "reading",
            Self::File { .. } => "file",
        }
    }
}

/// An ordered piece of material inside a module
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    /// Unique within the parent module
    pub position: u32,
    pub status: ContentStatus,
    pub kind: ContentKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
