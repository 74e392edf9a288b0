//! Immutable value objects for the publishing catalog.
//!
//! Each type wraps a single primitive identity or content value: built
//! once, never mutated, compared and hashed through the wrapped value.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Author {
    name: String,
}

impl Author {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Typed identifier for a book record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChapterTitle(String);

impl ChapterTitle {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ChapterContent(String);

impl ChapterContent {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Chapter {
    title: ChapterTitle,
    content: ChapterContent,
}

impl Chapter {
    pub fn new(title: ChapterTitle, content: ChapterContent) -> Self {
        Self { title, content }
    }

    pub fn title(&self) -> &ChapterTitle {
        &self.title
    }

    pub fn content(&self) -> &ChapterContent {
        &self.content
    }
}
