//! Error types for memdex
//!
//! The search cascade never surfaces `Index` errors to callers; they are
//! captured per tier and converted into fallback resolution. `Store` errors
//! are genuine infrastructure faults and do surface.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MemdexError>;

#[derive(Debug, Error)]
pub enum MemdexError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing configuration: {0}")]
    MissingConfig(String),

    #[error("invalid member: {0}")]
    InvalidMember(String),

    #[error("duplicate member: {0}")]
    DuplicateMember(String),

    #[error("member not found: {0}")]
    MemberNotFound(String),

    #[error("invalid page request: {0}")]
    InvalidPage(String),

    #[error("member store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("search index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
