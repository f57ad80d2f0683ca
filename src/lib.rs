//! memdex - member directory with tiered search resolution
//!
//! A member directory backed by two stores: SQLite as the authoritative
//! record store and a Tantivy full-text index carrying denormalized,
//! multi-form copies of the member fields. Keyword resolution runs a
//! cascade of ranked index queries and degrades to a relational substring
//! search whenever the index is absent, errors, or finds nothing.

pub mod app;
pub mod cli;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod search;
pub mod storage;

pub use error::{MemdexError, Result};
