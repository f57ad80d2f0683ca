//! Member search resolution engine
//!
//! Resolves a free-text keyword into a ranked page of members by running a
//! cascade of scoring strategies against the full-text index, then degrading
//! to a relational substring search when the index is absent, errors, or
//! finds nothing.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     keyword + page request                 │
//! └────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//!                 ┌──────────────────────────┐
//!                 │ classifier (phone/text)  │
//!                 └────────────┬─────────────┘
//!                              ▼
//!        ┌──────────────────────────────────────────────┐
//!        │ planner: phone → exact → relevance → fuzzy → │
//!        │ ngram, first non-empty page wins             │
//!        └────────────┬─────────────────────┬───────────┘
//!                     │ hit                 │ empty / index error
//!                     ▼                     ▼
//!            ranked member page   ┌───────────────────────┐
//!                                 │ fallback: LIKE %kw%   │
//!                                 │ name → username →     │
//!                                 │ email                 │
//!                                 └───────────────────────┘
//! ```

pub mod classifier;
pub mod document;
pub mod fallback;
pub mod index;
pub mod planner;
pub mod resolver;
pub mod schema;
pub mod tiers;

// Re-export main types
pub use classifier::KeywordShape;
pub use index::{IndexHandle, MemberIndex, ScoredIds};
pub use planner::{CascadeOutcome, TierOutcome};
pub use resolver::{resolve, resolve_with_mode, TierSearcher};
pub use tiers::{SearchMode, SearchTier};
