//! Tier cascade decision logic
//!
//! The cascade is deliberately dumb: tiers run strictly in order and the
//! first non-empty page wins, even if a later tier would have scored a
//! better hit. Changing that would change ranking behavior, so it stays.
//!
//! Outcomes are explicit sum types rather than exceptions, so "tier found
//! nothing" and "tier failed" stay distinguishable inside the planner while
//! both remain invisible to callers.

use crate::domain::{MemberRecord, Page};
use crate::error::{MemdexError, Result};
use crate::search::classifier::KeywordShape;
use crate::search::tiers::SearchTier;

/// Result of one tier attempt.
pub enum TierOutcome {
    /// The tier produced a non-empty page.
    Hit(Page<MemberRecord>),
    /// The tier completed but matched nothing.
    Empty,
    /// The index call failed; the cascade must abort.
    Failed(MemdexError),
}

/// Result of a full cascade run.
pub enum CascadeOutcome {
    Hit(Page<MemberRecord>),
    /// Every tier completed and every tier was empty.
    NoHits,
    /// A tier failed; remaining tiers were not attempted.
    Aborted(MemdexError),
}

/// Tier order for a keyword shape. Phone-shaped keywords try the phone tier
/// first, then the generic cascade.
pub fn cascade_order(shape: KeywordShape) -> &'static [SearchTier] {
    match shape {
        KeywordShape::Phone => &[
            SearchTier::Phone,
            SearchTier::Exact,
            SearchTier::Relevance,
            SearchTier::Fuzzy,
            SearchTier::Ngram,
        ],
        KeywordShape::Text => &[
            SearchTier::Exact,
            SearchTier::Relevance,
            SearchTier::Fuzzy,
            SearchTier::Ngram,
        ],
    }
}

/// Run tiers in order, stopping at the first hit or the first failure.
///
/// The `Err` branch of `run` is reserved for record-store faults while
/// resolving ids back to rows; those are genuine errors and propagate.
pub fn run_cascade(
    tiers: &[SearchTier],
    mut run: impl FnMut(SearchTier) -> Result<TierOutcome>,
) -> Result<CascadeOutcome> {
    for &tier in tiers {
        match run(tier)? {
            TierOutcome::Hit(page) => return Ok(CascadeOutcome::Hit(page)),
            TierOutcome::Empty => continue,
            TierOutcome::Failed(cause) => return Ok(CascadeOutcome::Aborted(cause)),
        }
    }
    Ok(CascadeOutcome::NoHits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageRequest;

    fn page_of(ids: &[i64]) -> Page<MemberRecord> {
        use chrono::Utc;
        let request = PageRequest::new(0, 10).unwrap();
        let items = ids
            .iter()
            .map(|&id| MemberRecord {
                id,
                username: format!("user{id}"),
                name: format!("User {id}"),
                email: format!("user{id}@example.com"),
                phone_number: None,
                zipcode: None,
                address: None,
                detail_address: None,
                interests: vec![],
                created_at: Utc::now(),
                updated_at: Utc::now(),
                created_by: None,
                updated_by: None,
            })
            .collect();
        Page::new(items, &request, ids.len() as u64)
    }

    #[test]
    fn phone_shape_prepends_phone_tier() {
        assert_eq!(cascade_order(KeywordShape::Phone)[0], SearchTier::Phone);
        assert_eq!(cascade_order(KeywordShape::Text)[0], SearchTier::Exact);
        assert_eq!(cascade_order(KeywordShape::Phone).len(), 5);
        assert_eq!(cascade_order(KeywordShape::Text).len(), 4);
    }

    #[test]
    fn first_hit_short_circuits() {
        let mut attempted = Vec::new();
        let outcome = run_cascade(cascade_order(KeywordShape::Text), |tier| {
            attempted.push(tier);
            Ok(match tier {
                SearchTier::Relevance => TierOutcome::Hit(page_of(&[1])),
                _ => TierOutcome::Empty,
            })
        })
        .unwrap();

        assert!(matches!(outcome, CascadeOutcome::Hit(_)));
        assert_eq!(attempted, vec![SearchTier::Exact, SearchTier::Relevance]);
    }

    #[test]
    fn failure_aborts_without_trying_later_tiers() {
        let mut attempted = Vec::new();
        let outcome = run_cascade(cascade_order(KeywordShape::Text), |tier| {
            attempted.push(tier);
            Ok(match tier {
                SearchTier::Exact => TierOutcome::Empty,
                _ => TierOutcome::Failed(MemdexError::Config("boom".to_string())),
            })
        })
        .unwrap();

        assert!(matches!(outcome, CascadeOutcome::Aborted(_)));
        assert_eq!(attempted, vec![SearchTier::Exact, SearchTier::Relevance]);
    }

    #[test]
    fn all_empty_reports_no_hits() {
        let mut count = 0;
        let outcome = run_cascade(cascade_order(KeywordShape::Phone), |_| {
            count += 1;
            Ok(TierOutcome::Empty)
        })
        .unwrap();

        assert!(matches!(outcome, CascadeOutcome::NoHits));
        assert_eq!(count, 5);
    }

    #[test]
    fn store_errors_propagate() {
        let result = run_cascade(cascade_order(KeywordShape::Text), |_| {
            Err(MemdexError::MemberNotFound("gone".to_string()))
        });
        assert!(result.is_err());
    }
}
