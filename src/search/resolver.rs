//! Keyword resolution entry points
//!
//! `resolve` runs the full tier cascade; `resolve_with_mode` pins a single
//! tier. Both are guaranteed never to surface an index-layer failure: every
//! index error converts into a relational fallback run. Callers receive a
//! page (possibly empty) or a record-store error; they can never observe
//! whether the index failed or merely found nothing.

use tracing::{debug, warn};

use crate::domain::{MemberRecord, Page, PageRequest};
use crate::error::Result;
use crate::search::classifier::KeywordShape;
use crate::search::fallback;
use crate::search::index::{IndexHandle, MemberIndex, ScoredIds};
use crate::search::planner::{self, CascadeOutcome, TierOutcome};
use crate::search::tiers::{SearchMode, SearchTier};
use crate::storage::Database;

/// The ranked-query surface a search index must offer the resolver.
///
/// `MemberIndex` is the production implementation; tests substitute failing
/// or canned implementations to exercise the degradation paths.
pub trait TierSearcher {
    fn search_tier(&self, tier: SearchTier, keyword: &str, page: &PageRequest)
        -> Result<ScoredIds>;
}

impl TierSearcher for MemberIndex {
    fn search_tier(
        &self,
        tier: SearchTier,
        keyword: &str,
        page: &PageRequest,
    ) -> Result<ScoredIds> {
        MemberIndex::search_tier(self, tier, keyword, page)
    }
}

/// Resolve a keyword through the full tier cascade.
///
/// Blank or absent keywords degrade to the unfiltered id-ordered listing.
pub fn resolve(
    db: &Database,
    index: &IndexHandle,
    keyword: Option<&str>,
    page: &PageRequest,
) -> Result<Page<MemberRecord>> {
    resolve_cascade(db, index.as_available(), keyword, page)
}

/// Resolve a keyword through exactly one pinned tier. An empty or failed
/// tier passes straight to the relational fallback, never to other tiers.
pub fn resolve_with_mode(
    db: &Database,
    index: &IndexHandle,
    keyword: Option<&str>,
    mode: SearchMode,
    page: &PageRequest,
) -> Result<Page<MemberRecord>> {
    resolve_pinned(db, index.as_available(), keyword, mode, page)
}

pub(crate) fn resolve_cascade<S: TierSearcher>(
    db: &Database,
    searcher: Option<&S>,
    keyword: Option<&str>,
    page: &PageRequest,
) -> Result<Page<MemberRecord>> {
    let Some(keyword) = normalized(keyword) else {
        return db.list_members(page);
    };

    let Some(searcher) = searcher else {
        debug!(keyword, "index unavailable, using relational fallback");
        return fallback::search(db, keyword, page);
    };

    let shape = KeywordShape::classify(keyword);
    let order = planner::cascade_order(shape);
    let outcome = planner::run_cascade(order, |tier| tier_outcome(db, searcher, tier, keyword, page))?;

    match outcome {
        CascadeOutcome::Hit(hit) => Ok(hit),
        CascadeOutcome::NoHits => {
            debug!(keyword, "index cascade exhausted, using relational fallback");
            fallback::search(db, keyword, page)
        }
        CascadeOutcome::Aborted(cause) => {
            warn!(keyword, error = %cause, "index cascade aborted, using relational fallback");
            fallback::search(db, keyword, page)
        }
    }
}

pub(crate) fn resolve_pinned<S: TierSearcher>(
    db: &Database,
    searcher: Option<&S>,
    keyword: Option<&str>,
    mode: SearchMode,
    page: &PageRequest,
) -> Result<Page<MemberRecord>> {
    let Some(keyword) = normalized(keyword) else {
        return db.list_members(page);
    };

    let Some(searcher) = searcher else {
        return fallback::search(db, keyword, page);
    };

    let tier = mode.pinned_tier();
    match tier_outcome(db, searcher, tier, keyword, page)? {
        TierOutcome::Hit(hit) => Ok(hit),
        TierOutcome::Empty => fallback::search(db, keyword, page),
        TierOutcome::Failed(cause) => {
            warn!(keyword, tier = tier.as_str(), error = %cause, "pinned tier failed, using relational fallback");
            fallback::search(db, keyword, page)
        }
    }
}

/// Run one tier and classify its result. Index errors become
/// `TierOutcome::Failed`; record-store errors while resolving ids back to
/// rows are genuine faults and propagate as `Err`.
fn tier_outcome<S: TierSearcher>(
    db: &Database,
    searcher: &S,
    tier: SearchTier,
    keyword: &str,
    page: &PageRequest,
) -> Result<TierOutcome> {
    let scored = match searcher.search_tier(tier, keyword, page) {
        Ok(scored) => scored,
        Err(cause) => return Ok(TierOutcome::Failed(cause)),
    };

    if scored.ids.is_empty() {
        return Ok(TierOutcome::Empty);
    }

    debug!(
        tier = tier.as_str(),
        hits = scored.ids.len(),
        total = scored.total,
        "tier produced a page"
    );
    let records = db.members_by_ids(&scored.ids)?;
    Ok(TierOutcome::Hit(Page::new(records, page, scored.total)))
}

fn normalized(keyword: Option<&str>) -> Option<&str> {
    keyword.map(str::trim).filter(|k| !k.is_empty())
}
