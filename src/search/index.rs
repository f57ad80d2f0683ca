//! Tantivy-backed member search index
//!
//! The index is a replica, never the source of truth: documents are
//! keyed by member id and resolved back through the record store. Writes
//! delete-then-add by id, so re-running a sync with unchanged data leaves
//! the index contents unchanged.

use std::path::Path;

use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, BooleanQuery};
use tantivy::schema::Value;
use tantivy::{Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::domain::{MemberRecord, PageRequest};
use crate::error::Result;
use crate::search::document;
use crate::search::schema::{self, MemberFields};
use crate::search::tiers::{self, SearchTier};
use crate::storage::Database;

/// Index capability, resolved once at startup.
///
/// The index may legitimately be absent (disabled in config, or it failed to
/// open); resolution then skips straight to the relational fallback.
pub enum IndexHandle {
    Available(MemberIndex),
    Unavailable,
}

impl IndexHandle {
    pub fn as_available(&self) -> Option<&MemberIndex> {
        match self {
            Self::Available(index) => Some(index),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Ranked ids returned by one tier query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoredIds {
    /// Member ids in descending score order for the requested page.
    pub ids: Vec<i64>,
    /// Total hits across all pages.
    pub total: u64,
}

pub struct MemberIndex {
    index: Index,
    fields: MemberFields,
    writer_heap: usize,
}

impl MemberIndex {
    /// Open or create the index at the given directory.
    pub fn open_or_create(dir: impl AsRef<Path>, writer_heap: usize) -> Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let mmap = MmapDirectory::open(dir).map_err(tantivy::TantivyError::from)?;
        let index = Index::open_or_create(mmap, schema::build_schema())?;
        schema::register_tokenizers(&index)?;
        let fields = schema::fields_from_schema(&index.schema())?;

        Ok(Self {
            index,
            fields,
            writer_heap,
        })
    }

    /// Write or overwrite the document for one member.
    pub fn upsert(&self, member: &MemberRecord) -> Result<()> {
        let mut writer = self.writer()?;
        writer.delete_term(Term::from_field_u64(self.fields.member_id, member.id as u64));
        writer.add_document(document::project(&self.fields, member))?;
        writer.commit()?;
        Ok(())
    }

    /// Full resync: drop every document and re-project the entire record
    /// store. `progress` is called once per member.
    pub fn resync(&self, db: &Database, mut progress: impl FnMut()) -> Result<usize> {
        let mut writer = self.writer()?;
        writer.delete_all_documents()?;

        let count = db.for_each_member(|member| {
            writer.add_document(document::project(&self.fields, &member))?;
            progress();
            Ok(())
        })?;

        writer.commit()?;
        Ok(count)
    }

    /// Run one tier's ranked query, returning the requested page of ids in
    /// descending score order plus the total hit count.
    pub fn search_tier(
        &self,
        tier: SearchTier,
        keyword: &str,
        page: &PageRequest,
    ) -> Result<ScoredIds> {
        let clauses = tiers::tier_clauses(&self.index, &self.fields, tier, keyword)?;
        if clauses.is_empty() {
            return Ok(ScoredIds::default());
        }

        let query = BooleanQuery::new(clauses);
        let searcher = self.searcher()?;
        let (top, total) = searcher.search(
            &query,
            &(
                TopDocs::with_limit(page.size()).and_offset(page.offset()),
                Count,
            ),
        )?;

        let mut ids = Vec::with_capacity(top.len());
        for (_score, address) in top {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(self.fields.member_id).and_then(|v| v.as_u64()) {
                ids.push(id as i64);
            }
        }

        Ok(ScoredIds {
            ids,
            total: total as u64,
        })
    }

    /// Number of live documents.
    pub fn num_docs(&self) -> Result<u64> {
        Ok(self.searcher()?.num_docs())
    }

    /// All member ids currently indexed, ascending. Intended for
    /// administrative checks, not the search path.
    pub fn member_ids(&self) -> Result<Vec<i64>> {
        let searcher = self.searcher()?;
        let limit = (searcher.num_docs() as usize).max(1);
        let top = searcher.search(&AllQuery, &TopDocs::with_limit(limit))?;

        let mut ids = Vec::with_capacity(top.len());
        for (_score, address) in top {
            let doc: TantivyDocument = searcher.doc(address)?;
            if let Some(id) = doc.get_first(self.fields.member_id).and_then(|v| v.as_u64()) {
                ids.push(id as i64);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }

    fn writer(&self) -> Result<IndexWriter> {
        Ok(self.index.writer(self.writer_heap)?)
    }

    /// A searcher over the latest committed state. Built fresh per call so
    /// commits from this process are always visible.
    fn searcher(&self) -> Result<tantivy::Searcher> {
        let reader: IndexReader = self
            .index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        Ok(reader.searcher())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;

    const TEST_WRITER_HEAP: usize = 32 * 1024 * 1024;

    fn member(id: i64, username: &str, name: &str, email: &str) -> MemberRecord {
        MemberRecord {
            id,
            username: username.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone_number: None,
            zipcode: None,
            address: None,
            detail_address: None,
            interests: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: None,
            updated_by: None,
        }
    }

    #[test]
    fn upsert_is_idempotent() {
        let dir = tempdir().unwrap();
        let index = MemberIndex::open_or_create(dir.path(), TEST_WRITER_HEAP).unwrap();

        let m = member(1, "alice01", "Alice Kim", "alice@example.com");
        index.upsert(&m).unwrap();
        index.upsert(&m).unwrap();

        assert_eq!(index.num_docs().unwrap(), 1);
        assert_eq!(index.member_ids().unwrap(), vec![1]);
    }

    #[test]
    fn exact_tier_matches_keyword_form_case_insensitively() {
        let dir = tempdir().unwrap();
        let index = MemberIndex::open_or_create(dir.path(), TEST_WRITER_HEAP).unwrap();

        index
            .upsert(&member(7, "alice01", "Alice Kim", "alice@example.com"))
            .unwrap();

        let page = PageRequest::new(0, 10).unwrap();
        let hit = index.search_tier(SearchTier::Exact, "alice01", &page).unwrap();
        assert_eq!(hit.ids, vec![7]);
        assert_eq!(hit.total, 1);

        let upper = index.search_tier(SearchTier::Exact, "ALICE01", &page).unwrap();
        assert_eq!(upper.ids, vec![7]);
    }

    #[test]
    fn tier_respects_page_offset() {
        let dir = tempdir().unwrap();
        let index = MemberIndex::open_or_create(dir.path(), TEST_WRITER_HEAP).unwrap();

        for id in 1..=5 {
            index
                .upsert(&member(
                    id,
                    &format!("user{id}"),
                    "Shared Name",
                    &format!("user{id}@example.com"),
                ))
                .unwrap();
        }

        let first = index
            .search_tier(SearchTier::Exact, "Shared Name", &PageRequest::new(0, 2).unwrap())
            .unwrap();
        assert_eq!(first.ids.len(), 2);
        assert_eq!(first.total, 5);

        let second = index
            .search_tier(SearchTier::Exact, "Shared Name", &PageRequest::new(1, 2).unwrap())
            .unwrap();
        assert_eq!(second.ids.len(), 2);
        assert!(first.ids.iter().all(|id| !second.ids.contains(id)));
    }

    #[test]
    fn reopening_preserves_documents() {
        let dir = tempdir().unwrap();
        {
            let index = MemberIndex::open_or_create(dir.path(), TEST_WRITER_HEAP).unwrap();
            index
                .upsert(&member(3, "bob", "Bob Lee", "bob@example.com"))
                .unwrap();
        }

        let reopened = MemberIndex::open_or_create(dir.path(), TEST_WRITER_HEAP).unwrap();
        assert_eq!(reopened.num_docs().unwrap(), 1);
        let hit = reopened
            .search_tier(SearchTier::Exact, "bob", &PageRequest::new(0, 10).unwrap())
            .unwrap();
        assert_eq!(hit.ids, vec![3]);
    }
}
