//! Member directory service
//!
//! The record-store write path plus delegation into the search resolver.
//! Every successful write attempts a best-effort index upsert; an index
//! failure is logged and swallowed because the record store is
//! authoritative and the index can be rebuilt with `resync`.

use tracing::{info, warn};

use crate::domain::{MemberPatch, MemberRecord, NewMember, Page, PageRequest};
use crate::error::{MemdexError, Result};
use crate::search::{resolver, IndexHandle, SearchMode};
use crate::storage::Database;

pub struct Directory<'a> {
    db: &'a Database,
    index: &'a IndexHandle,
    actor: &'a str,
}

impl<'a> Directory<'a> {
    pub fn new(db: &'a Database, index: &'a IndexHandle, actor: &'a str) -> Self {
        Self { db, index, actor }
    }

    /// Register a new member. Username and email must be unique.
    pub fn register(&self, new: NewMember) -> Result<MemberRecord> {
        if new.username.trim().is_empty() {
            return Err(MemdexError::InvalidMember("username is required".to_string()));
        }
        if new.name.trim().is_empty() {
            return Err(MemdexError::InvalidMember("name is required".to_string()));
        }
        if new.email.trim().is_empty() {
            return Err(MemdexError::InvalidMember("email is required".to_string()));
        }

        if self.db.member_by_username(&new.username)?.is_some() {
            return Err(MemdexError::DuplicateMember(format!(
                "username {} is already taken",
                new.username
            )));
        }
        if self.db.member_by_email(&new.email)?.is_some() {
            return Err(MemdexError::DuplicateMember(format!(
                "email {} is already in use",
                new.email
            )));
        }

        let record = self.db.insert_member(&new, self.actor)?;
        info!(member_id = record.id, username = %record.username, "member registered");
        self.upsert_index(&record);
        Ok(record)
    }

    /// Apply a profile update and re-sync the index document.
    pub fn update_profile(&self, id: i64, patch: &MemberPatch) -> Result<MemberRecord> {
        if patch.is_empty() {
            return Err(MemdexError::InvalidMember(
                "update requires at least one field".to_string(),
            ));
        }

        if let Some(email) = &patch.email {
            if let Some(existing) = self.db.member_by_email(email)? {
                if existing.id != id {
                    return Err(MemdexError::DuplicateMember(format!(
                        "email {email} is already in use"
                    )));
                }
            }
        }

        let record = self.db.update_member(id, patch, self.actor)?;
        info!(member_id = record.id, "member profile updated");
        self.upsert_index(&record);
        Ok(record)
    }

    pub fn member_by_id(&self, id: i64) -> Result<Option<MemberRecord>> {
        self.db.member_by_id(id)
    }

    pub fn member_by_username(&self, username: &str) -> Result<Option<MemberRecord>> {
        self.db.member_by_username(username)
    }

    /// Unfiltered id-ordered page of members.
    pub fn list(&self, page: &PageRequest) -> Result<Page<MemberRecord>> {
        self.db.list_members(page)
    }

    /// The search resolution function. Without a mode, the full tier cascade
    /// runs; with one, only the pinned tier is queried before the fallback.
    pub fn search(
        &self,
        keyword: Option<&str>,
        mode: Option<SearchMode>,
        page: &PageRequest,
    ) -> Result<Page<MemberRecord>> {
        match mode {
            Some(mode) => resolver::resolve_with_mode(self.db, self.index, keyword, mode, page),
            None => resolver::resolve(self.db, self.index, keyword, page),
        }
    }

    /// Full index resync from the record store. Errors if no index is
    /// configured: there is nothing to rebuild.
    pub fn resync(&self, progress: impl FnMut()) -> Result<usize> {
        match self.index {
            IndexHandle::Available(index) => {
                let count = index.resync(self.db, progress)?;
                info!(documents = count, "search index resynced");
                Ok(count)
            }
            IndexHandle::Unavailable => Err(MemdexError::MissingConfig(
                "search index is not configured; enable [index] before resyncing".to_string(),
            )),
        }
    }

    fn upsert_index(&self, record: &MemberRecord) {
        if let IndexHandle::Available(index) = self.index {
            if let Err(cause) = index.upsert(record) {
                warn!(
                    member_id = record.id,
                    error = %cause,
                    "search index upsert failed; record store remains authoritative"
                );
            }
        }
    }
}
