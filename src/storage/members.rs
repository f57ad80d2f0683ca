//! Member repository: CRUD, paged listing, and substring search.
//!
//! All reads order by `member_id` so paging is stable. Substring search is
//! the relational half of the resolution engine; it must stay available even
//! when the full-text index is not.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, OptionalExtension, Row};

use crate::domain::{MemberPatch, MemberRecord, NewMember, Page, PageRequest};
use crate::error::{MemdexError, Result};
use crate::storage::Database;

const MEMBER_COLUMNS: &str = "member_id, username, name, email, phone, zipcode, address, \
     detail_address, interests, created_at, updated_at, created_by, updated_by";

/// Text columns exposed to the substring search operations.
///
/// A closed enum rather than a raw column name keeps field selection a
/// compile-time concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberTextField {
    Name,
    Username,
    Email,
}

impl MemberTextField {
    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Username => "username",
            Self::Email => "email",
        }
    }
}

impl Database {
    /// Insert a new member, assigning its id and audit fields.
    pub fn insert_member(&self, new: &NewMember, actor: &str) -> Result<MemberRecord> {
        let now = Utc::now();
        self.conn().execute(
            "INSERT INTO members (username, name, email, phone, zipcode, address, \
             detail_address, interests, created_at, updated_at, created_by, updated_by) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                new.username,
                new.name,
                new.email,
                new.phone_number,
                new.zipcode,
                new.address,
                new.detail_address,
                serde_json::to_string(&new.interests)?,
                now.to_rfc3339(),
                now.to_rfc3339(),
                actor,
                actor,
            ],
        )?;

        let id = self.conn().last_insert_rowid();
        self.member_by_id(id)?
            .ok_or_else(|| MemdexError::MemberNotFound(format!("member id {id}")))
    }

    /// Apply a partial profile update. The id and `created_*` fields never change.
    pub fn update_member(&self, id: i64, patch: &MemberPatch, actor: &str) -> Result<MemberRecord> {
        let mut record = self
            .member_by_id(id)?
            .ok_or_else(|| MemdexError::MemberNotFound(format!("member id {id}")))?;

        patch.apply(&mut record);
        record.updated_at = Utc::now();
        record.updated_by = Some(actor.to_string());

        self.conn().execute(
            "UPDATE members SET name = ?1, email = ?2, phone = ?3, zipcode = ?4, \
             address = ?5, detail_address = ?6, interests = ?7, updated_at = ?8, \
             updated_by = ?9 WHERE member_id = ?10",
            params![
                record.name,
                record.email,
                record.phone_number,
                record.zipcode,
                record.address,
                record.detail_address,
                serde_json::to_string(&record.interests)?,
                record.updated_at.to_rfc3339(),
                record.updated_by,
                id,
            ],
        )?;

        Ok(record)
    }

    pub fn member_by_id(&self, id: i64) -> Result<Option<MemberRecord>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE member_id = ?1");
        Ok(self
            .conn()
            .query_row(&sql, params![id], member_from_row)
            .optional()?)
    }

    pub fn member_by_username(&self, username: &str) -> Result<Option<MemberRecord>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE username = ?1");
        Ok(self
            .conn()
            .query_row(&sql, params![username], member_from_row)
            .optional()?)
    }

    pub fn member_by_email(&self, email: &str) -> Result<Option<MemberRecord>> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members WHERE email = ?1");
        Ok(self
            .conn()
            .query_row(&sql, params![email], member_from_row)
            .optional()?)
    }

    /// Fetch records for a set of ids, preserving the input order.
    ///
    /// Ids without a row are silently skipped: the index may briefly hold
    /// documents the record store no longer confirms.
    pub fn members_by_ids(&self, ids: &[i64]) -> Result<Vec<MemberRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(",");
        let sql =
            format!("SELECT {MEMBER_COLUMNS} FROM members WHERE member_id IN ({placeholders})");
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), member_from_row)?;

        let mut by_id = std::collections::HashMap::with_capacity(ids.len());
        for row in rows {
            let record = row?;
            by_id.insert(record.id, record);
        }

        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Unfiltered page of members ordered by id.
    pub fn list_members(&self, page: &PageRequest) -> Result<Page<MemberRecord>> {
        let total = self.count_members()?;
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members ORDER BY member_id LIMIT ?1 OFFSET ?2"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(
            params![page.size() as i64, page.offset() as i64],
            member_from_row,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(Page::new(items, page, total))
    }

    /// Case-insensitive substring search on a single text column, id-ordered.
    pub fn members_containing(
        &self,
        field: MemberTextField,
        keyword: &str,
        page: &PageRequest,
    ) -> Result<Page<MemberRecord>> {
        let column = field.column();
        let pattern = format!("%{}%", escape_like(keyword));

        let total: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM members WHERE {column} LIKE ?1 ESCAPE '\\'"),
            params![pattern],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM members WHERE {column} LIKE ?1 ESCAPE '\\' \
             ORDER BY member_id LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map(
            params![pattern, page.size() as i64, page.offset() as i64],
            member_from_row,
        )?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(Page::new(items, page, total as u64))
    }

    pub fn count_members(&self) -> Result<u64> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM members", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Stream every member in id order, for the full index resync.
    pub fn for_each_member(&self, mut f: impl FnMut(MemberRecord) -> Result<()>) -> Result<usize> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM members ORDER BY member_id");
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], member_from_row)?;

        let mut count = 0;
        for row in rows {
            f(row?)?;
            count += 1;
        }
        Ok(count)
    }
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<MemberRecord> {
    let interests_json: String = row.get(8)?;
    let interests: Vec<String> = serde_json::from_str(&interests_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(MemberRecord {
        id: row.get(0)?,
        username: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone_number: row.get(4)?,
        zipcode: row.get(5)?,
        address: row.get(6)?,
        detail_address: row.get(7)?,
        interests,
        created_at: datetime_column(row, 9)?,
        updated_at: datetime_column(row, 10)?,
        created_by: row.get(11)?,
        updated_by: row.get(12)?,
    })
}

fn datetime_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Escape `%`, `_`, and the escape character itself for a LIKE pattern.
fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
