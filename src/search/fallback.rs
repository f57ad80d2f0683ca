//! Relational fallback search
//!
//! Used when the index is unavailable, errored, or found nothing. Tries a
//! case-insensitive substring match on name, then username, then email,
//! returning the first non-empty page. Matching nothing is a valid final
//! answer, not an error; a record-store failure here is genuine and
//! propagates, because there is nothing left to fall back to.

use crate::domain::{MemberRecord, Page, PageRequest};
use crate::error::Result;
use crate::storage::{Database, MemberTextField};

const FALLBACK_FIELDS: [MemberTextField; 3] = [
    MemberTextField::Name,
    MemberTextField::Username,
    MemberTextField::Email,
];

pub fn search(db: &Database, keyword: &str, page: &PageRequest) -> Result<Page<MemberRecord>> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return db.list_members(page);
    }

    for field in FALLBACK_FIELDS {
        let result = db.members_containing(field, keyword, page)?;
        if !result.is_empty() {
            return Ok(result);
        }
    }

    Ok(Page::empty(page))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NewMember;
    use tempfile::tempdir;

    fn seed(db: &Database, username: &str, name: &str, email: &str) {
        db.insert_member(
            &NewMember {
                username: username.to_string(),
                name: name.to_string(),
                email: email.to_string(),
                ..NewMember::default()
            },
            "test",
        )
        .unwrap();
    }

    #[test]
    fn name_match_wins_over_username_match() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        seed(&db, "zed", "Smith Jones", "zed@example.com");
        seed(&db, "smith", "Unrelated", "smith@example.com");

        let page = search(&db, "smith", &PageRequest::new(0, 10).unwrap()).unwrap();
        // Only the name-field page is returned; the username match never runs.
        assert_eq!(page.items().len(), 1);
        assert_eq!(page.items()[0].username, "zed");
    }

    #[test]
    fn falls_through_name_then_username_then_email() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        seed(&db, "alice01", "Alice", "alice@corp.example.com");

        let page = search(&db, "corp", &PageRequest::new(0, 10).unwrap()).unwrap();
        assert_eq!(page.items().len(), 1);
        assert_eq!(page.items()[0].username, "alice01");
    }

    #[test]
    fn no_match_is_an_empty_page_not_an_error() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        seed(&db, "alice01", "Alice", "alice@example.com");

        let page = search(&db, "zzz", &PageRequest::new(0, 10).unwrap()).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total(), 0);
    }

    #[test]
    fn blank_keyword_lists_everything() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        seed(&db, "a", "A", "a@example.com");
        seed(&db, "b", "B", "b@example.com");

        let page = search(&db, "  ", &PageRequest::new(0, 10).unwrap()).unwrap();
        assert_eq!(page.items().len(), 2);
        assert_eq!(page.total(), 2);
    }
}
