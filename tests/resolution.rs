//! End-to-end resolution scenarios through the public directory API.

use anyhow::Result;
use memdex::directory::Directory;
use memdex::domain::{NewMember, PageRequest};
use memdex::search::{IndexHandle, MemberIndex, SearchMode};
use memdex::storage::Database;
use tempfile::TempDir;

const WRITER_HEAP: usize = 32 * 1024 * 1024;

struct World {
    _dir: TempDir,
    db: Database,
    index: IndexHandle,
}

impl World {
    fn with_index() -> Result<Self> {
        let dir = TempDir::new()?;
        let db = Database::open(dir.path().join("memdex.db"))?;
        let index = IndexHandle::Available(MemberIndex::open_or_create(
            dir.path().join("index"),
            WRITER_HEAP,
        )?);
        Ok(Self {
            _dir: dir,
            db,
            index,
        })
    }

    fn without_index() -> Result<Self> {
        let dir = TempDir::new()?;
        let db = Database::open(dir.path().join("memdex.db"))?;
        Ok(Self {
            _dir: dir,
            db,
            index: IndexHandle::Unavailable,
        })
    }

    fn directory(&self) -> Directory<'_> {
        Directory::new(&self.db, &self.index, "test")
    }

    fn seed(&self, username: &str, name: &str, email: &str, phone: Option<&str>) -> Result<i64> {
        let record = self.directory().register(NewMember {
            username: username.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            phone_number: phone.map(str::to_string),
            ..NewMember::default()
        })?;
        Ok(record.id)
    }
}

fn page(page: usize, size: usize) -> PageRequest {
    PageRequest::new(page, size).unwrap()
}

#[test]
fn exact_username_outranks_permissive_matches() -> Result<()> {
    let world = World::with_index()?;
    let alice = world.seed("alice01", "Alice Kim", "alice@example.com", None)?;
    world.seed("malice0123", "Other Person", "other@example.com", None)?;

    let result = world
        .directory()
        .search(Some("alice01"), None, &page(0, 10))?;

    assert_eq!(result.items()[0].id, alice);
    // The exact tier answered, so the substring-only member is absent.
    assert_eq!(result.items().len(), 1);
    Ok(())
}

#[test]
fn phone_tier_wins_for_all_digit_keywords() -> Result<()> {
    let world = World::with_index()?;
    // Would match through the relevance tier's username wildcard.
    world.seed("user5551234567", "Digit Squatter", "squat@example.com", None)?;
    let owner = world.seed("owner", "Phone Owner", "owner@example.com", Some("5551234567"))?;

    let result = world
        .directory()
        .search(Some("5551234567"), None, &page(0, 10))?;

    assert_eq!(result.items().len(), 1);
    assert_eq!(result.items()[0].id, owner, "phone tier must preempt relevance");
    Ok(())
}

#[test]
fn relevance_ranks_prefix_match_above_substring_match() -> Result<()> {
    let world = World::with_index()?;
    let alice = world.seed("ua", "Alice", "a@example.com", None)?;
    let natalia = world.seed("un", "Natalia", "n@example.com", None)?;

    let result = world.directory().search(Some("ali"), None, &page(0, 10))?;
    let ids: Vec<i64> = result.items().iter().map(|m| m.id).collect();

    assert!(ids.contains(&alice));
    assert!(ids.contains(&natalia));
    assert_eq!(ids[0], alice);
    Ok(())
}

#[test]
fn missing_index_resolves_through_relational_fallback() -> Result<()> {
    let world = World::without_index()?;
    let alice = world.seed("alice01", "Alice", "alice@corp.example.com", None)?;

    let result = world.directory().search(Some("corp"), None, &page(0, 10))?;

    assert_eq!(result.items().len(), 1);
    assert_eq!(result.items()[0].id, alice);
    Ok(())
}

#[test]
fn blank_keyword_pages_all_members_by_id() -> Result<()> {
    let world = World::with_index()?;
    for i in 0..25 {
        world.seed(
            &format!("user{i:02}"),
            &format!("User {i:02}"),
            &format!("user{i:02}@example.com"),
            None,
        )?;
    }

    let result = world.directory().search(Some(""), None, &page(0, 10))?;

    assert_eq!(result.items().len(), 10);
    assert_eq!(result.total(), 25);
    assert_eq!(result.total_pages(), 3);
    assert!(result.has_next());
    assert!(!result.has_prev());
    assert!(result.items().windows(2).all(|w| w[0].id < w[1].id));

    let direct = world.db.list_members(&page(0, 10))?;
    let resolved_ids: Vec<i64> = result.items().iter().map(|m| m.id).collect();
    let direct_ids: Vec<i64> = direct.items().iter().map(|m| m.id).collect();
    assert_eq!(resolved_ids, direct_ids);
    Ok(())
}

#[test]
fn no_match_anywhere_is_an_empty_page() -> Result<()> {
    let world = World::with_index()?;
    world.seed("alice01", "Alice", "alice@example.com", None)?;

    let result = world
        .directory()
        .search(Some("qqqqqq"), None, &page(0, 10))?;

    assert!(result.is_empty());
    assert_eq!(result.total(), 0);
    assert_eq!(result.total_pages(), 0);
    Ok(())
}

#[test]
fn pinned_mode_skips_the_cascade() -> Result<()> {
    let world = World::with_index()?;
    let alice = world.seed("alice01", "Alice Kim", "alice@example.com", None)?;

    // Exact mode finds the exact username.
    let exact = world
        .directory()
        .search(Some("alice01"), Some(SearchMode::Exact), &page(0, 10))?;
    assert_eq!(exact.items()[0].id, alice);

    // Phone mode finds nothing for a text keyword and falls back to the
    // relational substring search.
    let phone = world
        .directory()
        .search(Some("alice"), Some(SearchMode::Phone), &page(0, 10))?;
    assert_eq!(phone.items().len(), 1);
    assert_eq!(phone.items()[0].id, alice);
    Ok(())
}

#[test]
fn resync_rebuilds_and_is_idempotent() -> Result<()> {
    let world = World::with_index()?;
    for i in 0..8 {
        world.seed(
            &format!("user{i}"),
            &format!("User {i}"),
            &format!("user{i}@example.com"),
            None,
        )?;
    }

    let index = world.index.as_available().unwrap();

    let first = world.directory().resync(|| {})?;
    let ids_first = index.member_ids()?;
    let second = world.directory().resync(|| {})?;
    let ids_second = index.member_ids()?;

    assert_eq!(first, 8);
    assert_eq!(second, 8);
    assert_eq!(index.num_docs()?, 8);
    assert_eq!(ids_first, ids_second);
    Ok(())
}

#[test]
fn resync_recovers_a_fresh_index() -> Result<()> {
    // Seed rows with no index attached, then attach one and resync:
    // the recovery path after an index rebuild or outage.
    let dir = TempDir::new()?;
    let db = Database::open(dir.path().join("memdex.db"))?;

    {
        let no_index = IndexHandle::Unavailable;
        let directory = Directory::new(&db, &no_index, "test");
        for i in 0..3 {
            directory.register(NewMember {
                username: format!("user{i}"),
                name: format!("User {i}"),
                email: format!("user{i}@example.com"),
                ..NewMember::default()
            })?;
        }
    }

    let index = IndexHandle::Available(MemberIndex::open_or_create(
        dir.path().join("index"),
        WRITER_HEAP,
    )?);
    let directory = Directory::new(&db, &index, "test");
    let count = directory.resync(|| {})?;
    assert_eq!(count, 3);

    let result = directory.search(Some("user1"), None, &page(0, 10))?;
    assert_eq!(result.items().len(), 1);
    assert_eq!(result.items()[0].username, "user1");
    Ok(())
}

#[test]
fn profile_update_is_searchable_immediately() -> Result<()> {
    let world = World::with_index()?;
    let id = world.seed("alice01", "Alice Kim", "alice@example.com", None)?;

    world.directory().update_profile(
        id,
        &memdex::domain::MemberPatch {
            address: Some("12 Harbor Street".to_string()),
            ..memdex::domain::MemberPatch::default()
        },
    )?;

    let result = world
        .directory()
        .search(Some("Harbor"), None, &page(0, 10))?;
    assert_eq!(result.items().len(), 1);
    assert_eq!(result.items()[0].id, id);
    Ok(())
}
