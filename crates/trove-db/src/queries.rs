use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::{ItemRow, UserRow};
use crate::{Database, StoreError};
use trove_types::models::ItemStatus;

impl Database {
    // -- Users --

    /// Insert a new user. The UNIQUE constraint on username is the source
    /// of truth for duplicates; a violation maps to `DuplicateUsername`.
    pub fn create_user(&self, username: &str, password_hash: &str) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                (username, password_hash),
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::DuplicateUsername
                }
                other => StoreError::Storage(other),
            })?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_username(conn, username))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, username, password, created_at FROM users WHERE id = ?1",
                    [id],
                    map_user_row,
                )
                .optional()?;
            Ok(row)
        })
    }

    // -- Items --

    /// Status is fixed at creation; only `claim_item` mutates it afterwards.
    #[allow(clippy::too_many_arguments)]
    pub fn insert_item(
        &self,
        name: &str,
        description: &str,
        location: &str,
        reporter_name: &str,
        contact: &str,
        status: ItemStatus,
        user_id: i64,
        image: Option<&str>,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO items (name, description, location, reporter_name, contact, status, user_id, image)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    name,
                    description,
                    location,
                    reporter_name,
                    contact,
                    status.as_str(),
                    user_id,
                    image
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn list_items(&self) -> Result<Vec<ItemRow>> {
        self.with_conn(|conn| query_items(conn, None))
    }

    /// Substring match ORed across name, description and location.
    /// An empty query degenerates to `%%` and matches every row.
    pub fn search_items(&self, query: &str) -> Result<Vec<ItemRow>> {
        self.with_conn(|conn| query_items(conn, Some(query)))
    }

    /// Unconditional transition to `claimed`. A missing id affects zero
    /// rows and is a silent no-op; re-claiming is harmless. There is no
    /// ownership check here — any authenticated caller may claim any item.
    pub fn claim_item(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("UPDATE items SET status = 'claimed' WHERE id = ?1", [id])?;
            Ok(())
        })
    }
}

fn query_user_by_username(conn: &Connection, username: &str) -> Result<Option<UserRow>> {
    let mut stmt =
        conn.prepare("SELECT id, username, password, created_at FROM users WHERE username = ?1")?;

    let row = stmt.query_row([username], map_user_row).optional()?;

    Ok(row)
}

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn query_items(conn: &Connection, substring: Option<&str>) -> Result<Vec<ItemRow>> {
    const COLUMNS: &str =
        "id, name, description, location, reporter_name, contact, status, user_id, image, created_at";

    let map_row = |row: &rusqlite::Row<'_>| -> rusqlite::Result<ItemRow> {
        Ok(ItemRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            location: row.get(3)?,
            reporter_name: row.get(4)?,
            contact: row.get(5)?,
            status: row.get(6)?,
            user_id: row.get(7)?,
            image: row.get(8)?,
            created_at: row.get(9)?,
        })
    };

    let rows = match substring {
        Some(q) => {
            let pattern = format!("%{}%", q);
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM items
                 WHERE name LIKE ?1 OR description LIKE ?1 OR location LIKE ?1
                 ORDER BY id"
            ))?;
            stmt.query_map([&pattern], map_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
        None => {
            let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM items ORDER BY id"))?;
            stmt.query_map([], map_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        }
    };

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn seed_user(db: &Database, name: &str) -> i64 {
        db.create_user(name, "$argon2id$stub").unwrap()
    }

    fn report(db: &Database, owner: i64, name: &str, description: &str, location: &str) -> i64 {
        db.insert_item(
            name,
            description,
            location,
            "Alice",
            "alice@example.edu",
            ItemStatus::Lost,
            owner,
            None,
        )
        .unwrap()
    }

    #[test]
    fn duplicate_username_fails_and_leaves_first_row_intact() {
        let db = db();
        let id = db.create_user("alice", "hash-one").unwrap();

        let err = db.create_user("alice", "hash-two").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateUsername));

        let row = db.get_user_by_username("alice").unwrap().unwrap();
        assert_eq!(row.id, id);
        assert_eq!(row.password, "hash-one");
    }

    #[test]
    fn lookup_by_unknown_username_is_none() {
        let db = db();
        assert!(db.get_user_by_username("nobody").unwrap().is_none());
        assert!(db.get_user_by_id(42).unwrap().is_none());
    }

    #[test]
    fn reported_item_appears_once_in_list_and_matching_searches() {
        let db = db();
        let owner = seed_user(&db, "alice");
        let id = report(&db, owner, "Blue Backpack", "Has a laptop inside", "Library 2F");

        let all = db.list_items().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].status, "lost");
        assert_eq!(all[0].user_id, owner);

        for q in ["Backpack", "laptop", "Library"] {
            let hits = db.search_items(q).unwrap();
            assert_eq!(hits.len(), 1, "query {:?} should match", q);
            assert_eq!(hits[0].id, id);
        }
        assert!(db.search_items("umbrella").unwrap().is_empty());
    }

    #[test]
    fn search_is_or_across_fields_and_preserves_insertion_order() {
        let db = db();
        let owner = seed_user(&db, "alice");
        let first = report(&db, owner, "Keys", "on a red lanyard", "Gym");
        let second = report(&db, owner, "Red Scarf", "wool", "Cafeteria");

        let hits = db.search_items("red").unwrap();
        assert_eq!(
            hits.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![first, second]
        );
    }

    #[test]
    fn empty_search_equals_list_all() {
        let db = db();
        let owner = seed_user(&db, "alice");
        report(&db, owner, "Keys", "", "Gym");
        report(&db, owner, "Scarf", "", "Cafeteria");

        let listed: Vec<i64> = db.list_items().unwrap().iter().map(|i| i.id).collect();
        let searched: Vec<i64> = db.search_items("").unwrap().iter().map(|i| i.id).collect();
        assert_eq!(listed, searched);
    }

    #[test]
    fn claim_is_idempotent_and_missing_id_is_a_noop() {
        let db = db();
        let owner = seed_user(&db, "alice");
        let id = report(&db, owner, "Wallet", "", "Bus stop");

        db.claim_item(id).unwrap();
        assert_eq!(db.list_items().unwrap()[0].status, "claimed");

        // Second claim changes nothing
        db.claim_item(id).unwrap();
        assert_eq!(db.list_items().unwrap()[0].status, "claimed");

        // Unknown id is not an error
        db.claim_item(9999).unwrap();
        assert_eq!(db.list_items().unwrap().len(), 1);
    }
}
