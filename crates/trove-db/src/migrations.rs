use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS items (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            name            TEXT NOT NULL,
            description     TEXT NOT NULL DEFAULT '',
            location        TEXT NOT NULL DEFAULT '',
            reporter_name   TEXT NOT NULL DEFAULT '',
            contact         TEXT NOT NULL DEFAULT '',
            status          TEXT NOT NULL CHECK(status IN ('lost', 'found', 'claimed')),
            user_id         INTEGER NOT NULL REFERENCES users(id),
            image           TEXT,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_items_status
            ON items(status);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
