/// Database row types — these map directly to SQLite rows.
/// Distinct from trove-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct ItemRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub reporter_name: String,
    pub contact: String,
    pub status: String,
    pub user_id: i64,
    pub image: Option<String>,
    pub created_at: String,
}
