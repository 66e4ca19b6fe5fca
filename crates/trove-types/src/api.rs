use serde::{Deserialize, Serialize};

use crate::models::ItemStatus;

// -- JWT Claims --

/// JWT claims shared between the login/register handlers and the auth
/// middleware. Canonical definition lives here in trove-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub username: String,
    pub token: String,
}

// -- Items --

/// Body for both report endpoints; the found-item form's "finder name"
/// lands in `reporter_name` as well.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportItemRequest {
    pub name: String,
    pub description: String,
    pub location: String,
    pub reporter_name: String,
    pub contact: String,
    pub image_filename: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportItemResponse {
    pub id: i64,
    pub status: ItemStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub reporter_name: String,
    pub contact: String,
    pub status: ItemStatus,
    pub owner_id: i64,
    pub image_filename: Option<String>,
    pub created_at: String,
}

// -- Uploads --

/// `filename` is `None` when the upload was rejected by the extension
/// check; callers treat that as "no image", not an error.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: Option<String>,
    pub size: u64,
}
