use axum::{
    Extension, Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{error, warn};
use uuid::Uuid;

use trove_types::api::{Claims, UploadResponse};

use crate::auth::AppState;

/// 10 MB cap on image uploads
const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

/// Strip directory components and unsafe characters, then gate on the
/// extension whitelist. `None` means "no image", never an error — content
/// is not inspected, this is purely name-based.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let (stem, ext) = cleaned.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }

    let ext = ext.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }

    Some(format!("{stem}.{ext}"))
}

/// POST /uploads?filename=... — accepts the raw image bytes. Stored files
/// are keyed by a generated UUID so identical client filenames never
/// overwrite each other; a rejected filename downgrades to "no image".
pub async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    Extension(claims): Extension<Claims>,
    bytes: Bytes,
) -> Result<impl IntoResponse, StatusCode> {
    if bytes.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if bytes.len() > MAX_IMAGE_SIZE {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let Some(safe_name) = sanitize_filename(&query.filename) else {
        warn!(
            "rejected upload {:?} from {}: extension not allowed",
            query.filename, claims.username
        );
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                filename: None,
                size: 0,
            }),
        ));
    };

    // safe_name always has a whitelisted extension at this point
    let ext = safe_name.rsplit_once('.').map(|(_, e)| e).unwrap_or("bin");
    let stored_name = format!("{}.{}", Uuid::new_v4(), ext);

    tokio::fs::create_dir_all(&state.upload_dir)
        .await
        .map_err(|e| {
            error!("failed to create upload directory: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let path = state.upload_dir.join(&stored_name);
    let size = bytes.len() as u64;
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        error!("failed to write upload {}: {}", path.display(), e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            filename: Some(stored_name),
            size,
        }),
    ))
}

/// GET /uploads/{name} — serves a stored image back.
pub async fn download_image(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    // Stored names are UUID-keyed; anything path-like is hostile
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(StatusCode::BAD_REQUEST);
    }

    let path = state.upload_dir.join(&name);
    let bytes = tokio::fs::read(&path).await.map_err(|_| StatusCode::NOT_FOUND)?;

    Ok(([(header::CONTENT_TYPE, content_type(&name))], bytes))
}

fn content_type(name: &str) -> &'static str {
    match name.rsplit_once('.').map(|(_, e)| e) {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_extension_is_rejected() {
        assert_eq!(sanitize_filename("photo.EXE"), None);
        assert_eq!(sanitize_filename("malware.png.exe"), None);
        assert_eq!(sanitize_filename("noextension"), None);
        assert_eq!(sanitize_filename(".png"), None);
        assert_eq!(sanitize_filename(""), None);
    }

    #[test]
    fn allowed_extensions_match_case_insensitively() {
        assert_eq!(sanitize_filename("photo.JPG"), Some("photo.jpg".into()));
        assert_eq!(sanitize_filename("photo.png"), Some("photo.png".into()));
        assert_eq!(sanitize_filename("anim.GiF"), Some("anim.gif".into()));
    }

    #[test]
    fn directory_components_are_stripped() {
        assert_eq!(
            sanitize_filename("../../etc/shadow.png"),
            Some("shadow.png".into())
        );
        assert_eq!(
            sanitize_filename("C:\\Users\\eve\\pic.jpeg"),
            Some("pic.jpeg".into())
        );
        let safe = sanitize_filename("weird name!?.gif").unwrap();
        assert!(!safe.contains(['/', '\\', ' ', '!']));
    }

    #[test]
    fn content_types_follow_extension() {
        assert_eq!(content_type("a.png"), "image/png");
        assert_eq!(content_type("a.jpg"), "image/jpeg");
        assert_eq!(content_type("a"), "application/octet-stream");
    }
}
