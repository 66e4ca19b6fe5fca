use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::error;

use trove_db::models::ItemRow;
use trove_types::api::{Claims, ItemResponse, ReportItemRequest, ReportItemResponse};
use trove_types::models::ItemStatus;

use crate::auth::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn report_lost(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReportItemRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    report(state, claims, req, ItemStatus::Lost).await
}

pub async fn report_found(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ReportItemRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    report(state, claims, req, ItemStatus::Found).await
}

async fn report(
    state: AppState,
    claims: Claims,
    req: ReportItemRequest,
    status: ItemStatus,
) -> Result<impl IntoResponse, StatusCode> {
    // Image names come back from POST /uploads and are never paths
    if let Some(name) = req.image_filename.as_deref() {
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(StatusCode::BAD_REQUEST);
        }
    }

    // Run blocking DB insert off the async runtime
    let db = state.clone();
    let owner = claims.sub;
    let item_id = tokio::task::spawn_blocking(move || {
        db.db.insert_item(
            &req.name,
            &req.description,
            &req.location,
            &req.reporter_name,
            &req.contact,
            status,
            owner,
            req.image_filename.as_deref(),
        )
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?
    .map_err(|e| {
        error!("DB insert_item error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ReportItemResponse {
            id: item_id,
            status,
        }),
    ))
}

pub async fn list_items(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_items())
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB list_items error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(to_responses(rows)?))
}

pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, StatusCode> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.search_items(&query.q))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB search_items error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(to_responses(rows)?))
}

/// Anyone authenticated may claim any item; see the product note in
/// DESIGN.md before tightening this.
pub async fn claim_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(_claims): Extension<Claims>,
) -> Result<StatusCode, StatusCode> {
    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.claim_item(id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .map_err(|e| {
            error!("DB claim_item error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(StatusCode::NO_CONTENT)
}

fn to_responses(rows: Vec<ItemRow>) -> Result<Vec<ItemResponse>, StatusCode> {
    rows.into_iter()
        .map(|row| {
            // CHECK constraint keeps status well-formed; anything else is corruption
            let status =
                ItemStatus::parse(&row.status).ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
            Ok(ItemResponse {
                id: row.id,
                name: row.name,
                description: row.description,
                location: row.location,
                reporter_name: row.reporter_name,
                contact: row.contact,
                status,
                owner_id: row.user_id,
                image_filename: row.image,
                created_at: row.created_at,
            })
        })
        .collect()
}
