pub mod auth;
pub mod items;
pub mod middleware;
pub mod uploads;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use auth::AppState;

/// Full API surface. Register and login are public; everything else sits
/// behind the bearer-token middleware.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/items", get(items::list_items))
        .route("/items/search", get(items::search_items))
        .route("/items/lost", post(items::report_lost))
        .route("/items/found", post(items::report_found))
        .route("/items/{id}/claim", post(items::claim_item))
        .route("/uploads", post(uploads::upload_image))
        .route("/uploads/{name}", get(uploads::download_image))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}
