use axum::Router;

use crate::state::AppState;

pub mod categories;
pub mod doc;
pub mod health;
pub mod params;
pub mod products;
pub mod search;
pub mod subcategories;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/subcategories", subcategories::router())
        .nest("/products", products::router())
        .nest("/search", search::router())
}
