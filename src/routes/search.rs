use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::search::{SearchResponse, SearchResultList, SuggestionList},
    error::AppResult,
    response::ApiResponse,
    routes::params::{AdvancedSearchParams, SearchParams, SuggestionParams},
    services::search_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/advanced", get(advanced_search))
        .route("/suggestions", get(suggestions))
}

#[utoipa::path(
    get,
    path = "/api/search",
    params(
        ("q" = Option<String>, Query, description = "Search text"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Hits per type, default 12"),
        ("type" = Option<String>, Query, description = "category | subcategory | project | post | product"),
    ),
    responses(
        (status = 200, description = "Grouped hits, or a flat list when `type` is set", body = ApiResponse<SearchResponse>)
    ),
    tag = "Search"
)]
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<ApiResponse<SearchResponse>>> {
    let response = search_service::search(&state, params).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/search/advanced",
    params(
        ("q" = Option<String>, Query, description = "Search text"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Hits per page, default 12"),
        ("filters[type]" = Option<String>, Query, description = "Restrict to one result type"),
        ("filters[category]" = Option<String>, Query, description = "Category slug"),
        ("filters[tags]" = Option<String>, Query, description = "Comma separated tags"),
    ),
    responses(
        (status = 200, description = "Ranked hits", body = ApiResponse<SearchResultList>)
    ),
    tag = "Search"
)]
pub async fn advanced_search(
    State(state): State<AppState>,
    Query(params): Query<AdvancedSearchParams>,
) -> AppResult<Json<ApiResponse<SearchResultList>>> {
    let response = search_service::advanced_search(&state, params).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/search/suggestions",
    params(
        ("q" = Option<String>, Query, description = "Partial query, at least 2 characters"),
    ),
    responses(
        (status = 200, description = "Suggested search terms", body = ApiResponse<SuggestionList>)
    ),
    tag = "Search"
)]
pub async fn suggestions(
    State(state): State<AppState>,
    Query(params): Query<SuggestionParams>,
) -> AppResult<Json<ApiResponse<SuggestionList>>> {
    let response = search_service::suggestions(&state, params).await?;
    Ok(Json(response))
}
