use axum::{Json, Router, extract::State, http::StatusCode, routing::post};

use crate::{
    dto::subcategories::CreateSubcategoryRequest,
    error::AppResult,
    models::Subcategory,
    response::ApiResponse,
    services::subcategory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(create_subcategory))
}

#[utoipa::path(
    post,
    path = "/api/subcategories",
    request_body = CreateSubcategoryRequest,
    responses(
        (status = 201, description = "Create subcategory", body = ApiResponse<Subcategory>),
        (status = 400, description = "Unknown category or empty slug"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "Subcategories"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubcategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Subcategory>>)> {
    let response = subcategory_service::create_subcategory(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
