use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CreateCategoryRequest, SubcategoryList},
    error::AppResult,
    models::Category,
    response::ApiResponse,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}/subcategories", get(list_subcategories))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "List categories", body = ApiResponse<CategoryList>)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CategoryList>>> {
    let response = category_service::list_categories(&state).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}/subcategories",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Subcategories of a category", body = ApiResponse<SubcategoryList>),
        (status = 404, description = "Category not found")
    ),
    tag = "Categories"
)]
pub async fn list_subcategories(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SubcategoryList>>> {
    let response = category_service::list_subcategories(&state, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Create category", body = ApiResponse<Category>),
        (status = 400, description = "Name yields an empty slug"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let response = category_service::create_category(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
