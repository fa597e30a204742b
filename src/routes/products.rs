use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::products::{CreateProductRequest, ProductList},
    error::AppResult,
    models::Product,
    response::ApiResponse,
    routes::params::ListingParams,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_products).post(create_product))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 12, max 100"),
        ("sortBy" = Option<String>, Query, description = "order | name | price | createdAt, default order"),
        ("sortOrder" = Option<String>, Query, description = "ASC | DESC, default ASC"),
        ("search" = Option<String>, Query, description = "Matches name, description or brand"),
        ("categoryId" = Option<uuid::Uuid>, Query, description = "Category ID"),
        ("subcategoryId" = Option<uuid::Uuid>, Query, description = "Subcategory ID"),
        ("featured" = Option<bool>, Query, description = "Only featured products"),
        ("isNew" = Option<bool>, Query, description = "Only new products"),
        ("brand" = Option<String>, Query, description = "Brand, case-insensitive"),
        ("priceMin" = Option<String>, Query, description = "Minimum price, whole number"),
        ("priceMax" = Option<String>, Query, description = "Maximum price, whole number"),
    ),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 400, description = "Malformed price filter")
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListingParams>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let response = product_service::list_products(&state, query).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = ApiResponse<Product>),
        (status = 400, description = "Invalid category, subcategory, price or name"),
        (status = 409, description = "Slug already exists")
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Product>>)> {
    let response = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
