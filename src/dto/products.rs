use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub is_new: bool,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
