use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Category, Subcategory};

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct CategoryList {
    #[schema(value_type = Vec<Category>)]
    pub items: Vec<Category>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SubcategoryList {
    #[schema(value_type = Vec<Subcategory>)]
    pub items: Vec<Subcategory>,
}
