pub mod category_service;
pub mod product_service;
pub mod search_service;
pub mod subcategory_service;

use crate::error::{AppError, AppResult};

/// Rejects names that produce an empty slug.
pub(crate) fn require_slug(slug: String, name: &str) -> AppResult<String> {
    if slug.is_empty() {
        return Err(AppError::BadRequest(format!(
            "name '{name}' must contain at least one letter or digit"
        )));
    }
    Ok(slug)
}

pub(crate) fn require_name(name: &str) -> AppResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    Ok(name.to_string())
}
