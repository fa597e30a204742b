use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    catalog::generate_slug,
    dto::subcategories::CreateSubcategoryRequest,
    entity::{
        categories::Entity as Categories,
        subcategories::{ActiveModel, Column, Entity as Subcategories},
    },
    error::{AppError, AppResult},
    models::Subcategory,
    response::{ApiResponse, Meta},
    services::{require_name, require_slug},
    state::AppState,
};

pub async fn create_subcategory(
    state: &AppState,
    payload: CreateSubcategoryRequest,
) -> AppResult<ApiResponse<Subcategory>> {
    let name = require_name(&payload.name)?;
    let slug = require_slug(generate_slug(&name), &name)?;

    if Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("Category not found".into()));
    }

    let taken = Subcategories::find()
        .filter(Column::Slug.eq(slug.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("slug '{slug}' already exists")));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(payload.category_id),
        name: Set(name),
        slug: Set(slug.clone()),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        sort_order: Set(payload.sort_order),
        created_at: NotSet,
    };
    let subcategory = active
        .insert(&state.orm)
        .await
        .map_err(|err| AppError::from_insert(err, &slug))?;

    tracing::info!(
        subcategory_id = %subcategory.id,
        category_id = %subcategory.category_id,
        slug = %subcategory.slug,
        "subcategory created"
    );

    Ok(ApiResponse::success(
        "Subcategory created",
        Subcategory::from(subcategory),
        Some(Meta::empty()),
    ))
}
