use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    dto::categories::{CategoryList, CreateCategoryRequest, SubcategoryList},
    entity::{
        categories::{ActiveModel, Column, Entity as Categories},
        subcategories::{Column as SubcategoryColumn, Entity as Subcategories},
    },
    error::{AppError, AppResult},
    models::Category,
    response::{ApiResponse, Meta},
    services::{require_name, require_slug},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = Categories::find()
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let total = items.len() as i64;
    let meta = Meta::new(1, total.max(1), total);
    Ok(ApiResponse::success("Categories", CategoryList { items }, Some(meta)))
}

pub async fn list_subcategories(
    state: &AppState,
    category_id: Uuid,
) -> AppResult<ApiResponse<SubcategoryList>> {
    if Categories::find_by_id(category_id).one(&state.orm).await?.is_none() {
        return Err(AppError::NotFound);
    }

    let items = Subcategories::find()
        .filter(SubcategoryColumn::CategoryId.eq(category_id))
        .order_by_asc(SubcategoryColumn::SortOrder)
        .order_by_asc(SubcategoryColumn::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Into::into)
        .collect::<Vec<_>>();

    let total = items.len() as i64;
    let meta = Meta::new(1, total.max(1), total);
    Ok(ApiResponse::success("Subcategories", SubcategoryList { items }, Some(meta)))
}

pub async fn create_category(
    state: &AppState,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    let name = require_name(&payload.name)?;
    let slug = require_slug(state.category_slug.slug_for(&name), &name)?;

    let taken = Categories::find()
        .filter(Column::Slug.eq(slug.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("slug '{slug}' already exists")));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        slug: Set(slug.clone()),
        description: Set(payload.description),
        image_url: Set(payload.image_url),
        sort_order: Set(payload.sort_order),
        created_at: NotSet,
    };
    let category = active
        .insert(&state.orm)
        .await
        .map_err(|err| AppError::from_insert(err, &slug))?;

    tracing::info!(category_id = %category.id, slug = %category.slug, "category created");

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}
