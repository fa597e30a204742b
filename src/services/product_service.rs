use uuid::Uuid;

use crate::{
    catalog::{SortBy, SortOrder, generate_slug},
    dto::products::{CreateProductRequest, ProductList},
    entity::{
        categories::Entity as Categories,
        products::{ActiveModel, Column, Entity as Products},
        subcategories::Entity as Subcategories,
    },
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::ListingParams,
    services::{require_name, require_slug},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub async fn list_products(
    state: &AppState,
    query: ListingParams,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", escape_like(search));
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern.clone()))
                .add(Expr::col(Column::Brand).ilike(pattern)),
        );
    }

    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }

    if let Some(subcategory_id) = query.subcategory_id {
        condition = condition.add(Column::SubcategoryId.eq(subcategory_id));
    }

    if query.featured == Some(true) {
        condition = condition.add(Column::Featured.eq(true));
    }

    if query.is_new == Some(true) {
        condition = condition.add(Column::IsNew.eq(true));
    }

    if let Some(brand) = query.brand.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        condition = condition.add(Expr::col(Column::Brand).ilike(escape_like(brand)));
    }

    if let Some(min_price) = parse_price("priceMin", query.price_min.as_deref())? {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = parse_price("priceMax", query.price_max.as_deref())? {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_by = query.sort_by.unwrap_or_default();
    let sort_order = query.sort_order.unwrap_or_default();
    let sort_col = match sort_by {
        SortBy::Order => Column::SortOrder,
        SortBy::Name => Column::Name,
        SortBy::Price => Column::Price,
        SortBy::CreatedAt => Column::CreatedAt,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };
    // stable pages when the sort key ties
    finder = finder.order_by_asc(Column::Name).order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    tracing::debug!(page, limit, total, "products listed");

    let meta = Meta::new(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let name = require_name(&payload.name)?;
    let slug = require_slug(generate_slug(&name), &name)?;

    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }

    let mut category_id = payload.category_id;
    if let Some(subcategory_id) = payload.subcategory_id {
        let subcategory = Subcategories::find_by_id(subcategory_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::BadRequest("Subcategory not found".into()))?;
        match category_id {
            Some(id) if id != subcategory.category_id => {
                return Err(AppError::BadRequest(
                    "Subcategory does not belong to the category".into(),
                ));
            }
            _ => category_id = Some(subcategory.category_id),
        }
    } else if let Some(id) = category_id {
        if Categories::find_by_id(id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest("Category not found".into()));
        }
    }

    let taken = Products::find()
        .filter(Column::Slug.eq(slug.as_str()))
        .one(&state.orm)
        .await?;
    if taken.is_some() {
        return Err(AppError::Conflict(format!("slug '{slug}' already exists")));
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        category_id: Set(category_id),
        subcategory_id: Set(payload.subcategory_id),
        name: Set(name),
        slug: Set(slug.clone()),
        description: Set(payload.description),
        brand: Set(payload.brand),
        price: Set(payload.price),
        featured: Set(payload.featured),
        is_new: Set(payload.is_new),
        image_url: Set(payload.image_url),
        sort_order: Set(payload.sort_order),
        created_at: NotSet,
    };
    let product = active
        .insert(&state.orm)
        .await
        .map_err(|err| AppError::from_insert(err, &slug))?;

    tracing::info!(product_id = %product.id, slug = %product.slug, "product created");

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

/// Price filters arrive as raw strings; anything but a whole number is rejected here.
pub(crate) fn parse_price(field: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number"))),
    }
}

/// Escapes LIKE wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn price_filters_are_validated() {
        assert_eq!(parse_price("priceMin", None).unwrap(), None);
        assert_eq!(parse_price("priceMin", Some(" ")).unwrap(), None);
        assert_eq!(parse_price("priceMin", Some("1500")).unwrap(), Some(1500));
        assert!(matches!(
            parse_price("priceMax", Some("12,5")),
            Err(AppError::BadRequest(msg)) if msg.contains("priceMax")
        ));
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
