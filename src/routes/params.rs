use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    catalog::{SortBy, SortOrder, filter::DEFAULT_PAGE_SIZE},
    search::ResultType,
};

pub const MAX_PAGE_SIZE: i64 = 100;
/// Pages past this are served as this page.
pub const MAX_PAGE: i64 = 10_000;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).clamp(1, MAX_PAGE);
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE as i64)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = (page - 1) * limit;
        (page, limit, offset)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListingParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub featured: Option<bool>,
    pub is_new: Option<bool>,
    pub brand: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
}

impl ListingParams {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            limit: self.limit,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<ResultType>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AdvancedSearchParams {
    pub q: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    #[serde(rename = "filters[type]")]
    pub kind: Option<ResultType>,
    /// Category slug.
    #[serde(rename = "filters[category]")]
    pub category: Option<String>,
    /// Comma separated.
    #[serde(rename = "filters[tags]")]
    pub tags: Option<String>,
}

impl AdvancedSearchParams {
    pub fn tag_list(&self) -> Option<Vec<String>> {
        let tags: Vec<String> = self
            .tags
            .as_deref()?
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
        (!tags.is_empty()).then_some(tags)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SuggestionParams {
    pub q: Option<String>,
}
