use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::search::{ResultType, SearchResultItem};

/// General search response. Field order is the group order clients rely on.
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct GroupedSearchResults {
    pub categories: Vec<SearchResultItem>,
    pub subcategories: Vec<SearchResultItem>,
    pub projects: Vec<SearchResultItem>,
    pub posts: Vec<SearchResultItem>,
    pub products: Vec<SearchResultItem>,
}

impl GroupedSearchResults {
    pub fn group_mut(&mut self, kind: ResultType) -> &mut Vec<SearchResultItem> {
        match kind {
            ResultType::Category => &mut self.categories,
            ResultType::Subcategory => &mut self.subcategories,
            ResultType::Project => &mut self.projects,
            ResultType::Post => &mut self.posts,
            ResultType::Product => &mut self.products,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SearchResultList {
    #[schema(value_type = Vec<SearchResultItem>)]
    pub items: Vec<SearchResultItem>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SuggestionList {
    pub items: Vec<String>,
}

/// `data` of `GET /api/search`: grouped without a `type`, flat with one.
#[derive(Serialize, ToSchema)]
#[serde(untagged)]
pub enum SearchResponse {
    Grouped(GroupedSearchResults),
    Flat(SearchResultList),
}
