//! Listing filters and their query-string wire form.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: u64 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    #[default]
    Order,
    Name,
    Price,
    CreatedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Order => "order",
            SortBy::Name => "name",
            SortBy::Price => "price",
            SortBy::CreatedAt => "createdAt",
        }
    }
}

impl FromStr for SortBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "order" => Ok(SortBy::Order),
            "name" => Ok(SortBy::Name),
            "price" => Ok(SortBy::Price),
            "createdAt" => Ok(SortBy::CreatedAt),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(()),
        }
    }
}

/// Category and subcategory are private so a subcategory never outlives its category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    category_id: Option<Uuid>,
    subcategory_id: Option<Uuid>,
    pub featured: bool,
    pub is_new: bool,
    pub brand: String,
    /// Passed through untouched; the server validates it.
    pub price_min: String,
    pub price_max: String,
    pub sort_by: Option<SortBy>,
    pub sort_order: Option<SortOrder>,
}

impl FilterState {
    pub fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    pub fn subcategory_id(&self) -> Option<Uuid> {
        self.subcategory_id
    }

    pub fn effective_sort_by(&self) -> SortBy {
        self.sort_by.unwrap_or_default()
    }

    pub fn effective_sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }

    fn set_category(&mut self, category_id: Option<Uuid>) {
        self.category_id = category_id;
        self.subcategory_id = None;
    }

    fn set_subcategory(&mut self, subcategory_id: Option<Uuid>) {
        self.subcategory_id = self.category_id.and(subcategory_id);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterUpdate {
    Search(String),
    Category(Option<Uuid>),
    Subcategory(Option<Uuid>),
    Featured(bool),
    IsNew(bool),
    Brand(String),
    PriceMin(String),
    PriceMax(String),
    SortBy(SortBy),
    SortOrder(SortOrder),
    Page(u64),
    /// Back to the defaults, keeping the page size.
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRequest {
    pub filter: FilterState,
    pub page: u64,
    pub limit: u64,
}

impl Default for ListingRequest {
    fn default() -> Self {
        Self {
            filter: FilterState::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListingRequest {
    pub fn with_limit(limit: u64) -> Self {
        Self {
            limit: limit.max(1),
            ..Self::default()
        }
    }

    /// Applies a single update. Anything other than a page change sends the user back
    /// to page 1.
    pub fn apply(&mut self, update: FilterUpdate) {
        if let FilterUpdate::Page(page) = update {
            self.page = page.max(1);
            return;
        }

        let filter = &mut self.filter;
        match update {
            FilterUpdate::Page(_) => {}
            FilterUpdate::Search(search) => filter.search = search,
            FilterUpdate::Category(id) => filter.set_category(id),
            FilterUpdate::Subcategory(id) => filter.set_subcategory(id),
            FilterUpdate::Featured(on) => filter.featured = on,
            FilterUpdate::IsNew(on) => filter.is_new = on,
            FilterUpdate::Brand(brand) => filter.brand = brand,
            FilterUpdate::PriceMin(value) => filter.price_min = value,
            FilterUpdate::PriceMax(value) => filter.price_max = value,
            FilterUpdate::SortBy(sort_by) => filter.sort_by = Some(sort_by),
            FilterUpdate::SortOrder(order) => filter.sort_order = Some(order),
            FilterUpdate::Reset => *filter = FilterState::default(),
        }
        self.page = 1;
    }

    /// Empty and unset fields are omitted; sort keys are always sent.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let f = &self.filter;
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
            ("sortBy", f.effective_sort_by().as_str().to_string()),
            ("sortOrder", f.effective_sort_order().as_str().to_string()),
        ];

        push_non_empty(&mut pairs, "search", &f.search);
        if let Some(id) = f.category_id {
            pairs.push(("categoryId", id.to_string()));
        }
        if let Some(id) = f.subcategory_id {
            pairs.push(("subcategoryId", id.to_string()));
        }
        if f.featured {
            pairs.push(("featured", "true".to_string()));
        }
        if f.is_new {
            pairs.push(("isNew", "true".to_string()));
        }
        push_non_empty(&mut pairs, "brand", &f.brand);
        push_non_empty(&mut pairs, "priceMin", &f.price_min);
        push_non_empty(&mut pairs, "priceMax", &f.price_max);
        pairs
    }

    /// Rebuilds a request from query pairs, ignoring unknown keys and unparseable values.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        let mut subcategory = None;
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "page" => request.page = value.parse().unwrap_or(1).max(1),
                "limit" => request.limit = value.parse().unwrap_or(DEFAULT_PAGE_SIZE).max(1),
                _ => {}
            }
            let f = &mut request.filter;
            match key.as_ref() {
                "sortBy" => f.sort_by = value.parse().ok(),
                "sortOrder" => f.sort_order = value.parse().ok(),
                "search" => f.search = value.to_string(),
                "categoryId" => f.category_id = value.parse().ok(),
                "subcategoryId" => subcategory = value.parse().ok(),
                "featured" => f.featured = value == "true",
                "isNew" => f.is_new = value == "true",
                "brand" => f.brand = value.to_string(),
                "priceMin" => f.price_min = value.to_string(),
                "priceMax" => f.price_max = value.to_string(),
                _ => {}
            }
        }
        // Key order in a URL is arbitrary, so attach the subcategory last.
        request.filter.set_subcategory(subcategory);
        request
    }
}

fn push_non_empty(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        pairs.push((key, value.to_string()));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn keys(pairs: &[(&'static str, String)]) -> Vec<&'static str> {
        pairs.iter().map(|(k, _)| *k).collect()
    }

    #[test]
    fn defaults_send_manual_order_ascending() {
        let pairs = ListingRequest::default().to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("page", "1".to_string()),
                ("limit", "12".to_string()),
                ("sortBy", "order".to_string()),
                ("sortOrder", "ASC".to_string()),
            ]
        );
    }

    #[test]
    fn changing_category_clears_subcategory() {
        let mut req = ListingRequest::default();
        let (a, b, sub) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        req.apply(FilterUpdate::Category(Some(a)));
        req.apply(FilterUpdate::Subcategory(Some(sub)));
        assert_eq!(req.filter.subcategory_id(), Some(sub));

        req.apply(FilterUpdate::Category(Some(b)));
        assert_eq!(req.filter.category_id(), Some(b));
        assert_eq!(req.filter.subcategory_id(), None);

        req.apply(FilterUpdate::Subcategory(Some(sub)));
        req.apply(FilterUpdate::Category(Some(b)));
        assert_eq!(req.filter.subcategory_id(), None, "same category still resets");
    }

    #[test]
    fn subcategory_requires_category() {
        let mut req = ListingRequest::default();
        req.apply(FilterUpdate::Subcategory(Some(Uuid::new_v4())));
        assert_eq!(req.filter.subcategory_id(), None);
    }

    #[test]
    fn non_page_updates_reset_page() {
        let updates = vec![
            FilterUpdate::Search("sofa".into()),
            FilterUpdate::Category(None),
            FilterUpdate::Featured(true),
            FilterUpdate::IsNew(true),
            FilterUpdate::Brand("Kartell".into()),
            FilterUpdate::PriceMin("10".into()),
            FilterUpdate::PriceMax("99".into()),
            FilterUpdate::SortBy(SortBy::Price),
            FilterUpdate::SortOrder(SortOrder::Desc),
            FilterUpdate::Reset,
        ];
        for update in updates {
            let mut req = ListingRequest::default();
            req.apply(FilterUpdate::Page(4));
            assert_eq!(req.page, 4);
            req.apply(update.clone());
            assert_eq!(req.page, 1, "{update:?}");
        }
    }

    #[test]
    fn empty_fields_are_omitted_and_flags_stringified() {
        let mut req = ListingRequest::default();
        req.apply(FilterUpdate::Featured(true));
        req.apply(FilterUpdate::Brand(String::new()));
        req.apply(FilterUpdate::PriceMin("abc".into()));
        let pairs = req.to_query_pairs();
        assert_eq!(
            keys(&pairs),
            vec!["page", "limit", "sortBy", "sortOrder", "featured", "priceMin"]
        );
        assert!(pairs.contains(&("featured", "true".to_string())));
        assert!(pairs.contains(&("priceMin", "abc".to_string())), "passed through as-is");
    }

    #[test]
    fn query_pairs_parse_back() {
        let mut req = ListingRequest::with_limit(24);
        let (cat, sub) = (Uuid::new_v4(), Uuid::new_v4());
        req.apply(FilterUpdate::Search("mesa baja".into()));
        req.apply(FilterUpdate::Category(Some(cat)));
        req.apply(FilterUpdate::Subcategory(Some(sub)));
        req.apply(FilterUpdate::IsNew(true));
        req.apply(FilterUpdate::SortBy(SortBy::CreatedAt));
        req.apply(FilterUpdate::Page(3));

        let mut pairs = req.to_query_pairs();
        pairs.reverse();
        assert_eq!(ListingRequest::from_query_pairs(pairs), req);
    }

    #[test]
    fn parser_ignores_garbage() {
        let req = ListingRequest::from_query_pairs([
            ("page", "zero"),
            ("sortBy", "popularity"),
            ("categoryId", "not-a-uuid"),
            ("subcategoryId", "1c3b5f7e-0000-4000-8000-000000000000"),
            ("utm_source", "mail"),
        ]);
        assert_eq!(req.page, 1);
        assert_eq!(req.filter.sort_by, None);
        assert_eq!(req.filter.category_id(), None);
        assert_eq!(req.filter.subcategory_id(), None);
    }
}
