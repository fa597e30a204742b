use crate::{catalog::filter::DEFAULT_PAGE_SIZE, search::ResultType};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub kind: Option<ResultType>,
    /// Category slug.
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl SearchFilters {
    fn is_empty(&self) -> bool {
        self.kind.is_none() && self.category.is_none() && self.tags.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub q: String,
    pub page: u64,
    pub limit: u64,
    /// Restricts a general search to one type; the answer is then a flat list.
    pub kind: Option<ResultType>,
    /// Switches to the advanced endpoint.
    pub filters: Option<SearchFilters>,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            kind: None,
            filters: None,
        }
    }

    pub fn of_type(mut self, kind: ResultType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn is_advanced(&self) -> bool {
        self.filters.as_ref().is_some_and(|f| !f.is_empty())
    }

    pub fn path(&self) -> &'static str {
        if self.is_advanced() {
            "search/advanced"
        } else {
            "search"
        }
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("q", self.q.trim().to_string()),
            ("limit", self.limit.to_string()),
            ("page", self.page.to_string()),
        ];

        match self.filters.as_ref().filter(|f| !f.is_empty()) {
            Some(filters) => {
                if let Some(kind) = filters.kind.or(self.kind) {
                    pairs.push(("filters[type]", kind.as_str().to_string()));
                }
                if let Some(category) = filters.category.as_ref().filter(|c| !c.is_empty()) {
                    pairs.push(("filters[category]", category.clone()));
                }
                if !filters.tags.is_empty() {
                    pairs.push(("filters[tags]", filters.tags.join(",")));
                }
            }
            None => {
                if let Some(kind) = self.kind {
                    pairs.push(("type", kind.as_str().to_string()));
                }
            }
        }
        pairs
    }
}
