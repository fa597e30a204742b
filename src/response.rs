use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::catalog::pagination::{self, PaginationState};

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq, Eq)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
    #[serde(default)]
    pub total_pages: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        let total_pages = pagination::total_pages(total.max(0) as u64, per_page.max(0) as u64);
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
            total_pages: Some(total_pages as i64),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
            total_pages: None,
        }
    }

    pub fn pagination(&self, max_visible_pages: u64) -> PaginationState {
        match (self.page, self.total_pages) {
            (Some(page), Some(total_pages)) if page >= 1 && page <= total_pages => {
                pagination::compute_window(page as u64, total_pages as u64, max_visible_pages)
            }
            _ => PaginationState::Inactive,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
