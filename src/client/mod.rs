//! Typed HTTP client for the catalog API, used by the storefront and the `search` tool.

pub mod request;
pub mod session;

use std::future::Future;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::{
    catalog::{ListingRequest, PaginationState},
    models::{Category, Product, Subcategory},
    response::{ApiResponse, Meta},
    search::SearchPayload,
};

pub use request::{SearchFilters, SearchRequest};
pub use session::{SearchOutcome, SearchSession};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("response carried no data")]
    MissingData,
}

/// One page of a listing together with its pagination metadata.
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub meta: Meta,
}

impl<T> Listing<T> {
    pub fn pagination(&self, max_visible_pages: u64) -> PaginationState {
        self.meta.pagination(max_visible_pages)
    }
}

/// Where search requests go. Implemented by [`CatalogClient`]; tests substitute fakes.
pub trait SearchBackend {
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchPayload, ClientError>> + Send;

    fn suggestions(
        &self,
        partial: &str,
    ) -> impl Future<Output = Result<Vec<String>, ClientError>> + Send;
}

#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// `base_url` is the API root, e.g. `http://127.0.0.1:3000/api`.
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<ApiResponse<T>, ClientError> {
        let url = self.base_url.join(path)?;
        tracing::debug!(%url, ?query, "GET");
        let response = self.http.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiResponse<serde_json::Value>>().await {
                Ok(body) => body.message,
                Err(_) => status.canonical_reason().unwrap_or("error").to_string(),
            };
            return Err(ClientError::Status { status, message });
        }

        Ok(response.json::<ApiResponse<T>>().await?)
    }

    pub async fn list_products(
        &self,
        request: &ListingRequest,
    ) -> Result<Listing<Product>, ClientError> {
        let response = self
            .get::<Vec<Product>>("products", &request.to_query_pairs())
            .await?;
        let items = response.data.ok_or(ClientError::MissingData)?;
        Ok(Listing {
            items,
            meta: response.meta.unwrap_or_else(Meta::empty),
        })
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        let response = self.get::<Vec<Category>>("categories", &[]).await?;
        response.data.ok_or(ClientError::MissingData)
    }

    pub async fn list_subcategories(
        &self,
        category: &Category,
    ) -> Result<Vec<Subcategory>, ClientError> {
        let path = format!("categories/{}/subcategories", category.id);
        let response = self.get::<Vec<Subcategory>>(&path, &[]).await?;
        response.data.ok_or(ClientError::MissingData)
    }
}

impl SearchBackend for CatalogClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPayload, ClientError> {
        let response = self
            .get::<SearchPayload>(request.path(), &request.to_query_pairs())
            .await?;
        response.data.ok_or(ClientError::MissingData)
    }

    async fn suggestions(&self, partial: &str) -> Result<Vec<String>, ClientError> {
        let response = self
            .get::<Vec<String>>("search/suggestions", &[("q", partial.to_string())])
            .await?;
        Ok(response.data.unwrap_or_default())
    }
}
