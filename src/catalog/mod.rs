//! Catalog listing building blocks shared by the API and its clients.

pub mod filter;
pub mod pagination;
pub mod slug;
pub mod url_state;

pub use filter::{FilterState, FilterUpdate, ListingRequest, SortBy, SortOrder};
pub use pagination::{PaginationState, PaginationWindow, compute_window};
pub use slug::{SlugStrategy, generate_slug};
