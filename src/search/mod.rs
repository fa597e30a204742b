//! Multi-entity search: payload normalization, display grouping, highlighting,
//! suggestions and search history.

pub mod highlight;
pub mod history;
pub mod item;
pub mod layout;
pub mod suggest;

pub use highlight::{Highlighted, Segment, highlight};
pub use history::{FileHistoryStore, HistoryStore, MemoryHistoryStore, SearchHistory};
pub use item::{ResultType, SearchPayload, SearchResultItem};
pub use layout::{DisplayLayout, ResultSection, layout};
pub use suggest::merge_suggestions;
