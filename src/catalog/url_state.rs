//! Mirrors the listing state into a page URL so it survives reloads and back-navigation.

use url::Url;

use super::filter::ListingRequest;

/// Keys owned by the listing state; other query parameters on the page are preserved.
const OWNED_KEYS: &[&str] = &[
    "page",
    "limit",
    "sortBy",
    "sortOrder",
    "search",
    "categoryId",
    "subcategoryId",
    "featured",
    "isNew",
    "brand",
    "priceMin",
    "priceMax",
];

/// Rewrites the listing parameters of `url` from `request`.
pub fn write_to_url(url: &mut Url, request: &ListingRequest) {
    let foreign: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !OWNED_KEYS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let pairs = request.to_query_pairs();
    let mut query = url.query_pairs_mut();
    query.clear();
    query.extend_pairs(foreign.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    query.extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
}

/// Parses the listing state back out of `url`, falling back to defaults.
pub fn read_from_url(url: &Url) -> ListingRequest {
    ListingRequest::from_query_pairs(url.query_pairs())
}
