//! Search hits and the boundary that turns raw backend payloads into them.
//!
//! The backend answers a typed search with a flat array and a general search with an
//! object keyed by result group. Both shapes are parsed into [`SearchPayload`] and
//! normalized exactly once into [`SearchResultItem`]s; everything downstream can rely on
//! the required fields being present.

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{IgnoredAny, MapAccess, Visitor},
};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
    Category,
    Subcategory,
    Project,
    Post,
    Product,
}

impl ResultType {
    /// Group order of a general search response.
    pub const ALL: [ResultType; 5] = [
        ResultType::Category,
        ResultType::Subcategory,
        ResultType::Project,
        ResultType::Post,
        ResultType::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Category => "category",
            ResultType::Subcategory => "subcategory",
            ResultType::Project => "project",
            ResultType::Post => "post",
            ResultType::Product => "product",
        }
    }

    pub fn group_key(&self) -> &'static str {
        match self {
            ResultType::Category => "categories",
            ResultType::Subcategory => "subcategories",
            ResultType::Project => "projects",
            ResultType::Post => "posts",
            ResultType::Product => "products",
        }
    }

    pub fn from_group_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.group_key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ResultType::Category => "Categories",
            ResultType::Subcategory => "Subcategories",
            ResultType::Project => "Projects",
            ResultType::Post => "Blog",
            ResultType::Product => "Products",
        }
    }

    pub fn canonical_url(&self, slug: &str, category: Option<&EntityRef>) -> String {
        match self {
            ResultType::Project => format!("/projects/{slug}"),
            ResultType::Post => format!("/blog/{slug}"),
            ResultType::Category => format!("/catalog/{slug}"),
            ResultType::Subcategory => match category.map(|c| c.slug.as_str()) {
                Some(parent) if !parent.is_empty() => format!("/catalog/{parent}/{slug}"),
                _ => format!("/catalog/subcategory/{slug}"),
            },
            ResultType::Product => format!("/products/{slug}"),
        }
    }
}

impl FromStr for ResultType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ImageRef {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EntityRef {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ResultType,
    pub title: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<ImageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory: Option<EntityRef>,
    pub url: String,
}

/// Image fields arrive either as a bare url or as a descriptor.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawImage {
    Url(String),
    Descriptor(ImageRef),
}

impl From<RawImage> for ImageRef {
    fn from(raw: RawImage) -> Self {
        match raw {
            RawImage::Url(url) => ImageRef { url, alt: None },
            RawImage::Descriptor(image) => image,
        }
    }
}

/// A search hit as sent by the backend, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchItem {
    pub id: Option<Uuid>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub excerpt: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<RawImage>,
    pub image: Option<RawImage>,
    pub category: Option<EntityRef>,
    pub subcategory: Option<EntityRef>,
    pub url: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RejectedItem {
    #[error("search hit without id")]
    MissingId,
    #[error("search hit without a known type")]
    MissingType,
    #[error("search hit without title")]
    MissingTitle,
    #[error("search hit without slug")]
    MissingSlug,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawSearchItem {
    /// Validates the hit. `group` is the type implied by the group the hit came from and
    /// is used when the hit does not name its own.
    pub fn into_item(self, group: Option<ResultType>) -> Result<SearchResultItem, RejectedItem> {
        let id = self.id.ok_or(RejectedItem::MissingId)?;
        let kind = self
            .kind
            .as_deref()
            .and_then(|k| k.parse().ok())
            .or(group)
            .ok_or(RejectedItem::MissingType)?;
        let title = non_blank(self.title)
            .or(non_blank(self.name))
            .ok_or(RejectedItem::MissingTitle)?;
        let slug = non_blank(self.slug).ok_or(RejectedItem::MissingSlug)?;
        let url = non_blank(self.url)
            .unwrap_or_else(|| kind.canonical_url(&slug, self.category.as_ref()));

        Ok(SearchResultItem {
            id,
            kind,
            title,
            slug,
            description: non_blank(self.description).or(non_blank(self.excerpt)),
            tags: self.tags.unwrap_or_default(),
            featured_image: self.featured_image.or(self.image).map(ImageRef::from),
            category: self.category,
            subcategory: self.subcategory,
            url,
        })
    }
}

/// Hits of a general search, grouped by type in the order the backend sent them.
#[derive(Debug, Clone, Default)]
pub struct GroupedPayload {
    pub groups: Vec<(ResultType, Vec<RawSearchItem>)>,
}

impl<'de> Deserialize<'de> for GroupedPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = GroupedPayload;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of search result groups")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut groups = Vec::new();
                while let Some(key) = map.next_key::<String>()? {
                    match ResultType::from_group_key(&key) {
                        Some(kind) => {
                            let items: Option<Vec<RawSearchItem>> = map.next_value()?;
                            groups.push((kind, items.unwrap_or_default()));
                        }
                        // totals and other bookkeeping fields
                        None => {
                            map.next_value::<IgnoredAny>()?;
                        }
                    }
                }
                Ok(GroupedPayload { groups })
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Flat(Vec<RawSearchItem>),
    Grouped(GroupedPayload),
}

impl SearchPayload {
    /// Flattens the payload into validated hits, keeping source order and dropping
    /// malformed hits and repeated `(type, id)` pairs.
    pub fn normalize(self) -> Vec<SearchResultItem> {
        let raw: Vec<(Option<ResultType>, RawSearchItem)> = match self {
            SearchPayload::Flat(items) => items.into_iter().map(|item| (None, item)).collect(),
            SearchPayload::Grouped(grouped) => grouped
                .groups
                .into_iter()
                .flat_map(|(kind, items)| items.into_iter().map(move |item| (Some(kind), item)))
                .collect(),
        };

        let mut seen = HashSet::new();
        let mut items = Vec::with_capacity(raw.len());
        for (group, hit) in raw {
            match hit.into_item(group) {
                Ok(item) => {
                    if seen.insert((item.kind, item.id)) {
                        items.push(item);
                    }
                }
                Err(reason) => tracing::debug!(%reason, "dropping search hit"),
            }
        }
        items
    }
}

/// Exact title 3, title prefix 2, title contains 1, anything else 0.
pub fn relevance(item: &SearchResultItem, query: &str) -> u8 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }
    let title = item.title.to_lowercase();
    if title == query {
        3
    } else if title.starts_with(&query) {
        2
    } else if title.contains(&query) {
        1
    } else {
        0
    }
}

pub fn rank(items: &mut [SearchResultItem], query: &str) {
    items.sort_by_key(|item| std::cmp::Reverse(relevance(item, query)));
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn hit(kind: &str, title: &str, slug: &str) -> serde_json::Value {
        json!({ "id": Uuid::new_v4(), "type": kind, "title": title, "slug": slug })
    }

    fn untyped(title: &str) -> serde_json::Value {
        json!({ "id": Uuid::new_v4(), "name": title, "slug": crate::catalog::generate_slug(title) })
    }

    #[test]
    fn grouped_payload_flattens_in_insertion_order() {
        let payload: SearchPayload = serde_json::from_value(json!({
            "categories": [untyped("Sillas"), untyped("Mesas")],
            "total": 5,
            "projects": [untyped("Casa Roble"), untyped("Loft Sur"), untyped("Hotel Mar")],
        }))
        .unwrap();
        assert!(matches!(payload, SearchPayload::Grouped(_)));

        let items = payload.normalize();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Sillas", "Mesas", "Casa Roble", "Loft Sur", "Hotel Mar"]);
        assert_eq!(items[0].kind, ResultType::Category);
        assert_eq!(items[4].kind, ResultType::Project);
        assert_eq!(items[2].url, "/projects/casa-roble");
    }

    #[test]
    fn flat_payload_keeps_backend_url() {
        let mut with_url = hit("post", "Tendencias 2025", "tendencias-2025");
        with_url["url"] = json!("/blog/2025/tendencias");
        let payload: SearchPayload =
            serde_json::from_value(json!([with_url, hit("product", "Sofá Nube", "sofa-nube")]))
                .unwrap();

        let items = payload.normalize();
        assert_eq!(items[0].url, "/blog/2025/tendencias");
        assert_eq!(items[1].url, "/products/sofa-nube");
    }

    #[test]
    fn malformed_hits_are_dropped() {
        let payload: SearchPayload = serde_json::from_value(json!([
            { "id": Uuid::new_v4(), "type": "product", "slug": "sin-titulo" },
            { "id": Uuid::new_v4(), "type": "unknown", "title": "X", "slug": "x" },
            { "type": "post", "title": "No id", "slug": "no-id" },
            hit("category", "Exterior", "exterior"),
        ]))
        .unwrap();
        let items = payload.normalize();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Exterior");
    }

    #[test]
    fn duplicates_keep_first_occurrence() {
        let id = Uuid::new_v4();
        let payload: SearchPayload = serde_json::from_value(json!({
            "products": [
                { "id": id, "title": "Lámpara Arco", "slug": "lampara-arco" },
                { "id": id, "title": "Lámpara Arco (copy)", "slug": "lampara-arco" },
            ],
            "posts": [{ "id": id, "title": "Same id, other type", "slug": "other" }],
        }))
        .unwrap();
        let items = payload.normalize();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Lámpara Arco");
    }

    #[test]
    fn field_fallbacks() {
        let raw: RawSearchItem = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "name": "Comedor",
            "slug": "comedor",
            "description": "  ",
            "excerpt": "Mesas y sillas",
            "image": "/img/comedor.jpg",
            "category": { "name": "Interior", "slug": "interior" },
        }))
        .unwrap();
        let item = raw.into_item(Some(ResultType::Subcategory)).unwrap();
        assert_eq!(item.title, "Comedor");
        assert_eq!(item.description.as_deref(), Some("Mesas y sillas"));
        assert_eq!(item.featured_image.unwrap().url, "/img/comedor.jpg");
        assert_eq!(item.url, "/catalog/interior/comedor");
    }

    #[test]
    fn ranking_prefers_title_matches() {
        let payload: SearchPayload = serde_json::from_value(json!([
            hit("post", "Cómo elegir una mesa", "como-elegir"),
            hit("product", "Mesa", "mesa"),
            hit("project", "Casa sin mesa", "casa"),
            hit("product", "Mesa Roble", "mesa-roble"),
        ]))
        .unwrap();
        let mut items = payload.normalize();
        rank(&mut items, "mesa");
        let slugs: Vec<_> = items.iter().map(|i| i.slug.as_str()).collect();
        assert_eq!(slugs, vec!["mesa", "mesa-roble", "como-elegir", "casa"]);
    }
}
