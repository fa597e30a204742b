//! Cross-entity search over categories, subcategories, products, projects and posts.
//!
//! Each result type has its own SQL; all of them share the same parameter layout so the
//! hit and count queries can be built from one description:
//! `$1` ILIKE pattern, `$2` category slug or NULL, `$3` tag list or NULL,
//! and `$4`/`$5` limit and offset for the hit query.

use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::search::{GroupedSearchResults, SearchResponse, SearchResultList, SuggestionList},
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    routes::params::{AdvancedSearchParams, Pagination, SearchParams, SuggestionParams},
    search::{
        ResultType, SearchResultItem,
        item::{EntityRef, ImageRef, rank},
        suggest::MIN_QUERY_CHARS,
    },
    services::product_service::escape_like,
    state::AppState,
};

pub const MAX_SUGGESTIONS: i64 = 5;
/// Rows reachable through advanced search; also the cap on its reported total.
const MAX_MERGE_WINDOW: i64 = 1000;

struct TypeSql {
    select: &'static str,
    from: &'static str,
    filter: &'static str,
    order: &'static str,
}

const NO_CATEGORY: &str = "NULL::UUID AS category_id, NULL::TEXT AS category_name, NULL::TEXT AS category_slug";
const NO_SUBCATEGORY: &str = "NULL::UUID AS subcategory_id, NULL::TEXT AS subcategory_name, NULL::TEXT AS subcategory_slug";

fn type_sql(kind: ResultType) -> TypeSql {
    match kind {
        ResultType::Category => TypeSql {
            select: "c.id, c.name AS title, c.slug, c.description, ARRAY[]::TEXT[] AS tags, c.image_url",
            from: "categories c",
            filter: "(c.name ILIKE $1 OR COALESCE(c.description, '') ILIKE $1) \
                     AND ($2::TEXT IS NULL OR c.slug = $2) AND $3::TEXT[] IS NULL",
            order: "c.sort_order, c.name",
        },
        ResultType::Subcategory => TypeSql {
            select: "s.id, s.name AS title, s.slug, s.description, ARRAY[]::TEXT[] AS tags, s.image_url, \
                     c.id AS category_id, c.name AS category_name, c.slug AS category_slug",
            from: "subcategories s JOIN categories c ON c.id = s.category_id",
            filter: "(s.name ILIKE $1 OR COALESCE(s.description, '') ILIKE $1) \
                     AND ($2::TEXT IS NULL OR c.slug = $2) AND $3::TEXT[] IS NULL",
            order: "s.sort_order, s.name",
        },
        ResultType::Product => TypeSql {
            select: "p.id, p.name AS title, p.slug, p.description, ARRAY[]::TEXT[] AS tags, p.image_url, \
                     c.id AS category_id, c.name AS category_name, c.slug AS category_slug, \
                     s.id AS subcategory_id, s.name AS subcategory_name, s.slug AS subcategory_slug",
            from: "products p \
                   LEFT JOIN categories c ON c.id = p.category_id \
                   LEFT JOIN subcategories s ON s.id = p.subcategory_id",
            filter: "(p.name ILIKE $1 OR COALESCE(p.description, '') ILIKE $1 OR COALESCE(p.brand, '') ILIKE $1) \
                     AND ($2::TEXT IS NULL OR c.slug = $2) AND $3::TEXT[] IS NULL",
            order: "p.sort_order, p.name",
        },
        ResultType::Project => TypeSql {
            select: "pr.id, pr.title, pr.slug, pr.description, pr.tags, pr.image_url",
            from: "projects pr",
            filter: "(pr.title ILIKE $1 OR COALESCE(pr.description, '') ILIKE $1 \
                      OR EXISTS (SELECT 1 FROM unnest(pr.tags) t WHERE t ILIKE $1)) \
                     AND $2::TEXT IS NULL AND ($3::TEXT[] IS NULL OR pr.tags && $3)",
            order: "pr.created_at DESC, pr.title",
        },
        ResultType::Post => TypeSql {
            select: "po.id, po.title, po.slug, po.excerpt AS description, po.tags, po.image_url",
            from: "posts po",
            filter: "(po.title ILIKE $1 OR COALESCE(po.excerpt, '') ILIKE $1 \
                      OR EXISTS (SELECT 1 FROM unnest(po.tags) t WHERE t ILIKE $1)) \
                     AND $2::TEXT IS NULL AND ($3::TEXT[] IS NULL OR po.tags && $3)",
            order: "po.published_at DESC, po.title",
        },
    }
}

impl TypeSql {
    fn hits_query(&self, kind: ResultType) -> String {
        let mut select = self.select.to_string();
        if !matches!(kind, ResultType::Subcategory | ResultType::Product) {
            select.push_str(", ");
            select.push_str(NO_CATEGORY);
        }
        if kind != ResultType::Product {
            select.push_str(", ");
            select.push_str(NO_SUBCATEGORY);
        }
        format!(
            "SELECT {select} FROM {} WHERE {} ORDER BY {} LIMIT $4 OFFSET $5",
            self.from, self.filter, self.order
        )
    }

    fn count_query(&self) -> String {
        format!("SELECT count(*) FROM {} WHERE {}", self.from, self.filter)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SearchRow {
    id: Uuid,
    title: String,
    slug: String,
    description: Option<String>,
    tags: Vec<String>,
    image_url: Option<String>,
    category_id: Option<Uuid>,
    category_name: Option<String>,
    category_slug: Option<String>,
    subcategory_id: Option<Uuid>,
    subcategory_name: Option<String>,
    subcategory_slug: Option<String>,
}

fn entity_ref(id: Option<Uuid>, name: Option<String>, slug: Option<String>) -> Option<EntityRef> {
    Some(EntityRef {
        id,
        name: name?,
        slug: slug?,
    })
}

impl SearchRow {
    fn into_item(self, kind: ResultType) -> SearchResultItem {
        let category = entity_ref(self.category_id, self.category_name, self.category_slug);
        let subcategory =
            entity_ref(self.subcategory_id, self.subcategory_name, self.subcategory_slug);
        let url = kind.canonical_url(&self.slug, category.as_ref());
        let featured_image = self.image_url.map(|url| ImageRef {
            url,
            alt: Some(self.title.clone()),
        });
        SearchResultItem {
            id: self.id,
            kind,
            title: self.title,
            slug: self.slug,
            description: self.description,
            tags: self.tags,
            featured_image,
            category,
            subcategory,
            url,
        }
    }
}

/// Shared filter values for one search request.
struct SearchFilter {
    pattern: String,
    category: Option<String>,
    tags: Option<Vec<String>>,
}

impl SearchFilter {
    fn new(q: &str, category: Option<String>, tags: Option<Vec<String>>) -> Self {
        Self {
            pattern: format!("%{}%", escape_like(q)),
            category,
            tags,
        }
    }
}

async fn fetch_hits(
    pool: &DbPool,
    kind: ResultType,
    filter: &SearchFilter,
    limit: i64,
    offset: i64,
) -> AppResult<Vec<SearchResultItem>> {
    let sql = type_sql(kind).hits_query(kind);
    let rows = sqlx::query_as::<_, SearchRow>(&sql)
        .bind(&filter.pattern)
        .bind(&filter.category)
        .bind(&filter.tags)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|row| row.into_item(kind)).collect())
}

async fn count_hits(pool: &DbPool, kind: ResultType, filter: &SearchFilter) -> AppResult<i64> {
    let sql = type_sql(kind).count_query();
    let total: (i64,) = sqlx::query_as(&sql)
        .bind(&filter.pattern)
        .bind(&filter.category)
        .bind(&filter.tags)
        .fetch_one(pool)
        .await?;
    Ok(total.0)
}

fn trimmed_query(q: Option<&str>) -> Option<&str> {
    q.map(str::trim).filter(|q| !q.is_empty())
}

/// `GET /api/search`: one group per type, or a flat page when `type` is given.
pub async fn search(state: &AppState, params: SearchParams) -> AppResult<ApiResponse<SearchResponse>> {
    let (page, limit, offset) = Pagination {
        page: params.page,
        limit: params.limit,
    }
    .normalize();

    let Some(q) = trimmed_query(params.q.as_deref()) else {
        let empty = match params.kind {
            Some(_) => SearchResponse::Flat(SearchResultList { items: Vec::new() }),
            None => SearchResponse::Grouped(GroupedSearchResults::default()),
        };
        return Ok(ApiResponse::success("Search", empty, Some(Meta::new(page, limit, 0))));
    };
    let filter = SearchFilter::new(q, None, None);

    if let Some(kind) = params.kind {
        let items = fetch_hits(&state.pool, kind, &filter, limit, offset).await?;
        let total = count_hits(&state.pool, kind, &filter).await?;
        tracing::debug!(%kind, q, total, "typed search");
        let data = SearchResponse::Flat(SearchResultList { items });
        return Ok(ApiResponse::success("Search", data, Some(Meta::new(page, limit, total))));
    }

    let mut grouped = GroupedSearchResults::default();
    let mut total = 0;
    for kind in ResultType::ALL {
        *grouped.group_mut(kind) = fetch_hits(&state.pool, kind, &filter, limit, offset).await?;
        total += count_hits(&state.pool, kind, &filter).await?;
    }
    tracing::debug!(q, total, "general search");

    Ok(ApiResponse::success(
        "Search",
        SearchResponse::Grouped(grouped),
        Some(Meta::new(page, limit, total)),
    ))
}

/// `GET /api/search/advanced`: hits of every requested type merged into one ranked list.
pub async fn advanced_search(
    state: &AppState,
    params: AdvancedSearchParams,
) -> AppResult<ApiResponse<SearchResultList>> {
    let (page, limit, offset) = Pagination {
        page: params.page,
        limit: params.limit,
    }
    .normalize();
    if offset >= MAX_MERGE_WINDOW {
        return Err(AppError::BadRequest(format!(
            "advanced search results stop after {MAX_MERGE_WINDOW} hits"
        )));
    }

    let Some(q) = trimmed_query(params.q.as_deref()) else {
        let data = SearchResultList { items: Vec::new() };
        return Ok(ApiResponse::success("Search", data, Some(Meta::new(page, limit, 0))));
    };

    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let filter = SearchFilter::new(q, category, params.tag_list());
    let kinds: Vec<ResultType> = match params.kind {
        Some(kind) => vec![kind],
        None => ResultType::ALL.to_vec(),
    };

    // Ranking happens after the merge, so every type contributes its first
    // `page * limit` rows and the requested page is cut from the merged list.
    let window = (offset + limit).min(MAX_MERGE_WINDOW);
    let mut merged = Vec::new();
    let mut total = 0;
    for kind in kinds {
        merged.extend(fetch_hits(&state.pool, kind, &filter, window, 0).await?);
        total += count_hits(&state.pool, kind, &filter).await?;
    }
    rank(&mut merged, q);
    let total = total.min(MAX_MERGE_WINDOW);

    let items = merged
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    Ok(ApiResponse::success(
        "Search",
        SearchResultList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

/// `GET /api/search/suggestions`: distinct titles containing the query.
pub async fn suggestions(
    state: &AppState,
    params: SuggestionParams,
) -> AppResult<ApiResponse<SuggestionList>> {
    let q = trimmed_query(params.q.as_deref()).unwrap_or_default();
    if q.chars().count() < MIN_QUERY_CHARS {
        return Ok(ApiResponse::success(
            "Suggestions",
            SuggestionList { items: Vec::new() },
            Some(Meta::empty()),
        ));
    }

    let pattern = format!("%{}%", escape_like(q));
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT title FROM (
            SELECT name AS title FROM categories WHERE name ILIKE $1
            UNION SELECT name FROM subcategories WHERE name ILIKE $1
            UNION SELECT name FROM products WHERE name ILIKE $1
            UNION SELECT title FROM projects WHERE title ILIKE $1
            UNION SELECT title FROM posts WHERE title ILIKE $1
        ) hits
        ORDER BY length(title), title
        LIMIT $2
        "#,
    )
    .bind(pattern)
    .bind(MAX_SUGGESTIONS)
    .fetch_all(&state.pool)
    .await?;

    let items = rows.into_iter().map(|(title,)| title).collect();
    Ok(ApiResponse::success(
        "Suggestions",
        SuggestionList { items },
        Some(Meta::empty()),
    ))
}
