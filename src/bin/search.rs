//! Terminal client for the showroom API.

use clap::{Parser, Subcommand};
use showroom_api::{
    catalog::{FilterUpdate, ListingRequest, PaginationState, SortBy, SortOrder, url_state},
    client::{CatalogClient, SearchFilters, SearchOutcome, SearchRequest, SearchSession},
    config::ClientConfig,
    search::{
        DisplayLayout, FileHistoryStore, ResultType, SearchHistory, SearchResultItem, highlight,
        layout,
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

#[derive(Parser)]
#[command(name = "showroom-search", version, about = "Search the showroom catalog")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a search across every content type.
    Query {
        text: String,
        /// Only one type: category, subcategory, project, post or product.
        #[arg(long = "type", value_parser = parse_kind)]
        kind: Option<ResultType>,
        /// Category slug (advanced search).
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags (advanced search).
        #[arg(long)]
        tags: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: u64,
        #[arg(long, default_value_t = 12)]
        limit: u64,
    },
    /// Suggestions for a partial query.
    Suggest { partial: String },
    /// Page through the product listing.
    Products {
        #[arg(long)]
        search: Option<String>,
        /// Category slug.
        #[arg(long)]
        category: Option<String>,
        /// Subcategory slug, within `--category`.
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        featured: bool,
        #[arg(long)]
        new: bool,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long, value_parser = parse_sort_by)]
        sort_by: Option<SortBy>,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: u64,
        /// Storefront page whose query string mirrors the listing state.
        #[arg(long, default_value = "http://localhost:3000/products")]
        storefront: Url,
    },
    /// Show or clear recent searches.
    History {
        #[arg(long)]
        clear: bool,
    },
}

fn parse_kind(raw: &str) -> Result<ResultType, String> {
    raw.parse().map_err(|_| format!("unknown result type '{raw}'"))
}

fn parse_sort_by(raw: &str) -> Result<SortBy, String> {
    raw.parse().map_err(|_| format!("unknown sort field '{raw}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,showroom_api=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let client = CatalogClient::new(config.api_url.clone());
    let history = SearchHistory::load(FileHistoryStore::new(&config.history_path)).await;
    let session = SearchSession::new(client, history, config.debounce);

    match cli.command {
        Commands::Query {
            text,
            kind,
            category,
            tags,
            page,
            limit,
        } => {
            let mut request = SearchRequest::new(text).page(page).limit(limit);
            let tags: Vec<String> = tags
                .as_deref()
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
            if category.is_some() || !tags.is_empty() {
                request = request.with_filters(SearchFilters {
                    kind,
                    category,
                    tags,
                });
            } else if let Some(kind) = kind {
                request = request.of_type(kind);
            }
            print_outcome(session.search(request).await);
        }
        Commands::Suggest { partial } => {
            for suggestion in session.suggest(&partial).await {
                println!("{}", highlight(&suggestion, &partial).to_marked("[", "]"));
            }
        }
        Commands::Products {
            search,
            category,
            subcategory,
            featured,
            new,
            brand,
            sort_by,
            desc,
            page,
            mut storefront,
        } => {
            let client = session.backend();
            let mut request = ListingRequest::default();
            if let Some(search) = search {
                request.apply(FilterUpdate::Search(search));
            }
            if let Some(slug) = category {
                let categories = client.list_categories().await?;
                let Some(category) = categories.into_iter().find(|c| c.slug == slug) else {
                    anyhow::bail!("no category with slug '{slug}'");
                };
                request.apply(FilterUpdate::Category(Some(category.id)));
                if let Some(sub_slug) = subcategory {
                    let subcategories = client.list_subcategories(&category).await?;
                    let Some(sub) = subcategories.into_iter().find(|s| s.slug == sub_slug) else {
                        anyhow::bail!("no subcategory '{sub_slug}' in '{slug}'");
                    };
                    request.apply(FilterUpdate::Subcategory(Some(sub.id)));
                }
            }
            request.apply(FilterUpdate::Featured(featured));
            request.apply(FilterUpdate::IsNew(new));
            if let Some(brand) = brand {
                request.apply(FilterUpdate::Brand(brand));
            }
            if let Some(sort_by) = sort_by {
                request.apply(FilterUpdate::SortBy(sort_by));
            }
            if desc {
                request.apply(FilterUpdate::SortOrder(SortOrder::Desc));
            }
            request.apply(FilterUpdate::Page(page));

            let listing = client.list_products(&request).await?;
            if listing.items.is_empty() {
                println!("No products match these filters.");
            }
            for product in &listing.items {
                println!("{:<40} {:>10}  /products/{}", product.name, product.price, product.slug);
            }
            print_pagination(
                &listing.pagination(config.max_visible_pages),
                listing.meta.total_pages.unwrap_or_default(),
            );

            url_state::write_to_url(&mut storefront, &request);
            println!("\n{storefront}");
        }
        Commands::History { clear } => {
            if clear {
                session.clear_history().await?;
                println!("History cleared");
            } else {
                for entry in session.history().await {
                    println!("{entry}");
                }
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Results { request, items } => match layout(&items) {
            DisplayLayout::Flat(items) => {
                for item in items {
                    print_item(item, &request.q);
                }
            }
            DisplayLayout::Sections(sections) => {
                for section in sections {
                    println!("\n{} ({})", section.kind.label(), section.items.len());
                    for item in section.items {
                        print_item(item, &request.q);
                    }
                }
            }
            DisplayLayout::Empty => print_empty(&request.q),
        },
        SearchOutcome::Empty { request } => print_empty(&request.q),
        SearchOutcome::Failed { error, .. } => {
            eprintln!("Search failed: {error}. Run the command again to retry.");
        }
        SearchOutcome::Cleared => println!("Type something to search."),
        SearchOutcome::Superseded | SearchOutcome::Stale => {}
    }
}

fn print_item(item: &SearchResultItem, query: &str) {
    println!("  {}  {}", highlight(&item.title, query).to_marked("\x1b[1m", "\x1b[0m"), item.url);
    if let Some(description) = &item.description {
        println!("    {}", highlight(description, query).to_marked("\x1b[1m", "\x1b[0m"));
    }
}

fn print_empty(query: &str) {
    println!("Nothing found for \"{query}\". Try fewer words or a different spelling.");
}

fn print_pagination(state: &PaginationState, total_pages: i64) {
    let Some(window) = state.window() else {
        return;
    };
    let mut parts: Vec<String> = Vec::new();
    if window.show_first {
        parts.push("1".into());
    }
    if window.leading_gap {
        parts.push("…".into());
    }
    parts.extend(window.pages().map(|p| p.to_string()));
    if window.trailing_gap {
        parts.push("…".into());
    }
    if window.show_last {
        parts.push(total_pages.to_string());
    }
    println!("pages: {}", parts.join(" "));
}
