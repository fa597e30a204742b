use sea_orm::{ConnectionTrait, Statement};
use showroom_api::{
    catalog::{SlugStrategy, SortBy, SortOrder},
    db::{create_pool, run_migrations},
    dto::{
        categories::CreateCategoryRequest, products::CreateProductRequest,
        search::SearchResponse, subcategories::CreateSubcategoryRequest,
    },
    error::AppError,
    routes::params::{AdvancedSearchParams, ListingParams, SearchParams, SuggestionParams},
    search::ResultType,
    services::{category_service, product_service, search_service, subcategory_service},
    state::AppState,
};
use uuid::Uuid;

// Category -> subcategory -> products, then listing filters and search over them.
#[tokio::test]
async fn catalog_listing_and_search_flow() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run catalog flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let category = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: "Mobiliario Interior".into(),
            description: None,
            image_url: None,
            sort_order: 0,
        },
    )
    .await?
    .data
    .expect("category");
    assert_eq!(category.slug, "category-mobiliario");

    // same first word, same slug
    let duplicate = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: "Mobiliario Exterior".into(),
            description: None,
            image_url: None,
            sort_order: 1,
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let unsluggable = category_service::create_category(
        &state,
        CreateCategoryRequest {
            name: "¡¡".into(),
            description: None,
            image_url: None,
            sort_order: 2,
        },
    )
    .await;
    assert!(matches!(unsluggable, Err(AppError::BadRequest(_))));

    let subcategory = subcategory_service::create_subcategory(
        &state,
        CreateSubcategoryRequest {
            category_id: category.id,
            name: "Mesas de Comedor".into(),
            description: None,
            image_url: None,
            sort_order: 0,
        },
    )
    .await?
    .data
    .expect("subcategory");
    assert_eq!(subcategory.slug, "mesas-de-comedor");

    let orphan = subcategory_service::create_subcategory(
        &state,
        CreateSubcategoryRequest {
            category_id: Uuid::new_v4(),
            name: "Sillas".into(),
            description: None,
            image_url: None,
            sort_order: 0,
        },
    )
    .await;
    assert!(matches!(orphan, Err(AppError::BadRequest(_))));

    let products = [
        ("Mesa Nórdica", 189_000, true),
        ("Mesa Extensible", 245_000, false),
        ("Aparador Roble", 320_000, false),
    ];
    for (sort_order, (name, price, featured)) in products.into_iter().enumerate() {
        let product = product_service::create_product(
            &state,
            CreateProductRequest {
                name: name.into(),
                category_id: None,
                subcategory_id: Some(subcategory.id),
                description: Some(format!("{name} de la colección 2024")),
                brand: Some("Habitat".into()),
                price,
                featured,
                is_new: false,
                image_url: None,
                sort_order: sort_order as i32,
            },
        )
        .await?
        .data
        .expect("product");
        assert_eq!(product.category_id, Some(category.id));
    }
    let nordica = product_service::create_product(
        &state,
        CreateProductRequest {
            name: "Mesa Nordica".into(),
            category_id: Some(category.id),
            subcategory_id: None,
            description: None,
            brand: None,
            price: 1,
            featured: false,
            is_new: false,
            image_url: None,
            sort_order: 9,
        },
    )
    .await;
    assert!(matches!(nordica, Err(AppError::Conflict(_))));

    let listing = product_service::list_products(
        &state,
        ListingParams {
            category_id: Some(category.id),
            subcategory_id: Some(subcategory.id),
            sort_by: Some(SortBy::Price),
            sort_order: Some(SortOrder::Desc),
            limit: Some(2),
            ..Default::default()
        },
    )
    .await?;
    let meta = listing.meta.expect("meta");
    assert_eq!(meta.total, Some(3));
    assert_eq!(meta.total_pages, Some(2));
    let names: Vec<_> = listing
        .data
        .expect("products")
        .items
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Aparador Roble", "Mesa Extensible"]);

    let featured = product_service::list_products(
        &state,
        ListingParams {
            featured: Some(true),
            price_max: Some("200000".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("products");
    assert_eq!(featured.items.len(), 1);
    assert_eq!(featured.items[0].slug, "mesa-nordica");

    let bad_price = product_service::list_products(
        &state,
        ListingParams {
            price_min: Some("cheap".into()),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(bad_price, Err(AppError::BadRequest(_))));

    let grouped = search_service::search(
        &state,
        SearchParams {
            q: Some("mesa".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("search");
    match grouped {
        SearchResponse::Grouped(groups) => {
            assert_eq!(groups.products.len(), 2);
            assert_eq!(groups.subcategories.len(), 1);
            assert_eq!(
                groups.subcategories[0].url,
                "/catalog/category-mobiliario/mesas-de-comedor"
            );
            assert!(groups.products.iter().all(|p| p.url.starts_with("/products/")));
        }
        SearchResponse::Flat(_) => panic!("expected grouped results"),
    }

    let typed = search_service::search(
        &state,
        SearchParams {
            q: Some("roble".into()),
            kind: Some(ResultType::Product),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("search");
    match typed {
        SearchResponse::Flat(list) => {
            assert_eq!(list.items.len(), 1);
            assert_eq!(list.items[0].kind, ResultType::Product);
        }
        SearchResponse::Grouped(_) => panic!("expected a flat list"),
    }

    let advanced = search_service::advanced_search(
        &state,
        AdvancedSearchParams {
            q: Some("mesa".into()),
            category: Some("category-mobiliario".into()),
            ..Default::default()
        },
    )
    .await?
    .data
    .expect("advanced");
    assert!(!advanced.items.is_empty());
    assert!(advanced.items.iter().all(|i| i.kind != ResultType::Post));

    let short = search_service::suggestions(
        &state,
        SuggestionParams {
            q: Some("m".into()),
        },
    )
    .await?
    .data
    .expect("suggestions");
    assert!(short.items.is_empty());

    let suggestions = search_service::suggestions(
        &state,
        SuggestionParams {
            q: Some("mesa".into()),
        },
    )
    .await?
    .data
    .expect("suggestions");
    assert!(suggestions.items.len() <= 5);
    assert!(suggestions.items.iter().any(|s| s == "Mesa Nórdica"));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let state = AppState::new(
        pool,
        SlugStrategy::PrefixedFirstWord {
            prefix: "category-".into(),
        },
    );
    run_migrations(&state.orm, "migrations").await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE products, subcategories, categories, projects, posts CASCADE",
        ))
        .await?;

    Ok(state)
}
