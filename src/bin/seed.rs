use showroom_api::{
    catalog::{SlugStrategy, generate_slug},
    config::AppConfig,
    db::{DbPool, create_pool, orm_from_pool, run_migrations},
};
use uuid::Uuid;

const CATALOG: &[(&str, &str, &[&str])] = &[
    (
        "Mobiliario de Interior",
        "Mesas, sillas y sofás para el hogar",
        &["Mesas de Comedor", "Sillas", "Sofás"],
    ),
    (
        "Exterior y Jardín",
        "Piezas resistentes a la intemperie",
        &["Tumbonas", "Mesas de Terraza"],
    ),
    (
        "Iluminación",
        "Lámparas de techo, pie y sobremesa",
        &["Lámparas de Pie", "Apliques"],
    ),
];

// (name, subcategory, brand, price, featured, is_new)
const PRODUCTS: &[(&str, &str, &str, i64, bool, bool)] = &[
    ("Mesa Nórdica de Roble", "Mesas de Comedor", "Habitat", 189_000, true, false),
    ("Mesa Extensible Vidrio", "Mesas de Comedor", "Kave", 245_000, false, true),
    ("Silla Tapizada Lino", "Sillas", "Habitat", 59_900, false, false),
    ("Sofá Modular Tres Plazas", "Sofás", "Kave", 799_000, true, true),
    ("Tumbona de Teca", "Tumbonas", "Garden Co", 149_000, false, false),
    ("Mesa de Terraza Aluminio", "Mesas de Terraza", "Garden Co", 129_000, false, true),
    ("Lámpara de Pie Arco", "Lámparas de Pie", "Lumen", 99_000, true, false),
    ("Aplique Latón Cepillado", "Apliques", "Lumen", 45_000, false, false),
];

const PROJECTS: &[(&str, &str, &[&str])] = &[
    (
        "Reforma Ático en Chamberí",
        "Salón abierto con mesa de roble y lámparas de latón",
        &["interiorismo", "roble"],
    ),
    (
        "Terraza Hotel Costa",
        "Mobiliario exterior para sesenta plazas",
        &["exterior", "hosteleria"],
    ),
];

const POSTS: &[(&str, &str, &[&str])] = &[
    (
        "Cómo elegir la mesa de comedor",
        "Medidas, materiales y acabados que conviene conocer",
        &["mesas", "guia"],
    ),
    (
        "Iluminar un salón pequeño",
        "Tres capas de luz para espacios reducidos",
        &["iluminacion"],
    ),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&orm_from_pool(pool.clone()), "migrations").await?;

    seed_catalog(&pool, &config.category_slug).await?;
    seed_products(&pool).await?;
    seed_content(&pool, "projects", PROJECTS).await?;
    seed_content(&pool, "posts", POSTS).await?;

    println!("Seed completed");
    Ok(())
}

async fn id_by_slug(pool: &DbPool, table: &str, slug: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(&format!("SELECT id FROM {table} WHERE slug = $1"))
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_catalog(pool: &DbPool, strategy: &SlugStrategy) -> anyhow::Result<()> {
    for (order, (name, description, subcategories)) in CATALOG.iter().enumerate() {
        let slug = strategy.slug_for(name);
        sqlx::query(
            r#"
            INSERT INTO categories (id, name, slug, description, sort_order)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(*name)
        .bind(slug.as_str())
        .bind(*description)
        .bind(order as i32)
        .execute(pool)
        .await?;
        let category_id = id_by_slug(pool, "categories", &slug).await?;

        for (sub_order, sub_name) in subcategories.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO subcategories (id, category_id, name, slug, sort_order)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (slug) DO NOTHING
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(category_id)
            .bind(*sub_name)
            .bind(generate_slug(sub_name))
            .bind(sub_order as i32)
            .execute(pool)
            .await?;
        }
        println!("Seeded category {name} ({slug})");
    }
    Ok(())
}

async fn seed_products(pool: &DbPool) -> anyhow::Result<()> {
    for (order, (name, subcategory, brand, price, featured, is_new)) in
        PRODUCTS.iter().enumerate()
    {
        let parent: (Uuid, Uuid) =
            sqlx::query_as("SELECT id, category_id FROM subcategories WHERE slug = $1")
                .bind(generate_slug(subcategory))
                .fetch_one(pool)
                .await?;

        sqlx::query(
            r#"
            INSERT INTO products
                (id, category_id, subcategory_id, name, slug, brand, price, featured, is_new, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(parent.1)
        .bind(parent.0)
        .bind(*name)
        .bind(generate_slug(name))
        .bind(*brand)
        .bind(*price)
        .bind(*featured)
        .bind(*is_new)
        .bind(order as i32)
        .execute(pool)
        .await?;
    }
    println!("Seeded {} products", PRODUCTS.len());
    Ok(())
}

async fn seed_content(
    pool: &DbPool,
    table: &str,
    rows: &[(&str, &str, &[&str])],
) -> anyhow::Result<()> {
    let summary_column = if table == "posts" { "excerpt" } else { "description" };
    for (title, summary, tags) in rows {
        let tags: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        sqlx::query(&format!(
            "INSERT INTO {table} (id, title, slug, {summary_column}, tags) \
             VALUES ($1, $2, $3, $4, $5) ON CONFLICT (slug) DO NOTHING"
        ))
        .bind(Uuid::new_v4())
        .bind(*title)
        .bind(generate_slug(title))
        .bind(*summary)
        .bind(tags)
        .execute(pool)
        .await?;
    }
    println!("Seeded {} {table}", rows.len());
    Ok(())
}
