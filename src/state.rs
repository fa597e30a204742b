use crate::{
    catalog::SlugStrategy,
    db::{DbPool, OrmConn, orm_from_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub category_slug: SlugStrategy,
}

impl AppState {
    pub fn new(pool: DbPool, category_slug: SlugStrategy) -> Self {
        let orm = orm_from_pool(pool.clone());
        Self {
            pool,
            orm,
            category_slug,
        }
    }
}
