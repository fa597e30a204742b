pub mod categories;
pub mod products;
pub mod search;
pub mod subcategories;
