pub mod categories;
pub mod products;
pub mod subcategories;

pub use categories::Entity as Categories;
pub use products::Entity as Products;
pub use subcategories::Entity as Subcategories;
