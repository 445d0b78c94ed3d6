pub mod categories;
pub mod products;

pub use categories::Entity as Categories;
pub use products::Entity as Products;
