pub mod category_service;
pub mod product_service;
