use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        categories::{CategoryForm, CategoryListing},
        products::{ProductDetail, ProductForm, ProductListing, SortOption},
    },
    models::{Category, CategoryWithCount, Product},
    response::{ApiResponse, Meta},
    routes::{categories, health, home, params, products},
};

/// OpenAPI description of the JSON representation of every page
/// (sent when the request `Accept`s `application/json`).
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        home::home,
        products::list_products,
        products::search_products,
        products::get_product,
        products::new_product_form,
        products::create_product,
        products::edit_product_form,
        products::update_product,
        products::delete_product,
        categories::list_categories,
        categories::create_category,
        categories::edit_category_form,
        categories::update_category,
        categories::delete_category
    ),
    components(
        schemas(
            Product,
            Category,
            CategoryWithCount,
            ProductForm,
            CategoryForm,
            ProductListing,
            ProductDetail,
            CategoryListing,
            SortOption,
            params::ProductQuery,
            params::SearchQuery,
            params::ProductSort,
            health::HealthData,
            Meta,
            ApiResponse<ProductListing>,
            ApiResponse<ProductDetail>,
            ApiResponse<CategoryListing>,
            ApiResponse<health::HealthData>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Pages", description = "Static and landing pages"),
        (name = "Products", description = "Product catalog pages"),
        (name = "Categories", description = "Category management pages"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
