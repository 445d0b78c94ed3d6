use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    config::MAX_PRICE,
    models::Product,
    response::Meta,
    routes::params::{ProductQuery, ProductSort},
};

/// Product form exactly as submitted. Numbers arrive as text and the two
/// list fields as one entry per line.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub category: String,
    pub brand: String,
    pub stock: String,
    pub rating: String,
    pub images: String,
    pub features: String,
}

/// A product form that passed parsing and field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub brand: Option<String>,
    pub stock: i32,
    /// `None` when the field was left empty.
    pub rating: Option<f64>,
    pub images: Vec<String>,
    pub features: Vec<String>,
}

impl ProductForm {
    /// Parse every field, collecting all problems instead of stopping at the first.
    pub fn parse(&self) -> Result<ProductInput, Vec<String>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.chars().count() < 2 {
            errors.push("Product name must be at least 2 characters".to_string());
        } else if name.chars().count() > 100 {
            errors.push("Product name cannot be longer than 100 characters".to_string());
        }

        let price = match self.price.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price > 0.0 => {
                if price > MAX_PRICE {
                    errors.push("Price cannot exceed 1,000,000".to_string());
                }
                price
            }
            _ => {
                errors.push("Enter a valid price".to_string());
                0.0
            }
        };

        let category = self.category.trim();
        if category.is_empty() {
            errors.push("Category is required".to_string());
        }

        let stock = match self.stock.trim().parse::<i32>() {
            Ok(stock) if stock >= 0 => stock,
            _ => {
                errors.push("Enter a valid stock quantity".to_string());
                0
            }
        };

        let rating = match self.rating.trim() {
            "" => None,
            raw => match raw.parse::<f64>() {
                Ok(rating) if (0.0..=5.0).contains(&rating) => Some(rating),
                _ => {
                    errors.push("Rating must be between 0 and 5".to_string());
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        let brand = Some(self.brand.trim())
            .filter(|b| !b.is_empty())
            .map(str::to_string);

        Ok(ProductInput {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            category: category.to_string(),
            brand,
            stock,
            rating,
            images: split_lines(&self.images),
            features: split_lines(&self.features),
        })
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            category: product.category.clone(),
            brand: product.brand.clone().unwrap_or_default(),
            stock: product.stock.to_string(),
            rating: product.rating.to_string(),
            images: product.images.join("\n"),
            features: product.features.join("\n"),
        }
    }
}

/// Split a textarea into its trimmed, non-blank lines, keeping their order.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Meta,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub product: Product,
    pub similar_products: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SortOption {
    pub key: &'static str,
    pub label: &'static str,
}

impl From<ProductSort> for SortOption {
    fn from(sort: ProductSort) -> Self {
        Self {
            key: sort.key(),
            label: sort.label(),
        }
    }
}

/// Data behind the product list page, shared by listing and search.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    pub products: Vec<Product>,
    pub pagination: Meta,
    pub filters: ProductQuery,
    pub brands: Vec<String>,
    pub sort_options: Vec<SortOption>,
    pub current_sort: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_query: Option<String>,
}

impl ProductListing {
    pub fn new(page: ProductPage, filters: ProductQuery, brands: Vec<String>) -> Self {
        let current_sort = filters.sort().key();
        Self {
            products: page.products,
            pagination: page.pagination,
            filters,
            brands,
            sort_options: ProductSort::ALL.into_iter().map(SortOption::from).collect(),
            current_sort,
            search_query: None,
        }
    }
}
