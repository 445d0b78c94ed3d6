use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::config::PAGE_LIMIT;

/// Raw listing query string. Every field stays textual so that malformed
/// values degrade to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Category slug, `all` disables the filter.
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    /// Minimum rating.
    pub rating: Option<String>,
    /// Only `true` restricts to products with stock.
    pub in_stock: Option<String>,
    /// Case-insensitive partial brand match.
    pub brand: Option<String>,
    /// Full-text search terms.
    pub search: Option<String>,
    /// One of NEWEST, PRICE_LOW, PRICE_HIGH, RATING, NAME.
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ProductQuery {
    pub fn filter(&self) -> ProductFilter {
        ProductFilter {
            category: non_blank(&self.category).filter(|c| c != "all"),
            min_price: parse_number(&self.min_price),
            max_price: parse_number(&self.max_price),
            min_rating: parse_number(&self.rating),
            in_stock: self.in_stock.as_deref() == Some("true"),
            brand: non_blank(&self.brand),
            search: non_blank(&self.search),
        }
    }

    pub fn sort(&self) -> ProductSort {
        self.sort
            .as_deref()
            .map(ProductSort::from_param)
            .unwrap_or_default()
    }

    pub fn page(&self) -> PageRequest {
        PageRequest::parse(self.page.as_deref())
    }
}

#[derive(Debug, Default, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search terms, at least two characters.
    pub q: Option<String>,
    pub page: Option<String>,
}

/// Typed, conjunctive product filter.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub in_stock: bool,
    pub brand: Option<String>,
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn search(terms: impl Into<String>) -> Self {
        Self {
            search: Some(terms.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSort {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    Rating,
    Name,
}

impl ProductSort {
    pub const ALL: [ProductSort; 5] = [
        ProductSort::Newest,
        ProductSort::PriceLow,
        ProductSort::PriceHigh,
        ProductSort::Rating,
        ProductSort::Name,
    ];

    /// Case-insensitive lookup; unknown keys fall back to `NEWEST`.
    pub fn from_param(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PRICE_LOW" => ProductSort::PriceLow,
            "PRICE_HIGH" => ProductSort::PriceHigh,
            "RATING" => ProductSort::Rating,
            "NAME" => ProductSort::Name,
            _ => ProductSort::Newest,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            ProductSort::Newest => "NEWEST",
            ProductSort::PriceLow => "PRICE_LOW",
            ProductSort::PriceHigh => "PRICE_HIGH",
            ProductSort::Rating => "RATING",
            ProductSort::Name => "NAME",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProductSort::Newest => "Newest",
            ProductSort::PriceLow => "Price: Low to High",
            ProductSort::PriceHigh => "Price: High to Low",
            ProductSort::Rating => "Highest Rated",
            ProductSort::Name => "Name (A-Z)",
        }
    }
}

/// A one-based page of `PAGE_LIMIT` items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageRequest {
    /// Absent, non-numeric and non-positive values all mean the first page.
    pub fn parse(raw: Option<&str>) -> Self {
        let page = raw
            .and_then(|p| p.trim().parse::<u64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        Self { page }
    }

    pub fn limit(&self) -> u64 {
        PAGE_LIMIT
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(PAGE_LIMIT)
    }
}

fn non_blank(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_number(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
}
