use std::env;

/// Items shown per listing page.
pub const PAGE_LIMIT: u64 = 12;
/// Products shown under "similar products" on the detail page.
pub const SIMILAR_LIMIT: u64 = 4;
/// Top-rated products shown on the home page.
pub const POPULAR_LIMIT: u64 = 8;
/// Upper bound accepted for a product price.
pub const MAX_PRICE: f64 = 1_000_000.0;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub app_name: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let app_name = env::var("APP_NAME").unwrap_or_else(|_| "Product Catalog".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            app_name,
        })
    }
}
