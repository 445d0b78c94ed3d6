use product_catalog::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{categories::CategoryForm, products::ProductForm},
    entity::{Categories, Products},
    services::{category_service, product_service},
    state::AppState,
};
use sea_orm::EntityTrait;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;
    let state = AppState::new(orm, config.app_name);

    Products::delete_many().exec(state.db()).await?;
    Categories::delete_many().exec(state.db()).await?;
    println!("Cleared products and categories");

    seed_categories(&state).await?;
    seed_products(&state).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_categories(state: &AppState) -> anyhow::Result<()> {
    let categories = [
        ("Electronics", "Phones, computers and gadgets"),
        ("Fashion", "Clothing and shoes"),
        ("Home", "Furniture and home appliances"),
        ("Sports", "Sports and outdoor equipment"),
        ("Books", "Fiction and non-fiction"),
    ];

    for (name, description) in categories {
        let form = CategoryForm {
            name: name.to_string(),
            description: description.to_string(),
        };
        let input = form.parse().map_err(|errors| anyhow::anyhow!(errors.join("; ")))?;
        let category = category_service::create_category(state, input).await?;
        println!("Seeded category {} ({})", category.name, category.slug);
    }
    Ok(())
}

async fn seed_products(state: &AppState) -> anyhow::Result<()> {
    let products = [
        ("iPhone 15 Pro", "Titanium smartphone with A17 Pro chip", "54999", "electronics", "Apple", "25", "4.8"),
        ("Galaxy S24 Ultra", "Smartphone with built-in S Pen", "49999", "electronics", "Samsung", "30", "4.7"),
        ("MacBook Air M3", "Thin and light 13-inch laptop", "42999", "electronics", "Apple", "15", "4.9"),
        ("Air Max 270", "Everyday running shoes", "4299", "fashion", "Nike", "60", "4.5"),
        ("Ultraboost 22", "Cushioned running shoes", "5199", "fashion", "Adidas", "0", "4.6"),
        ("Markus Office Chair", "Ergonomic office chair", "3999", "home", "IKEA", "12", "4.2"),
        ("4K Smart TV 55\"", "55-inch Ambilight television", "18999", "electronics", "Philips", "8", "4.4"),
        ("Yoga Mat Set", "Mat, blocks and strap", "799", "sports", "Decathlon", "100", "4.1"),
        ("Crazy Rich Asians", "Novel by Kevin Kwan", "249", "books", "", "40", "4.3"),
        ("Apple Watch Series 9", "Smartwatch with health tracking", "14999", "electronics", "Apple", "20", "4.6"),
    ];

    for (name, description, price, category, brand, stock, rating) in products {
        let form = ProductForm {
            name: name.to_string(),
            description: description.to_string(),
            price: price.to_string(),
            category: category.to_string(),
            brand: brand.to_string(),
            stock: stock.to_string(),
            rating: rating.to_string(),
            images: "/assets/images/products/placeholder.jpg".to_string(),
            features: String::new(),
        };
        let input = form.parse().map_err(|errors| anyhow::anyhow!(errors.join("; ")))?;
        product_service::create_product(state, input).await?;
    }

    println!("Seeded {} products", products.len());
    Ok(())
}
