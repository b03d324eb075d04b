//! List products command handler

use crate::config::Config;
use crate::db::Store;
use crate::models::ProductFilter;

pub async fn cmd_list_products(
    config: &Config,
    filter: ProductFilter,
    limit: u64,
) -> anyhow::Result<()> {
    let store = Store::new(&config.database.connection_string()).await?;
    let products = store.list_products(0, limit.clamp(1, 1000), &filter).await?;

    if products.is_empty() {
        println!("No products stored.");
        println!();
        println!("Create one with: POST /api/v1/products");
        store.close().await?;
        return Ok(());
    }

    println!("Products ({} shown)", products.len());
    println!("{:-<70}", "");

    for product in &products {
        let price = product
            .price
            .map_or_else(|| "-".to_string(), |p| format!("${p:.2}"));

        println!("{} [{}] {}", product.name, product.marketplace, price);
        println!(
            "  ID: {} | Category: {}",
            product.id,
            product.category.as_deref().unwrap_or("-")
        );
    }

    store.close().await?;
    Ok(())
}
