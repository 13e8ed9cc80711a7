//! Product listing example.
//!
//! Reads credentials from `DOTYPOS_CLOUD_ID`, `DOTYPOS_REFRESH_TOKEN` and
//! optionally `DOTYPOS_ACCESS_TOKEN`, then prints every product that is not
//! deleted, page by page as the stream is consumed.
//!
//! Run with: cargo run --example list_products

use futures_util::TryStreamExt;
use dotypos_rs::{CloudId, Credentials, DotyposClient, Query, RenewAndPersist};

#[tokio::main]
async fn main() -> dotypos_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let handler = RenewAndPersist::new(|cloud_id: &CloudId, token: &str| {
        println!("Renewed access token for cloud {cloud_id}");
        println!("  export DOTYPOS_ACCESS_TOKEN={token}");
    });

    let client = DotyposClient::new(Credentials::from_env()?, handler)?;

    if !client.valid_credentials().await? {
        eprintln!("Credentials rejected for cloud {}", client.cloud_id());
        return Ok(());
    }

    let mut products = client
        .products()
        .list(Query::new().filter("deleted", "eq", false).sort("name"));

    println!(
        "Found {} product(s) on {} page(s):",
        products.size().await?,
        products.total_pages().await?
    );

    while let Some(product) = products.try_next().await? {
        println!(
            "  - {} ({})",
            product["name"].as_str().unwrap_or("unnamed"),
            product["id"]
        );
    }

    println!("\nDone!");
    Ok(())
}
