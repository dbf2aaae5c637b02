use anyhow::{Context, Result};
use dotenv::dotenv;
use std::env;

use servehub::models::service::{ServiceQuery, SortBy};
use servehub::{Config, ServeHub};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("Failed to load configuration")?;
    log::info!("Using backend {}", config.api.base_url);

    let hub = ServeHub::connect(config).await?;

    match hub.session.user().await {
        Some(user) => println!("Signed in as {} <{}> ({})", user.name, user.email, user.role),
        None => println!("Not signed in"),
    }
    println!("{} unread notifications", hub.notifications.unread_count().await);

    let search = env::args().nth(1).unwrap_or_default();
    let sort = env::var("SERVEHUB_SORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(SortBy::Newest);

    match hub.catalog.search(&ServiceQuery::search(search), sort).await {
        Ok(services) => {
            for service in services {
                println!(
                    "{:<26} {:<32} {:>10} {:.1}★ ({})",
                    service.id, service.title, service.price, service.rating, service.review_count
                );
            }
        }
        Err(e) => {
            log::error!("Error fetching services: {}", e);
            eprintln!("{}", e.user_message());
        }
    }

    Ok(())
}
