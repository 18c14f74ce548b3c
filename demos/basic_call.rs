//! Basic example demonstrating a typed fetch and a streamed download.
//!
//! Expects `PLATEAU_API_KEY` (and optionally `PLATEAU_API_HOST`) in the
//! environment.
//!
//! Run with: `cargo run --example basic_call`

use http::Method;
use plateau::models::Query;
use plateau::{CallOptions, Client, ClientConfig, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("plateau=debug,basic_call=info")
        .init();

    let client = Client::new(ClientConfig::from_env()?);

    println!("=== Typed fetch ===");
    let fetched = client
        .call::<Query>(CallOptions::new(Method::GET, ["resources", "q-daily"]))
        .await?;

    let query = match fetched.into_one() {
        Some(query) => query,
        None => {
            eprintln!("expected a single query resource");
            return Ok(());
        }
    };
    println!("id: {}", query.common.id);
    println!("name: {:?}", query.common.name);
    println!("raw payload: {}", query.raw_response);

    println!("=== Streamed download ===");
    let downloaded = query.download("query.csv", "csv", None).await?;
    println!("downloaded: {downloaded}");

    Ok(())
}
