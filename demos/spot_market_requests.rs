//! Example: Bid for spot capacity, inspect the request, then withdraw it.
//!
//! Run with: METAL_AUTH_TOKEN=... METAL_PROJECT_ID=... cargo run --example spot_market_requests

use std::sync::Arc;

use metal_api_client::auth::EnvCredentials;
use metal_api_client::rest::MetalClient;
use metal_api_client::{
    ListOptions, SpotMarketRequestCreateRequest, SpotMarketRequestInstanceParameters,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let credentials = EnvCredentials::try_from_env().ok_or("METAL_AUTH_TOKEN not set")?;
    let project_id = std::env::var("METAL_PROJECT_ID")?;

    let client = MetalClient::builder()
        .credentials(Arc::new(credentials))
        .build();
    let service = client.spot_market_requests();

    let mut params =
        SpotMarketRequestInstanceParameters::new("hourly", "ubuntu_22_04", "c3.small.x86");
    params.hostname = Some("spot-demo".to_string());
    let mut request =
        SpotMarketRequestCreateRequest::new(1, 1, 0.1234, params).facility_ids(["ny5"]);

    let created = service.create(&mut request, &project_id).await?;
    println!("Created {} bidding {}", created.id, request.max_bid_price);

    let options = ListOptions::new().include(["devices"]);
    let fetched = service.get(&created.id, Some(&options)).await?;
    println!("{} has {} devices", fetched.id, fetched.devices.len());

    for existing in service.list(&project_id).await? {
        println!(
            "{}: max {} devices at {}",
            existing.id, existing.request.devices_max, existing.request.max_bid_price
        );
    }

    service.delete(&created.id, true).await?;
    println!("Deleted {}", created.id);

    Ok(())
}
