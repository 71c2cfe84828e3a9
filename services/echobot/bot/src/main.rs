#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate rocket;

use std::sync::Arc;
use std::time::Duration;

use log::info;
use reqwest::ClientBuilder;

use crate::router::CommandRouter;

mod api;
mod config;
mod reply;
mod router;

#[rocket::main]
async fn main() {
    env_logger::init();
    let figment = config::figment();
    let config: config::Config = figment.extract().expect("Failed to load configuration");

    let delegation = config.analyzer.delegation();
    match &delegation {
        Some(d) => info!("Delegating free text to language service at {}", d.endpoint),
        None => info!("No language service configured, free text is answered locally"),
    }

    let http_client = ClientBuilder::new()
        .timeout(Duration::from_millis(config.analyzer.timeout_ms))
        .build()
        .expect("Failed to build HTTP Client");

    let router = CommandRouter::from_delegation(http_client, delegation);

    let result = rocket::custom(figment)
        .manage(Arc::new(router))
        .mount("/", api::routes())
        .launch()
        .await;

    assert!(result.is_ok());
}
