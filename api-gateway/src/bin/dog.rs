//! Dog Lambda - Handles the /api/dog endpoint.
//!
//! Proxies the Dog CEO API: `GET /api/dog` returns a random image,
//! `GET /api/dog?breed=husky` restricts it to one breed.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::{Config, DogImageHandler, HttpFetcher};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(state: Arc<DogImageHandler>, event: Request) -> Result<Response<Body>, Error> {
    info!("Received request: method={}, path={}", event.method(), event.uri().path());

    shared::api::dog_endpoint(&state, &event).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let state = Arc::new(DogImageHandler::new(fetcher, config));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
