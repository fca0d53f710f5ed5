//! Advice Lambda - Handles the /api/advice endpoint.
//!
//! Proxies the Advice Slip API: `GET /api/advice` returns a random slip,
//! `GET /api/advice?id=N` returns slip N.

use lambda_http::{run, service_fn, Body, Error, Request, Response};
use shared::{AdviceHandler, Config, HttpFetcher};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

async fn handler(state: Arc<AdviceHandler>, event: Request) -> Result<Response<Body>, Error> {
    info!("Received request: method={}, path={}", event.method(), event.uri().path());

    shared::api::advice_endpoint(&state, &event).await
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);
    let fetcher = Arc::new(HttpFetcher::new(&config)?);
    let state = Arc::new(AdviceHandler::new(fetcher, config));

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
