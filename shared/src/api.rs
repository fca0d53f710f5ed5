//! Lambda request adapters for the proxied endpoints.
//!
//! Endpoints:
//! - GET /api/advice[?id=N]
//! - GET /api/dog[?breed=NAME]

use lambda_http::http::{HeaderValue, Method};
use lambda_http::{Body, Request, RequestExt, Response};
use tracing::info;

use crate::advice::AdviceHandler;
use crate::dog::DogImageHandler;
use crate::http::{error_response, json_response};
use crate::models::{AdviceQuery, DogQuery};
use crate::Error;

/// Serve `/api/advice`.
pub async fn advice_endpoint(handler: &AdviceHandler, event: &Request) -> Result<Response<Body>, lambda_http::Error> {
    if let Some(response) = reject_non_get(event)? {
        return Ok(response);
    }

    let params = event.query_string_parameters();
    let query = AdviceQuery {
        id: params.first("id").map(String::from),
    };

    let (status, envelope) = handler.handle(query).await;
    json_response(status, &envelope)
}

/// Serve `/api/dog`.
pub async fn dog_endpoint(handler: &DogImageHandler, event: &Request) -> Result<Response<Body>, lambda_http::Error> {
    if let Some(response) = reject_non_get(event)? {
        return Ok(response);
    }

    let params = event.query_string_parameters();
    let query = DogQuery {
        breed: params.first("breed").map(String::from),
    };

    let (status, envelope) = handler.handle(query).await;
    json_response(status, &envelope)
}

fn reject_non_get(event: &Request) -> Result<Option<Response<Body>>, lambda_http::Error> {
    if event.method() == Method::GET {
        return Ok(None);
    }

    info!(method = %event.method(), path = event.uri().path(), "rejecting non-GET request");

    let err = Error::MethodNotAllowed;
    let mut response = error_response(err.status_code(), err.to_string())?;
    response
        .headers_mut()
        .insert("allow", HeaderValue::from_static("GET"));
    Ok(Some(response))
}
