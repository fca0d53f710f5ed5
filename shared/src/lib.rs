//! Shared library for Little API Lambda functions.
//!
//! This crate provides the endpoint handlers, the outbound HTTP client and the
//! response envelope used by every Lambda binary.

pub mod advice;
pub mod api;
pub mod config;
pub mod dog;
pub mod error;
pub mod fetch;
pub mod http;
pub mod models;

pub use advice::AdviceHandler;
pub use config::{Config, Environment};
pub use dog::DogImageHandler;
pub use error::{Error, Result};
pub use fetch::{FetchResponse, HttpFetcher, OutboundFetch};
pub use http::ApiResponse;
pub use models::{AdviceData, AdviceQuery, DogImageData, DogQuery};
