//! Dog image endpoint handler, proxying the Dog CEO API.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::fetch::OutboundFetch;
use crate::http::ApiResponse;
use crate::models::{timestamp_now, DogImageData, DogQuery, UpstreamDogResponse, RANDOM_BREED};
use crate::{Config, Error, Result};

/// Trim and lowercase a requested breed; blank means "any breed".
pub fn normalize_breed(raw: Option<&str>) -> Option<String> {
    raw.map(|b| b.trim().to_lowercase()).filter(|b| !b.is_empty())
}

/// Fetches a random dog image, optionally restricted to one breed.
#[derive(Clone)]
pub struct DogImageHandler {
    fetcher: Arc<dyn OutboundFetch>,
    config: Arc<Config>,
}

impl DogImageHandler {
    pub fn new(fetcher: Arc<dyn OutboundFetch>, config: Arc<Config>) -> Self {
        Self { fetcher, config }
    }

    /// Serve one request. Never fails: every error becomes an envelope.
    pub async fn handle(&self, query: DogQuery) -> (u16, ApiResponse<DogImageData>) {
        match self.fetch_image(query).await {
            Ok(data) => {
                info!(breed = %data.breed, "dog image fetched");
                (200, ApiResponse::success(data))
            }
            Err(e) => {
                let status = e.status_code();
                if status >= 500 {
                    error!(error = %e, "dog request failed");
                } else {
                    warn!(status, error = %e, "dog request rejected");
                }
                (status, ApiResponse::error(e.public_message(self.config.environment)))
            }
        }
    }

    async fn fetch_image(&self, query: DogQuery) -> Result<DogImageData> {
        let breed = normalize_breed(query.breed.as_deref());

        let url = match &breed {
            Some(breed) => format!(
                "{}/breed/{}/images/random",
                self.config.dog_api_base_url,
                urlencoding::encode(breed)
            ),
            None => format!("{}/breeds/image/random", self.config.dog_api_base_url),
        };

        info!(url = %url, "querying dog api");

        let response = self.fetcher.get(&url, &[]).await?;

        if !response.is_success() {
            if let (404, Some(breed)) = (response.status, &breed) {
                return Err(Error::NotFound(format!(
                    "breed '{}' was not found; check the name and retry",
                    breed
                )));
            }
            return Err(Error::Upstream(format!(
                "dog api responded with status {}",
                response.status
            )));
        }

        let body: UpstreamDogResponse = serde_json::from_slice(&response.body)?;
        let image_url = body.into_image_url().map_err(Error::Upstream)?;

        Ok(DogImageData {
            image_url,
            breed: breed.unwrap_or_else(|| RANDOM_BREED.to_string()),
            timestamp: timestamp_now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;
    use crate::error::GENERIC_INTERNAL_MESSAGE;
    use crate::fetch::fake::FakeFetcher;

    const HUSKY_BODY: &str =
        r#"{"message": "https://images.dog.ceo/breeds/husky/n02110185_1469.jpg", "status": "success"}"#;

    fn handler(fetcher: &Arc<FakeFetcher>, environment: Environment) -> DogImageHandler {
        let config = Config {
            environment,
            ..Config::default()
        };
        DogImageHandler::new(fetcher.clone(), Arc::new(config))
    }

    fn query(breed: Option<&str>) -> DogQuery {
        DogQuery {
            breed: breed.map(String::from),
        }
    }

    #[test]
    fn test_normalize_breed() {
        assert_eq!(normalize_breed(Some("  Husky ")), Some("husky".to_string()));
        assert_eq!(normalize_breed(Some("   ")), None);
        assert_eq!(normalize_breed(Some("")), None);
        assert_eq!(normalize_breed(None), None);
    }

    #[tokio::test]
    async fn test_breed_image() {
        let fetcher = Arc::new(FakeFetcher::replying(200, HUSKY_BODY));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(Some("HUSKY "))).await;

        assert_eq!(status, 200);
        let data = envelope.data().unwrap();
        assert!(data.image_url.contains("husky"));
        assert_eq!(data.breed, "husky");
        assert_eq!(
            fetcher.urls(),
            vec!["https://dog.ceo/api/breed/husky/images/random"]
        );
        assert!(fetcher.headers(0).is_empty());
    }

    #[tokio::test]
    async fn test_random_image_without_breed() {
        let fetcher = Arc::new(FakeFetcher::replying(200, HUSKY_BODY));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(None)).await;

        assert_eq!(status, 200);
        assert_eq!(envelope.data().unwrap().breed, "random");
        assert_eq!(fetcher.urls(), vec!["https://dog.ceo/api/breeds/image/random"]);
    }

    #[tokio::test]
    async fn test_blank_breed_behaves_as_random() {
        let fetcher = Arc::new(FakeFetcher::replying(200, HUSKY_BODY));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(Some("  "))).await;

        assert_eq!(status, 200);
        assert_eq!(envelope.data().unwrap().breed, "random");
        assert_eq!(fetcher.urls(), vec!["https://dog.ceo/api/breeds/image/random"]);
    }

    #[tokio::test]
    async fn test_breed_is_encoded_as_one_segment() {
        let fetcher = Arc::new(FakeFetcher::replying(200, HUSKY_BODY));
        let handler = handler(&fetcher, Environment::Production);

        handler.handle(query(Some("hound/../afghan"))).await;

        assert_eq!(
            fetcher.urls(),
            vec!["https://dog.ceo/api/breed/hound%2F..%2Fafghan/images/random"]
        );
    }

    #[tokio::test]
    async fn test_unknown_breed_is_not_found() {
        let body = r#"{"status": "error", "message": "Breed not found (main breed does not exist)", "code": 404}"#;
        let fetcher = Arc::new(FakeFetcher::replying(404, body));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(Some("invalid-breed-xyz"))).await;

        assert_eq!(status, 404);
        assert_eq!(
            envelope.error_message(),
            Some("breed 'invalid-breed-xyz' was not found; check the name and retry")
        );
        assert!(envelope.data().is_none());
    }

    #[tokio::test]
    async fn test_404_without_breed_is_internal_error() {
        let fetcher = Arc::new(FakeFetcher::replying(404, "{}"));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(None)).await;

        assert_eq!(status, 500);
        assert_eq!(envelope.error_message(), Some(GENERIC_INTERNAL_MESSAGE));
    }

    #[tokio::test]
    async fn test_non_success_status_field_is_internal_error() {
        let body = r#"{"message": "something odd", "status": "error"}"#;
        let fetcher = Arc::new(FakeFetcher::replying(200, body));
        let handler = handler(&fetcher, Environment::Development);

        let (status, envelope) = handler.handle(query(Some("husky"))).await;

        assert_eq!(status, 500);
        assert_eq!(
            envelope.error_message(),
            Some("Upstream error: dog api returned status 'error'")
        );
    }

    #[tokio::test]
    async fn test_message_list_takes_first_url() {
        let body = r#"{"message": ["https://images.dog.ceo/breeds/corgi/a.jpg", "https://images.dog.ceo/breeds/corgi/b.jpg"], "status": "success"}"#;
        let fetcher = Arc::new(FakeFetcher::replying(200, body));
        let handler = handler(&fetcher, Environment::Production);

        let (_, envelope) = handler.handle(query(Some("corgi"))).await;

        assert_eq!(
            envelope.data().unwrap().image_url,
            "https://images.dog.ceo/breeds/corgi/a.jpg"
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_internal_error() {
        let fetcher = Arc::new(FakeFetcher::replying(200, "<html>maintenance</html>"));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(Some("husky"))).await;

        assert_eq!(status, 500);
        assert_eq!(envelope.error_message(), Some(GENERIC_INTERNAL_MESSAGE));
        assert!(envelope.data().is_none());
    }

    #[tokio::test]
    async fn test_empty_message_list_is_internal_error() {
        let fetcher = Arc::new(FakeFetcher::replying(200, r#"{"message": [], "status": "success"}"#));
        let handler = handler(&fetcher, Environment::Development);

        let (status, envelope) = handler.handle(query(None)).await;

        assert_eq!(status, 500);
        assert_eq!(
            envelope.error_message(),
            Some("Upstream error: dog api returned no image url")
        );
    }

    #[tokio::test]
    async fn test_outage_is_internal_error() {
        let fetcher = Arc::new(FakeFetcher::failing("request timed out"));
        let handler = handler(&fetcher, Environment::Production);

        let (status, envelope) = handler.handle(query(Some("beagle"))).await;

        assert_eq!(status, 500);
        assert!(!envelope.is_success());
        assert_eq!(envelope.error_message(), Some(GENERIC_INTERNAL_MESSAGE));
    }
}
