use crate::error::{ClientError, Result};
use pagescope_core::{Config, FetchError, ScrapeResult};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Error body the API sends with non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

/// Thin wrapper over the scraping API's two GET endpoints.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    client: Client,
    base_url: String,
}

impl ScrapeClient {
    pub fn new(config: &Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_secs.max(1));
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/scrape?url=<target>`, with `target` percent-encoded.
    pub fn scrape_url(&self, target: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/scrape", self.base_url))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.query_pairs_mut().append_pair("url", target);
        Ok(url)
    }

    /// Resolves the `next_page` token of a response. Relative paths are
    /// appended to the base URL verbatim; absolute URLs are used as given.
    pub fn page_url(&self, next_page: &str) -> String {
        if let Ok(absolute) = Url::parse(next_page) {
            if matches!(absolute.scheme(), "http" | "https") {
                return absolute.to_string();
            }
        }

        if next_page.starts_with('/') {
            format!("{}{}", self.base_url, next_page)
        } else {
            format!("{}/{}", self.base_url, next_page)
        }
    }

    /// Initial scrape of `target`.
    pub async fn scrape(&self, target: &str) -> std::result::Result<ScrapeResult, FetchError> {
        let url = self
            .scrape_url(target)
            .map_err(|e| FetchError::Unclassified(e.to_string()))?;
        info!("Scraping {} via {}", target, self.base_url);
        self.get(url.as_str()).await
    }

    /// Follow-up page identified by a previous response's `next_page`.
    pub async fn fetch_page(
        &self,
        next_page: &str,
    ) -> std::result::Result<ScrapeResult, FetchError> {
        let url = self.page_url(next_page);
        info!("Fetching next page {}", next_page);
        self.get(&url).await
    }

    async fn get(&self, url: &str) -> std::result::Result<ScrapeResult, FetchError> {
        debug!("GET {}", url);

        let start = Instant::now();
        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Request to {} failed: {}", url, e);
            FetchError::TransportFailure(e.to_string())
        })?;
        let status = response.status();

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::TransportFailure(e.to_string()))?;
        debug!(
            "{} {} ({} bytes in {:?})",
            status.as_u16(),
            url,
            body.len(),
            start.elapsed()
        );

        if !status.is_success() {
            return Err(classify_rejection(status.as_u16(), &body));
        }

        serde_json::from_slice::<ScrapeResult>(&body)
            .map_err(|e| FetchError::Unclassified(format!("invalid response body: {}", e)))
    }
}

fn classify_rejection(status: u16, body: &[u8]) -> FetchError {
    match serde_json::from_slice::<ErrorPayload>(body) {
        Ok(payload) => {
            warn!("API rejected request ({}): {}", status, payload.error);
            FetchError::RemoteRejection {
                status,
                message: payload.error,
            }
        }
        Err(_) => {
            warn!("API returned {} without an error payload", status);
            FetchError::TransportFailure(format!("Request failed with status code {}", status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn client_for(base: &str) -> ScrapeClient {
        let config = Config::default().with_api_base(base).unwrap();
        ScrapeClient::new(&config).unwrap()
    }

    fn body(next_page: Option<&str>) -> serde_json::Value {
        serde_json::json!({
            "request_id": "req-1",
            "pagination": {
                "page_size": 2,
                "current_page": 1,
                "total_pages": 2,
                "next_page": next_page
            },
            "scraped": {
                "title": "Ex",
                "html_version": "HTML5",
                "headings": {"h1": 1},
                "contains_login_form": false,
                "total_urls": 3,
                "internal_urls": 2,
                "external_urls": 1,
                "paginated": {
                    "urls": [
                        {"url": "http://example.com/a", "http_status": 200, "error": null},
                        {"url": "http://example.com/b", "http_status": 404, "error": "Not Found"}
                    ],
                    "inaccessible_urls": 1
                }
            }
        })
    }

    #[test]
    fn test_scrape_url_encodes_target() {
        let client = client_for("http://api.local:8080/");
        let url = client.scrape_url("http://example.com/?a=1&b=2").unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.local:8080/scrape?url=http%3A%2F%2Fexample.com%2F%3Fa%3D1%26b%3D2"
        );
    }

    #[test]
    fn test_page_url_joins_relative_and_keeps_absolute() {
        let client = client_for("http://api.local:8080");
        assert_eq!(
            client.page_url("/scrape?url=x&page=2"),
            "http://api.local:8080/scrape?url=x&page=2"
        );
        assert_eq!(
            client.page_url("scrape?page=2"),
            "http://api.local:8080/scrape?page=2"
        );
        assert_eq!(
            client.page_url("https://other.local/scrape?page=2"),
            "https://other.local/scrape?page=2"
        );
    }

    #[tokio::test]
    async fn test_scrape_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scrape"))
            .and(query_param("url", "http://example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(Some("/scrape?page=2"))))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let result = client.scrape("http://example.com").await.unwrap();

        assert_eq!(result.request_id, "req-1");
        assert_eq!(result.page().urls.len(), 2);
        assert_eq!(result.pagination.next_page.as_deref(), Some("/scrape?page=2"));
    }

    #[tokio::test]
    async fn test_fetch_page_hits_next_page_path() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scrape"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body(None)))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let result = client.fetch_page("/scrape?url=x&page=2").await.unwrap();
        assert!(!result.pagination.has_next());
    }

    #[tokio::test]
    async fn test_rejection_with_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scrape"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "invalid url"})),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.scrape("nope").await.unwrap_err();

        assert_eq!(
            err,
            FetchError::RemoteRejection {
                status: 400,
                message: "invalid url".to_string()
            }
        );
        assert_eq!(err.to_string(), "Error: invalid url");
    }

    #[tokio::test]
    async fn test_rejection_without_payload() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.scrape("http://example.com").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Error: Request failed with status code 502"
        );
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_unclassified() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/scrape"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server.uri());
        let err = client.scrape("http://example.com").await.unwrap_err();

        assert!(matches!(err, FetchError::Unclassified(_)));
        assert!(err.to_string().starts_with("An unexpected error occurred:"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        // Nothing listens on port 1
        let client = client_for("http://127.0.0.1:1");
        let err = client.scrape("http://example.com").await.unwrap_err();

        assert!(matches!(err, FetchError::TransportFailure(_)));
        assert!(err.to_string().starts_with("Error: "));
    }
}
