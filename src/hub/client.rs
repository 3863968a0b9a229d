//! Automation Hub API client
//!
//! Authenticated JSON GET requests against the collection index endpoints,
//! following `links.next` until the last page.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{Credentials, HubConfig};
use crate::error::{AppError, FetchError};
use crate::models::{parse_timestamp, CollectionPage, CollectionRecord, Repository, VersionDetail};

use super::CollectionSource;

/// HTTP client for the Automation Hub collection API
#[derive(Debug)]
pub struct HubClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
    page_size: u32,
}

impl HubClient {
    /// Create a client from the hub configuration
    pub fn new(config: &HubConfig) -> Result<Self, AppError> {
        let credentials = config.credentials()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(client, config, credentials))
    }

    /// Create a client around an existing reqwest Client
    pub fn with_client(client: Client, config: &HubConfig, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            credentials,
            page_size: config.page_size,
        }
    }

    /// Base URL requests are resolved against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn an API href into an absolute URL
    ///
    /// The API hands out both absolute links and paths relative to the host.
    pub fn resolve_url(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if href.starts_with('/') {
            format!("{}{}", self.base_url, href)
        } else {
            format!("{}/{}", self.base_url, href)
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Credentials::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            Credentials::Token(token) => request.bearer_auth(token),
        }
    }

    /// Perform an authenticated GET and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        debug!(url = url, "Sending HTTP GET request");

        let response = self
            .authorize(self.client.get(url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FetchError::NetworkTimeout
                } else if e.is_connect() {
                    FetchError::ConnectionRefused(url.to_string())
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| FetchError::Network(e.to_string()))?;

                debug!(url = url, body_size = body.len(), "Received response");

                serde_json::from_slice(&body).map_err(|e| {
                    FetchError::InvalidData(format!("malformed response from {}: {}", url, e))
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(url = url, status = ?response.status(), "Credentials rejected");
                Err(FetchError::Unauthorized(response.status().as_u16()))
            }
            StatusCode::NOT_FOUND => {
                warn!(url = url, "Resource not found (404)");
                Err(FetchError::NotFound(url.to_string()))
            }
            status => {
                warn!(url = url, status = status.as_u16(), "Unexpected status");
                Err(FetchError::Status(status.as_u16()))
            }
        }
    }
}

#[async_trait]
impl CollectionSource for HubClient {
    async fn fetch_collections(
        &self,
        repository: Repository,
    ) -> Result<Vec<CollectionRecord>, FetchError> {
        let mut url = format!(
            "{}?limit={}",
            self.resolve_url(repository.index_path()),
            self.page_size
        );
        let mut visited = HashSet::new();
        let mut records = Vec::new();
        let mut pages = 0usize;

        loop {
            visited.insert(url.clone());
            let page: CollectionPage = self.get_json(&url).await?;
            pages += 1;

            debug!(
                repository = %repository,
                page = pages,
                entries = page.data.len(),
                "Fetched collection page"
            );

            for entry in page.data {
                records.push(CollectionRecord::from_entry(entry, repository)?);
            }

            match page.links.next.filter(|next| !next.is_empty()) {
                Some(next) => {
                    url = self.resolve_url(&next);
                    if visited.contains(&url) {
                        return Err(FetchError::InvalidData(format!(
                            "pagination loops back to {}",
                            url
                        )));
                    }
                }
                None => break,
            }
        }

        info!(
            repository = %repository,
            pages = pages,
            collections = records.len(),
            "Fetched collection index"
        );

        Ok(records)
    }

    async fn fetch_version_updated_at(&self, href: &str) -> Result<DateTime<Utc>, FetchError> {
        let detail: VersionDetail = self.get_json(&self.resolve_url(href)).await?;
        parse_timestamp(&detail.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{basic_auth, bearer_token, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const VALIDATED: &str =
        "/api/automation-hub/v3/plugin/ansible/content/validated/collections/index/";

    fn hub_config(url: &str) -> HubConfig {
        HubConfig {
            url: url.to_string(),
            username: Some("jdoe".to_string()),
            password: Some("secret".to_string()),
            page_size: 2,
            ..Default::default()
        }
    }

    fn entry(namespace: &str, name: &str) -> serde_json::Value {
        json!({
            "namespace": namespace,
            "name": name,
            "updated_at": "2024-05-01T10:00:00.000000Z",
            "highest_version": {
                "href": format!("{}{}/{}/versions/1.0.0/", VALIDATED, namespace, name),
                "version": "1.0.0"
            }
        })
    }

    fn names(records: &[CollectionRecord]) -> Vec<String> {
        records.iter().map(|r| r.fqcn()).collect()
    }

    // Test 1: Two pages are concatenated in order
    #[tokio::test]
    async fn test_pagination_concatenates_pages() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [entry("cisco", "ios")],
                "links": {"next": null}
            })))
            .with_priority(1)
            .expect(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [entry("redhat", "rhel_system_roles"), entry("ansible", "posix")],
                "links": {"next": format!("{}?limit=2&offset=2", VALIDATED)}
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();
        let records = client.fetch_collections(Repository::Validated).await.unwrap();

        assert_eq!(
            names(&records),
            vec!["redhat.rhel_system_roles", "ansible.posix", "cisco.ios"]
        );
        assert!(records.iter().all(|r| r.repository == Repository::Validated));
    }

    // Test 2: Absolute next links are followed as-is
    #[tokio::test]
    async fn test_absolute_next_link() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .and(query_param("offset", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [entry("cisco", "ios")],
                "links": {"next": null}
            })))
            .with_priority(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [entry("redhat", "openshift")],
                "links": {"next": format!("{}{}?offset=2", mock_server.uri(), VALIDATED)}
            })))
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();
        let records = client.fetch_collections(Repository::Validated).await.unwrap();

        assert_eq!(names(&records), vec!["redhat.openshift", "cisco.ios"]);
    }

    // Test 3: Basic auth credentials are sent
    #[tokio::test]
    async fn test_basic_auth_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(basic_auth("jdoe", "secret"))
            .and(header("accept", "application/json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [], "links": {}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();
        let records = client.fetch_collections(Repository::Certified).await.unwrap();

        assert!(records.is_empty());
    }

    // Test 4: Token credentials are sent as bearer auth
    #[tokio::test]
    async fn test_bearer_token_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(bearer_token("t0ken"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": [], "links": {}})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = HubConfig {
            token: Some("t0ken".to_string()),
            ..hub_config(&mock_server.uri())
        };
        let client = HubClient::new(&config).unwrap();

        assert!(client.fetch_collections(Repository::Validated).await.is_ok());
    }

    // Test 5: 401 and 403 are reported as Unauthorized
    #[tokio::test]
    async fn test_unauthorized_statuses() {
        for status in [401u16, 403] {
            let mock_server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&mock_server)
                .await;

            let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();
            let result = client.fetch_collections(Repository::Validated).await;

            assert_eq!(result.unwrap_err(), FetchError::Unauthorized(status));
        }
    }

    // Test 6: Server errors and malformed bodies
    #[tokio::test]
    async fn test_server_error_and_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .respond_with(ResponseTemplate::new(503))
            .with_priority(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();

        assert_eq!(
            client
                .fetch_collections(Repository::Validated)
                .await
                .unwrap_err(),
            FetchError::Status(503)
        );
        assert!(matches!(
            client.fetch_collections(Repository::Certified).await,
            Err(FetchError::InvalidData(_))
        ));
    }

    // Test 7: A bad timestamp in the listing is malformed data
    #[tokio::test]
    async fn test_invalid_timestamp_in_page() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "namespace": "redhat",
                    "name": "broken",
                    "updated_at": "last tuesday",
                    "highest_version": {"version": "1.0.0"}
                }],
                "links": {"next": null}
            })))
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();

        assert!(matches!(
            client.fetch_collections(Repository::Validated).await,
            Err(FetchError::InvalidData(msg)) if msg.contains("last tuesday")
        ));
    }

    // Test 8: A next link pointing back to a visited page is rejected
    #[tokio::test]
    async fn test_pagination_loop_detected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(VALIDATED))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [entry("redhat", "loop")],
                "links": {"next": format!("{}?limit=2", VALIDATED)}
            })))
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();

        assert!(matches!(
            client.fetch_collections(Repository::Validated).await,
            Err(FetchError::InvalidData(msg)) if msg.contains("pagination")
        ));
    }

    // Test 9: Version detail timestamp
    #[tokio::test]
    async fn test_fetch_version_updated_at() {
        let mock_server = MockServer::start().await;
        let href = format!("{}redhat/openshift/versions/2.0.0/", VALIDATED);
        Mock::given(method("GET"))
            .and(path(href.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "version": "2.0.0",
                "updated_at": "2024-06-02T08:30:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = HubClient::new(&hub_config(&mock_server.uri())).unwrap();
        let updated_at = client.fetch_version_updated_at(&href).await.unwrap();

        assert_eq!(updated_at.to_rfc3339(), "2024-06-02T08:30:00+00:00");
    }

    // Test 10: Unreachable endpoint
    #[tokio::test]
    async fn test_connection_refused() {
        // Grab a free port, then release it so nothing is listening
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };

        let client = HubClient::new(&hub_config(&format!("http://{}", addr))).unwrap();
        let result = client.fetch_collections(Repository::Validated).await;

        assert!(matches!(
            result,
            Err(FetchError::ConnectionRefused(_)) | Err(FetchError::Network(_))
        ));
    }

    // Test 11: URL resolution
    #[test]
    fn test_resolve_url() {
        let client = HubClient::new(&hub_config("https://console.redhat.com/")).unwrap();

        assert_eq!(client.base_url(), "https://console.redhat.com");
        assert_eq!(
            client.resolve_url("/api/x/?limit=1"),
            "https://console.redhat.com/api/x/?limit=1"
        );
        assert_eq!(
            client.resolve_url("api/x/"),
            "https://console.redhat.com/api/x/"
        );
        assert_eq!(
            client.resolve_url("https://mirror.example.com/api/x/"),
            "https://mirror.example.com/api/x/"
        );
    }

    // Test 12: Missing credentials fail before any request
    #[test]
    fn test_new_requires_credentials() {
        let config = HubConfig::default();
        assert!(matches!(HubClient::new(&config), Err(AppError::Config(_))));
    }
}
