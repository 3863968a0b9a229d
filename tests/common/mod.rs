//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use collection_watch::config::Config;

pub const VALIDATED_PATH: &str =
    "/api/automation-hub/v3/plugin/ansible/content/validated/collections/index/";
pub const CERTIFIED_PATH: &str =
    "/api/automation-hub/v3/plugin/ansible/content/published/collections/index/";

/// Render a timestamp the way the Hub API does
pub fn api_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string()
}

/// Timestamp `days` days before now
pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

/// Index entry as returned by the collection index endpoint
pub fn collection(
    index_path: &str,
    namespace: &str,
    name: &str,
    version: &str,
    updated_at: DateTime<Utc>,
) -> Value {
    json!({
        "namespace": namespace,
        "name": name,
        "updated_at": api_timestamp(updated_at),
        "deprecated": false,
        "highest_version": {
            "href": version_href(index_path, namespace, name, version),
            "version": version
        }
    })
}

/// API path of a collection version detail document
pub fn version_href(index_path: &str, namespace: &str, name: &str, version: &str) -> String {
    format!("{}{}/{}/versions/{}/", index_path, namespace, name, version)
}

/// Mount a single-page index for `index_path`
pub async fn mount_index(server: &MockServer, index_path: &str, entries: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(index_path))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": {"count": entries.len()},
            "links": {"first": index_path, "next": null},
            "data": entries
        })))
        .mount(server)
        .await;
}

/// Configuration pointing at the mock server, with extra YAML appended
pub fn config_for(server: &MockServer, extra_yaml: &str) -> Config {
    let yaml = format!(
        "hub:\n  url: \"{}\"\n  username: \"jdoe\"\n  password: \"secret\"\n{}",
        server.uri(),
        extra_yaml
    );
    let config = Config::from_yaml(&yaml).expect("Failed to parse test config");
    config.validate().expect("Invalid test config");
    config
}

/// Split captured output into lines
pub fn output_lines(out: Vec<u8>) -> Vec<String> {
    String::from_utf8(out)
        .expect("Report is not UTF-8")
        .lines()
        .map(String::from)
        .collect()
}
