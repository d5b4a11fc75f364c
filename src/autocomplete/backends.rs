//! Remote suggestion backends

use super::RemoteSuggestion;
use crate::error::{Error, Result};
use crate::network::HttpClient;
use async_trait::async_trait;
use serde::Deserialize;

/// A remote service that turns a partial query into phrase suggestions
#[async_trait]
pub trait SuggestionBackend: Send + Sync {
    /// Backend name
    fn name(&self) -> &str;

    /// Fetch suggestions for a query
    async fn suggest(&self, client: &HttpClient, query: &str) -> Result<Vec<RemoteSuggestion>>;
}

/// Get a backend by name, optionally pointed at a different endpoint
pub fn get_backend(name: &str, endpoint: Option<&str>) -> Option<Box<dyn SuggestionBackend>> {
    let endpoint = endpoint.map(String::from);
    match name.to_lowercase().as_str() {
        "duckduckgo" | "ddg" => Some(Box::new(DuckDuckGo {
            url: endpoint.unwrap_or_else(|| "https://duckduckgo.com/ac/".to_string()),
        })),
        "google" => Some(Box::new(Google {
            url: endpoint.unwrap_or_else(|| "https://www.google.com/complete/search".to_string()),
        })),
        "brave" => Some(Box::new(Brave {
            url: endpoint.unwrap_or_else(|| "https://search.brave.com/api/suggest".to_string()),
        })),
        _ => None,
    }
}

/// List available backends
pub fn list_backends() -> Vec<&'static str> {
    vec!["duckduckgo", "google", "brave"]
}

fn ensure_success(backend: &str, status: u16) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(Error::Status {
            backend: backend.to_string(),
            status,
        })
    }
}

/// Parse the OpenSearch suggestion shape: `[query, [phrase, ...], ...]`
fn parse_opensearch(text: &str) -> Result<Vec<RemoteSuggestion>> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let suggestions = json
        .as_array()
        .and_then(|arr| arr.get(1))
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(RemoteSuggestion::new))
                .collect()
        })
        .unwrap_or_default();
    Ok(suggestions)
}

/// DuckDuckGo autocomplete backend
pub struct DuckDuckGo {
    url: String,
}

#[derive(Deserialize)]
struct DuckDuckGoPhrase {
    phrase: String,
    #[serde(rename = "isNav", default)]
    is_nav: Option<bool>,
}

#[async_trait]
impl SuggestionBackend for DuckDuckGo {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn suggest(&self, client: &HttpClient, query: &str) -> Result<Vec<RemoteSuggestion>> {
        let response = client
            .get_with_params(&self.url, &[("q", query), ("is_nav", "1")])
            .await?;
        ensure_success(self.name(), response.status)?;

        // DuckDuckGo returns: [{"phrase": "...", "isNav": bool}, ...]
        let phrases: Vec<DuckDuckGoPhrase> = response.json()?;
        Ok(phrases
            .into_iter()
            .map(|p| RemoteSuggestion {
                phrase: p.phrase,
                is_nav: p.is_nav,
            })
            .collect())
    }
}

/// Google autocomplete backend
pub struct Google {
    url: String,
}

#[async_trait]
impl SuggestionBackend for Google {
    fn name(&self) -> &str {
        "google"
    }

    async fn suggest(&self, client: &HttpClient, query: &str) -> Result<Vec<RemoteSuggestion>> {
        let response = client
            .get_with_params(&self.url, &[("q", query), ("client", "firefox")])
            .await?;
        ensure_success(self.name(), response.status)?;
        parse_opensearch(&response.text)
    }
}

/// Brave autocomplete backend
pub struct Brave {
    url: String,
}

#[async_trait]
impl SuggestionBackend for Brave {
    fn name(&self) -> &str {
        "brave"
    }

    async fn suggest(&self, client: &HttpClient, query: &str) -> Result<Vec<RemoteSuggestion>> {
        let response = client.get_with_params(&self.url, &[("q", query)]).await?;
        ensure_success(self.name(), response.status)?;
        parse_opensearch(&response.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_list_backends() {
        let backends = list_backends();
        assert!(backends.contains(&"duckduckgo"));
        assert!(backends.contains(&"google"));
        assert!(backends.contains(&"brave"));
    }

    #[test]
    fn test_get_backend() {
        assert!(get_backend("duckduckgo", None).is_some());
        assert!(get_backend("DDG", None).is_some());
        assert_eq!(get_backend("google", None).unwrap().name(), "google");
        assert!(get_backend("unknown", None).is_none());
    }

    #[test]
    fn test_parse_opensearch() {
        let parsed = parse_opensearch(r#"["rus", ["rust", "russia"]]"#).unwrap();
        assert_eq!(parsed, vec![RemoteSuggestion::new("rust"), RemoteSuggestion::new("russia")]);

        assert!(parse_opensearch(r#"{"unexpected": true}"#).unwrap().is_empty());
        assert!(parse_opensearch("not json").is_err());
    }

    #[tokio::test]
    async fn test_duckduckgo_reads_phrases_and_nav_flag() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "exam"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"phrase": "example", "isNav": false}, {"phrase": "example.com", "isNav": true}, {"phrase": "exams"}]"#,
            ))
            .mount(&server)
            .await;

        let backend = get_backend("duckduckgo", Some(&server.uri())).unwrap();
        let client = HttpClient::new().unwrap();
        let suggestions = assert_ok!(backend.suggest(&client, "exam").await);

        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].is_nav, Some(false));
        assert_eq!(suggestions[1].is_nav, Some(true));
        assert_eq!(suggestions[2].is_nav, None);
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let backend = get_backend("brave", Some(&server.uri())).unwrap();
        let client = HttpClient::new().unwrap();
        let err = assert_err!(backend.suggest(&client, "rust").await);
        assert!(matches!(err, Error::Status { status: 429, .. }));
    }
}
