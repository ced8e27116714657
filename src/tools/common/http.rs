//! Shared plumbing for the HTTP-backed tools
//!
//! Failures are typed here and only flattened into a string at the tool
//! boundary.

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a fetch failed
#[derive(Error, Debug)]
pub enum FetchError {
    /// The API key environment variable is unset or blank
    #[error("{0} is not set")]
    MissingApiKey(&'static str),

    /// Transport failure or non-2xx status
    #[error("{0}")]
    Http(reqwest::Error),

    /// The body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // The URL carries the API key as a query parameter
        FetchError::Http(err.without_url())
    }
}

/// Where a tool gets its API key
#[derive(Debug, Clone)]
pub enum ApiKey {
    /// Read this environment variable on every call
    Env(&'static str),
    /// Use a fixed key
    Fixed(String),
}

impl ApiKey {
    pub fn resolve(&self) -> Result<String, FetchError> {
        match self {
            ApiKey::Env(var) => std::env::var(var)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(FetchError::MissingApiKey(*var)),
            ApiKey::Fixed(key) => Ok(key.clone()),
        }
    }
}

/// Build the HTTP client shared by the tools
///
/// newsapi rejects requests without a User-Agent.
pub fn default_client() -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))
}

/// GET `url` with `query` and decode the JSON body
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, FetchError> {
    let response = client.get(url).query(query).send().await?.error_for_status()?;
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_key_resolves() {
        let key = ApiKey::Fixed("abc".into());
        assert_eq!(key.resolve().unwrap(), "abc");
    }

    #[test]
    fn test_unset_env_key_is_missing() {
        let key = ApiKey::Env("BRIEFING_AGENT_TEST_UNSET_KEY");
        let err = key.resolve().unwrap_err();
        assert_eq!(err.to_string(), "BRIEFING_AGENT_TEST_UNSET_KEY is not set");
    }

    #[tokio::test]
    async fn test_error_status_hides_url() {
        let server = crate::testing::StubServer::start(401, r#"{"status":"error"}"#).await;
        let client = default_client().unwrap();
        let err = get_json::<serde_json::Value>(&client, server.base_url(), &[("apiKey", "s3cret")])
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Http(_)));
        assert!(err.to_string().contains("401"));
        assert!(!err.to_string().contains("s3cret"));
    }
}
