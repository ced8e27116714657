//! Location tool: IP geolocation via ipinfo.io

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::http::{get_json, ApiKey, FetchError};
use crate::tools::{Tool, ToolResult};

pub const LOCATION_API_KEY_VAR: &str = "LOCATION_API_KEY";
const DEFAULT_BASE_URL: &str = "https://ipinfo.io";

/// Subset of the ipinfo response we render
#[derive(Debug, Default, Deserialize)]
pub struct IpInfo {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
}

/// Returns the caller's location based on their IP address
pub struct LocationTool {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl LocationTool {
    /// Create a location tool that reads `LOCATION_API_KEY` on each call
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: ApiKey::Env(LOCATION_API_KEY_VAR),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = ApiKey::Fixed(api_key.into());
        self
    }

    /// Look up the location. Never fails; errors come back as text.
    pub async fn fetch(&self) -> String {
        match self.lookup().await {
            Ok(info) => format_location(&info),
            Err(e) => {
                tracing::warn!("[LocationTool] Lookup failed: {}", e);
                format!("Error fetching location: {}", e)
            }
        }
    }

    async fn lookup(&self) -> Result<IpInfo, FetchError> {
        let token = self.api_key.resolve()?;
        let url = format!("{}/json", self.base_url);
        get_json(&self.client, &url, &[("token", token.as_str())]).await
    }
}

/// Render an ipinfo record; missing fields render empty
pub fn format_location(info: &IpInfo) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_default();
    format!(
        "Your current location is:\nCity: {}\nRegion: {}\nCountry: {}",
        field(&info.city),
        field(&info.region),
        field(&info.country)
    )
}

#[async_trait]
impl Tool for LocationTool {
    fn name(&self) -> &str {
        "get_current_location"
    }

    fn description(&self) -> &str {
        "Returns the current location based on IP address."
    }

    async fn execute(&self, _input: &Value) -> Result<ToolResult> {
        Ok(ToolResult::success(self.fetch().await))
    }
}
