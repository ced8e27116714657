//! Breaking-news tool: top headlines via newsapi.org

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::http::{get_json, ApiKey, FetchError};
use crate::tools::{Tool, ToolResult};

pub const NEWS_API_KEY_VAR: &str = "BREAKING_NEWS_API_KEY";
const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const COUNTRY: &str = "us";
const MAX_HEADLINES: usize = 5;

/// Returned when the API has no articles. The spelling is part of the output.
pub const NO_NEWS_MESSAGE: &str = "No breakig news available at the moment.";

#[derive(Debug, Deserialize)]
struct TopHeadlines {
    // Kept raw so articles past the ones shown are never decoded
    #[serde(default)]
    articles: Option<Vec<Value>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Article {
    pub title: String,
}

/// Returns the latest US top headlines
pub struct BreakingNewsTool {
    client: Client,
    base_url: String,
    api_key: ApiKey,
}

impl BreakingNewsTool {
    /// Create a news tool that reads `BREAKING_NEWS_API_KEY` on each call
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: ApiKey::Env(NEWS_API_KEY_VAR),
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

    /// Fetch headlines. Never fails; errors come back as text.
    pub async fn fetch(&self) -> String {
        match self.top_headlines().await {
            Ok(articles) => format_headlines(&articles),
            Err(e) => {
                tracing::warn!("[BreakingNewsTool] Fetch failed: {}", e);
                format!("Error fetching news: {}", e)
            }
        }
    }

    async fn top_headlines(&self) -> Result<Vec<Article>, FetchError> {
        let key = self.api_key.resolve()?;
        let url = format!("{}/v2/top-headlines", self.base_url);
        let headlines: TopHeadlines = get_json(
            &self.client,
            &url,
            &[("country", COUNTRY), ("apiKey", key.as_str())],
        )
        .await?;

        let articles = headlines.articles.unwrap_or_default();
        tracing::debug!("[BreakingNewsTool] {} articles", articles.len());
        articles
            .into_iter()
            .take(MAX_HEADLINES)
            .map(|a| serde_json::from_value(a).map_err(FetchError::from))
            .collect()
    }
}

/// Render up to the first five titles as a bulleted list
pub fn format_headlines(articles: &[Article]) -> String {
    if articles.is_empty() {
        return NO_NEWS_MESSAGE.to_string();
    }

    articles
        .iter()
        .take(MAX_HEADLINES)
        .map(|a| format!("- {}", a.title))
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl Tool for BreakingNewsTool {
    fn name(&self) -> &str {
        "get_breaking_news"
    }

    fn description(&self) -> &str {
        "Returns the latest breaking news."
    }

    async fn execute(&self, _input: &Value) -> Result<ToolResult> {
        Ok(ToolResult::success(self.fetch().await))
    }
}
