//! Disruption news scanning
//!
//! [`NewsScanner`] never fails: a missing API key or an upstream error is logged and
//! reported as "no news", so the agent can still reason about the rest of its task.

use crate::error::NewsError;
use crate::format::format_headlines;
use crate::tool::{Tool, query_argument};
use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use supply_core::NewsConfig;
use supply_llm::tools::schema;
use tracing::{debug, info, instrument, warn};

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// A headline returned by the news API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

impl NewsArticle {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            source: None,
            description: None,
            published_at: None,
        }
    }
}

/// Upstream headline search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Up to `max_results` articles for `query`, in upstream order
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<NewsArticle>, NewsError>;
}

/// GNews v4 search client
pub struct GNewsClient {
    client: Client,
    endpoint: String,
    api_key: String,
    language: String,
    rate_limiter: SharedRateLimiter,
}

impl GNewsClient {
    /// Build from config; fails only when no API key is set
    pub fn from_config(config: &NewsConfig) -> Result<Self, NewsError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(NewsError::MissingApiKey)?;

        let per_minute = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_minute(per_minute)));
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
            language: config.language.clone(),
            rate_limiter,
        })
    }
}

#[async_trait]
impl NewsSource for GNewsClient {
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<NewsArticle>, NewsError> {
        self.rate_limiter.until_ready().await;

        let max = max_results.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("lang", self.language.as_str()),
                ("max", max.as_str()),
                ("token", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        parse_articles(&body, max_results)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArticle {
    title: String,
    url: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    published_at: Option<String>,
    #[serde(default)]
    source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
struct RawSource {
    #[serde(default)]
    name: Option<String>,
}

fn parse_articles(body: &str, max_results: usize) -> Result<Vec<NewsArticle>, NewsError> {
    let parsed: SearchResponse = serde_json::from_str(body)?;
    Ok(parsed
        .articles
        .into_iter()
        .take(max_results)
        .map(|a| NewsArticle {
            title: a.title,
            url: a.url,
            source: a.source.and_then(|s| s.name),
            description: a.description,
            published_at: a.published_at,
        })
        .collect())
}

/// Headline search that degrades to an empty result
pub struct NewsScanner {
    source: Option<Arc<dyn NewsSource>>,
    max_results: usize,
}

impl NewsScanner {
    pub fn new(source: Arc<dyn NewsSource>, max_results: usize) -> Self {
        Self {
            source: Some(source),
            max_results,
        }
    }

    /// Scanner backed by GNews, or an inert one when no API key is configured
    pub fn from_config(config: &NewsConfig) -> Self {
        let source = match GNewsClient::from_config(config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn NewsSource>),
            Err(e) => {
                warn!(error = %e, "News scanning disabled");
                None
            }
        };
        Self {
            source,
            max_results: config.max_results,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.source.is_some()
    }

    /// Recent articles for `query`; empty on any failure
    pub async fn scan(&self, query: &str) -> Vec<NewsArticle> {
        let Some(source) = &self.source else {
            warn!(query, "No news API key configured, returning no articles");
            return Vec::new();
        };

        match source.search(query, self.max_results).await {
            Ok(mut articles) => {
                articles.truncate(self.max_results);
                info!(query, count = articles.len(), "News scan complete");
                articles
            }
            Err(e) => {
                warn!(query, error = %e, "News scan failed, returning no articles");
                Vec::new()
            }
        }
    }
}

/// `news_scanner_tool`
pub struct NewsScanTool {
    scanner: NewsScanner,
}

impl NewsScanTool {
    pub const NAME: &'static str = "news_scanner_tool";

    pub fn new(scanner: NewsScanner) -> Self {
        Self { scanner }
    }
}

#[async_trait]
impl Tool for NewsScanTool {
    async fn call(&self, input: Value) -> supply_core::Result<String> {
        let query = query_argument(&input)?;
        let articles = self.scanner.scan(&query).await;
        debug!(count = articles.len(), "Formatting headlines");
        Ok(format_headlines(&articles))
    }

    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Scans for recent news articles related to a general query about supply chain \
         disruptions. Use this as your first step to get a lay of the land. The input query \
         should be a simple search term like 'factory fire' or 'port congestion'. Returns \
         article titles and URLs, one per line."
    }

    fn input_schema(&self) -> Value {
        schema::object(
            json!({"query": schema::string("Search term, e.g. 'Taiwan semiconductor'")}),
            &["query"],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_gnews_body() {
        let body = r#"{
            "totalArticles": 3,
            "articles": [
                {"title": "Earthquake halts fabs in Hsinchu", "url": "https://news.example/a",
                 "description": "Output paused", "publishedAt": "2024-04-03T01:00:00Z",
                 "source": {"name": "Wire", "url": "https://news.example"}},
                {"title": "Port congestion eases", "url": "https://news.example/b"},
                {"title": "Third", "url": "https://news.example/c"}
            ]
        }"#;
        let articles = parse_articles(body, 2).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source.as_deref(), Some("Wire"));
        assert_eq!(articles[0].published_at.as_deref(), Some("2024-04-03T01:00:00Z"));
        assert_eq!(articles[1], NewsArticle::new("Port congestion eases", "https://news.example/b"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_articles("not json", 10), Err(NewsError::Parse(_))));
    }

    #[test]
    fn test_client_requires_api_key() {
        assert!(matches!(
            GNewsClient::from_config(&NewsConfig::default()),
            Err(NewsError::MissingApiKey)
        ));
        assert!(GNewsClient::from_config(&NewsConfig::default().with_api_key("  ")).is_err());
        assert!(GNewsClient::from_config(&NewsConfig::default().with_api_key("k")).is_ok());
    }

    #[tokio::test]
    async fn test_unset_key_yields_empty() {
        let scanner = NewsScanner::from_config(&NewsConfig::default());
        assert!(!scanner.is_configured());
        assert!(scanner.scan("Taiwan semiconductor").await.is_empty());
    }

    #[tokio::test]
    async fn test_scan_passes_query_and_cap() {
        let mut source = MockNewsSource::new();
        source
            .expect_search()
            .withf(|query, max| query == "Taiwan semiconductor" && *max == 2)
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    NewsArticle::new("a", "https://a"),
                    NewsArticle::new("b", "https://b"),
                    NewsArticle::new("c", "https://c"),
                ])
            });

        let scanner = NewsScanner::new(Arc::new(source), 2);
        let articles = scanner.scan("Taiwan semiconductor").await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "a");
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_empty() {
        let mut source = MockNewsSource::new();
        source.expect_search().returning(|_, _| {
            Err(NewsError::Status {
                status: 403,
                body: "forbidden".to_string(),
            })
        });

        let scanner = NewsScanner::new(Arc::new(source), 10);
        assert!(scanner.scan("port strike").await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_empty() {
        let config = NewsConfig {
            endpoint: "http://127.0.0.1:9/api/v4/search".to_string(),
            timeout_secs: 2,
            ..NewsConfig::default().with_api_key("k")
        };
        let scanner = NewsScanner::from_config(&config);
        assert!(scanner.is_configured());
        assert!(scanner.scan("factory fire").await.is_empty());
    }

    #[tokio::test]
    async fn test_tool_formats_headlines() {
        let mut source = MockNewsSource::new();
        source
            .expect_search()
            .returning(|_, _| Ok(vec![NewsArticle::new("Fire at plant", "https://n/1")]));
        let tool = NewsScanTool::new(NewsScanner::new(Arc::new(source), 10));

        let text = tool.call(json!({"query": "factory fire"})).await.unwrap();
        assert_eq!(text, "Title: Fire at plant, URL: https://n/1");
        assert_eq!(tool.definition().name, "news_scanner_tool");
    }

    #[tokio::test]
    async fn test_tool_without_key_reports_no_news() {
        let tool = NewsScanTool::new(NewsScanner::from_config(&NewsConfig::default()));
        let text = tool.call(json!("Taiwan semiconductor")).await.unwrap();
        assert_eq!(text, "No relevant news articles found.");
    }
}
