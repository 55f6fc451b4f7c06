use reqwest::{Client, ClientBuilder};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use std::time::Duration;
use once_cell::sync::Lazy;
use crate::api::models::{ExtractMode, ScrapeRequest};
use crate::error::{AppError, Result};

// Create a static client to reuse connections. Redirects follow reqwest's
// default policy and nothing is cached between requests.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static("Mozilla/5.0 (compatible; MinimalScraper/1.0)"),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    ClientBuilder::new()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build HTTP client")
});

/// Fetch the target page, failing with a distinct error when the upstream
/// answers with a non-success status. The whole send-and-read future is
/// raced against `timeout`; dropping it cancels the in-flight connection.
pub async fn fetch_html(url: &str, timeout: Duration) -> Result<String> {
    let fetch = async {
        let response = CLIENT.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(status.as_u16()));
        }
        let html = response.text().await?;
        Ok(html)
    };

    match tokio::time::timeout(timeout, fetch).await {
        Ok(result) => result,
        Err(_) => Err(AppError::Timeout),
    }
}

/// Run the request's CSS selector over the document and read out up to
/// `max_results` matches in document order.
pub fn extract_items(html: &str, request: &ScrapeRequest) -> Result<Vec<String>> {
    let selector = Selector::parse(&request.selector)
        .map_err(|e| AppError::Unknown(format!("Invalid selector: {}", e)))?;

    let document = Html::parse_document(html);

    let items = document
        .select(&selector)
        .take(request.max_results)
        .map(|element| match request.mode {
            ExtractMode::Text => collapse_whitespace(&element.text().collect::<String>()),
            ExtractMode::Html => element.inner_html(),
            ExtractMode::Attr => {
                // Absent attributes become empty strings, never null
                let name = request.attribute.as_deref().unwrap_or_default();
                element.value().attr(name).unwrap_or_default().to_string()
            }
        })
        .collect();

    Ok(items)
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
