use serde::Serialize;
use serde_json::Value;
use url::Url;
use crate::error::{AppError, Result};

pub const DEFAULT_MAX_RESULTS: usize = 10;
pub const MAX_RESULTS_CAP: usize = 200;

/// What gets read out of each matched element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Text,
    Html,
    Attr,
}

/// A validated scrape request. The inbound body carries no guaranteed
/// schema, so instances are only built through [`ScrapeRequest::from_payload`].
#[derive(Debug)]
pub struct ScrapeRequest {
    pub url: String,
    pub selector: String,
    pub mode: ExtractMode,
    pub attribute: Option<String>,
    pub max_results: usize,
}

impl ScrapeRequest {
    pub fn from_payload(payload: &Value) -> Result<Self> {
        let url = payload.get("url").and_then(Value::as_str).unwrap_or_default();
        if !is_http_url(url) {
            return Err(AppError::Validation("Invalid or missing url".to_string()));
        }

        let selector = payload
            .get("selector")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if selector.trim().is_empty() {
            return Err(AppError::Validation("Invalid or missing selector".to_string()));
        }

        let mode = match payload.get("mode") {
            None | Some(Value::Null) => ExtractMode::Text,
            Some(Value::String(raw)) => match raw.as_str() {
                "text" => ExtractMode::Text,
                "html" => ExtractMode::Html,
                "attr" => ExtractMode::Attr,
                _ => return Err(AppError::Validation("Invalid mode".to_string())),
            },
            Some(_) => return Err(AppError::Validation("Invalid mode".to_string())),
        };

        let attribute = if mode == ExtractMode::Attr {
            let attribute = payload
                .get("attribute")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();
            if attribute.is_empty() {
                return Err(AppError::Validation(
                    "Attribute name required for attr mode".to_string(),
                ));
            }
            Some(attribute.to_string())
        } else {
            None
        };

        // Numbers (and numeric strings) are clamped into [1, cap]; anything
        // else falls back to the default
        let max_results = match payload.get("maxResults") {
            Some(Value::Number(n)) => n.as_f64().map(clamp_max_results).unwrap_or(DEFAULT_MAX_RESULTS),
            Some(Value::String(raw)) => raw
                .trim()
                .parse::<f64>()
                .map(clamp_max_results)
                .unwrap_or(DEFAULT_MAX_RESULTS),
            _ => DEFAULT_MAX_RESULTS,
        };

        Ok(ScrapeRequest {
            url: url.to_string(),
            selector: selector.to_string(),
            mode,
            attribute,
            max_results,
        })
    }
}

fn is_http_url(raw: &str) -> bool {
    match Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

fn clamp_max_results(raw: f64) -> usize {
    if !raw.is_finite() {
        return DEFAULT_MAX_RESULTS;
    }
    raw.clamp(1.0, MAX_RESULTS_CAP as f64) as usize
}

#[derive(Serialize)]
pub struct ScrapeResponse {
    pub items: Vec<String>,
    pub meta: ScrapeMeta,
}

/// Request parameters echoed back alongside the items. `attribute`
/// serializes as `null` outside attr mode.
#[derive(Serialize)]
pub struct ScrapeMeta {
    pub url: String,
    pub selector: String,
    pub attribute: Option<String>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_payload_gets_defaults() {
        let req = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "h1",
        }))
        .unwrap();

        assert_eq!(req.mode, ExtractMode::Text);
        assert_eq!(req.attribute, None);
        assert_eq!(req.max_results, DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn missing_url_is_rejected() {
        let err = ScrapeRequest::from_payload(&json!({ "selector": "h1" })).unwrap_err();
        assert_eq!(err.to_string(), "Invalid or missing url");
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        for url in ["not-a-url", "ftp://example.com/file", "javascript:alert(1)"] {
            let err = ScrapeRequest::from_payload(&json!({ "url": url, "selector": "h1" }))
                .unwrap_err();
            assert_eq!(err.to_string(), "Invalid or missing url");
        }
    }

    #[test]
    fn blank_selector_is_rejected() {
        for selector in [json!(""), json!("   "), json!(null)] {
            let err = ScrapeRequest::from_payload(&json!({
                "url": "https://example.com",
                "selector": selector,
            }))
            .unwrap_err();
            assert_eq!(err.to_string(), "Invalid or missing selector");
        }
    }

    #[test]
    fn attr_mode_requires_attribute() {
        let err = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "a",
            "mode": "attr",
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Attribute name required for attr mode");

        let err = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "a",
            "mode": "attr",
            "attribute": "  ",
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Attribute name required for attr mode");
    }

    #[test]
    fn attribute_is_dropped_outside_attr_mode() {
        let req = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "a",
            "mode": "html",
            "attribute": "href",
        }))
        .unwrap();
        assert_eq!(req.attribute, None);
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let err = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "h1",
            "mode": "xpath",
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid mode");
    }

    #[test]
    fn max_results_is_clamped() {
        let cases = [
            (json!(500), MAX_RESULTS_CAP),
            (json!(0), 1),
            (json!(-3), 1),
            (json!(25), 25),
        ];
        for (raw, expected) in cases {
            let req = ScrapeRequest::from_payload(&json!({
                "url": "https://example.com",
                "selector": "h1",
                "maxResults": raw,
            }))
            .unwrap();
            assert_eq!(req.max_results, expected);
        }
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let req = ScrapeRequest::from_payload(&json!({
            "url": "https://example.com",
            "selector": "h1",
            "maxResults": "42",
        }))
        .unwrap();
        assert_eq!(req.max_results, 42);
    }

    #[test]
    fn non_numeric_max_results_falls_back_to_default() {
        for raw in [json!("lots"), json!(true), json!([5]), json!(null)] {
            let req = ScrapeRequest::from_payload(&json!({
                "url": "https://example.com",
                "selector": "h1",
                "maxResults": raw,
            }))
            .unwrap();
            assert_eq!(req.max_results, DEFAULT_MAX_RESULTS);
        }
    }
}
