use axum::{
    routing::{get, post},
    Json,
    Router,
    body::Bytes,
    extract::State,
    response::{Html, IntoResponse},
};
use serde_json::{Map, Value};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::api::models::{ScrapeMeta, ScrapeRequest, ScrapeResponse};
use crate::scraper::{extract_items, fetch_html};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/scrape", post(scrape_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}

async fn health_handler() -> &'static str {
    "OK"
}

async fn scrape_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    // A body that is not valid JSON is treated as an empty payload and
    // falls out through URL validation
    let payload: Value =
        serde_json::from_slice(&body).unwrap_or_else(|_| Value::Object(Map::new()));

    match process_scrape_request(&state, &payload).await {
        Ok(response) => Json(response).into_response(),
        Err(err) => {
            tracing::warn!("Scrape failed: {}", err);
            err.into_response()
        }
    }
}

async fn process_scrape_request(state: &AppState, payload: &Value) -> Result<ScrapeResponse> {
    let request = ScrapeRequest::from_payload(payload)?;
    tracing::info!("Scraping {} with selector {:?}", request.url, request.selector);

    let html = fetch_html(&request.url, state.config.fetch_timeout).await?;
    let items = extract_items(&html, &request)?;
    let count = items.len();

    Ok(ScrapeResponse {
        items,
        meta: ScrapeMeta {
            url: request.url,
            selector: request.selector,
            attribute: request.attribute,
            count,
        },
    })
}
