use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::pages;
use super::AppState;
use crate::bsky::FetchError;
use crate::config::AuthStrategy;
use crate::ranking::{self, DisplayPost, SearchParams};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/api/search", get(api_search))
        .route("/api/health", get(api_health))
}

/// Query parameters shared by the UI and the JSON API.
///
/// Numeric fields deserialize as raw strings so garbage coerces to defaults
/// instead of rejecting the request.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: Option<String>,
    hours: Option<String>,
    #[serde(rename = "minReposts")]
    min_reposts: Option<String>,
    limit: Option<String>,
}

impl SearchQuery {
    fn query(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    fn params(&self) -> SearchParams {
        SearchParams::coerce(
            self.hours.as_deref(),
            self.min_reposts.as_deref(),
            self.limit.as_deref(),
        )
    }
}

/// Why a search could not be served.
enum SearchFailure {
    MissingCredentials,
    Fetch(FetchError),
}

impl SearchFailure {
    fn message(&self) -> String {
        match self {
            Self::MissingCredentials => "Server missing Bluesky credentials".to_string(),
            Self::Fetch(e) => e.to_string(),
        }
    }
}

/// Fetch and rank posts for a validated query.
async fn run_search(
    state: &AppState,
    query: &str,
    params: &SearchParams,
) -> Result<Vec<DisplayPost>, SearchFailure> {
    if state.config.auth == AuthStrategy::Session && !state.bsky.has_credentials() {
        return Err(SearchFailure::MissingCredentials);
    }

    let raw = state
        .bsky
        .search_posts(query, params.limit)
        .await
        .map_err(SearchFailure::Fetch)?;

    Ok(ranking::rank(raw, params, Utc::now()))
}

// ========== HTML Routes ==========

async fn home(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let params = query.params();
    let Some(q) = query.query() else {
        return Html(pages::render_home("", &params, None).into_string()).into_response();
    };

    let outcome = run_search(&state, q, &params).await.map_err(|e| {
        tracing::error!("Bluesky search failed: {}", e.message());
        e.message()
    });

    Html(pages::render_home(q, &params, Some(outcome)).into_string()).into_response()
}

// ========== JSON API Routes ==========

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    posts: Vec<DisplayPost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn api_search(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    let Some(q) = query.query() else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Search query required (q)".to_string(),
            }),
        )
            .into_response();
    };

    let params = query.params();
    let posts = match run_search(&state, q, &params).await {
        Ok(posts) => posts,
        Err(e) => {
            tracing::error!("Bluesky search failed: {}", e.message());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody { error: e.message() }),
            )
                .into_response();
        }
    };

    let message = posts.is_empty().then(|| "No posts found".to_string());
    Json(SearchResponse { posts, message }).into_response()
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    #[serde(rename = "hasIdentifier")]
    has_identifier: bool,
    #[serde(rename = "hasPassword")]
    has_password: bool,
}

async fn api_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        has_identifier: state.config.identifier.is_some(),
        has_password: state.config.app_password.is_some(),
    })
}
