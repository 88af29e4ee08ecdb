//! HTTP surface: `GET /health` and `POST /scrape`.

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::SERVICE_NAME;
use crate::error::ScraperError;
use crate::service::ScraperService;
use crate::traits::SessionLauncher;
use crate::types::{ScrapePayload, ScrapeRequest};

const BODY_LIMIT_BYTES: usize = 50 * 1024 * 1024;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScrapeResponse {
    success: bool,
    content: String,
    extracted_at: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'static str>,
}

impl IntoResponse for ScraperError {
    fn into_response(self) -> Response {
        if self.is_validation() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: self.to_string(),
                    code: None,
                }),
            )
                .into_response();
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
                code: Some(self.code()),
            }),
        )
            .into_response()
    }
}

pub fn router<L: SessionLauncher + 'static>(service: ScraperService<L>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/scrape", post(scrape_handler::<L>))
        .with_state(service)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
    })
}

async fn scrape_handler<L: SessionLauncher + 'static>(
    State(service): State<ScraperService<L>>,
    payload: Result<Json<ScrapePayload>, JsonRejection>,
) -> Response {
    let payload = match payload {
        Ok(Json(payload)) => payload,
        // A body-less POST is just a request without a URL.
        Err(JsonRejection::MissingJsonContentType(_)) => ScrapePayload::default(),
        Err(rejection) => {
            warn!("Rejected scrape body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: rejection.body_text(),
                    code: None,
                }),
            )
                .into_response();
        }
    };

    let request = match ScrapeRequest::try_from(payload) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match service.oneshot(request).await {
        Ok(result) => Json(ScrapeResponse {
            success: true,
            extracted_at: result.extracted_at_iso(),
            content: result.content,
        })
        .into_response(),
        Err(e) => {
            error!("[Scraper] Error: {}", e);
            e.into_response()
        }
    }
}
