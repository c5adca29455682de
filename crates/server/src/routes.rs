use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_TYPE, ETAG};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use taplist_ocr::OcrBackend;
use tower_http::trace::TraceLayer;

use crate::fetch::ImageSource;
use crate::service::TapListService;

pub fn router<S, R>(service: Arc<TapListService<S, R>>) -> Router
where
    S: ImageSource + 'static,
    R: OcrBackend + 'static,
{
    Router::new()
        .route("/", get(get_taps::<S, R>))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// `GET /` — the current tap list as a JSON array.
async fn get_taps<S, R>(State(service): State<Arc<TapListService<S, R>>>) -> Response
where
    S: ImageSource + 'static,
    R: OcrBackend + 'static,
{
    match service.current().await {
        Ok(document) => {
            let mut response = document.payload.clone().into_response();
            let headers = response.headers_mut();
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            if let Ok(etag) = HeaderValue::from_str(&document.fingerprint) {
                headers.insert(ETAG, etag);
            }
            response
        }
        Err(e) => {
            tracing::error!("no tap list available: {e}");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
