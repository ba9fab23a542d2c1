//! HTTP API for the translation service.
//!
//! JSON endpoints for translation, recognition sessions, uploads and
//! feedback, the SSE recognition stream, and static sign media under
//! `/media/<category>/`.

pub mod error;
pub mod handlers;
pub mod stream;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::adapters::MediaRoots;
use crate::app::{SessionManager, SpeechService, Translator};
use crate::domain::MediaCategory;
use crate::ports::{FeedbackStore, ModelRegistry, UploadStore};

pub use error::ApiError;

/// Largest accepted request body (audio and sign uploads).
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Shared state accessible by all API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub translator: Arc<Translator>,
    pub sessions: Arc<SessionManager>,
    pub speech: Arc<SpeechService>,
    pub feedback: Arc<dyn FeedbackStore>,
    pub uploads: Arc<dyn UploadStore>,
    pub models: Arc<dyn ModelRegistry>,
}

fn cors_layer(cors_origins: &[String]) -> CorsLayer {
    let origin = if cors_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS, Method::HEAD])
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE)
}

/// Build the service router.
pub fn build_router(state: ApiState, media: &MediaRoots, cors_origins: &[String]) -> Router {
    let mut router = handlers::routes();
    for category in MediaCategory::ALL {
        router = router.nest_service(
            &format!("/media/{}", category.dir_name()),
            ServeDir::new(media.root(category)),
        );
    }

    router
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
