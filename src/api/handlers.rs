//! HTTP request handlers.

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::{stream, ApiError, ApiState};
use crate::domain::{DomainError, FeedbackStats, SignLanguage};

/// Build all API routes.
pub fn routes() -> Router<ApiState> {
    Router::new()
        // Recognition session
        .route("/select_language", post(select_language))
        .route("/start_stream", get(stream::start_stream))
        .route("/stop_stream", post(stop_stream))
        .route("/models", get(models))
        // Translation
        .route("/translate_text", post(translate_text))
        .route("/speech_to_text", post(speech_to_text))
        .route("/process_audio", post(process_audio))
        // User contributions
        .route("/feedback", post(feedback))
        .route("/feedback/stats", get(feedback_stats))
        .route("/upload_sign", post(upload_sign))
        .route("/check_upload_dirs", get(check_upload_dirs))
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "File not found" }))).into_response()
}

/// Uploaded file part of a multipart form.
struct FormFile {
    file_name: String,
    data: Bytes,
}

/// A fully read multipart form: file parts and text fields by name.
#[derive(Default)]
struct Form {
    files: HashMap<String, FormFile>,
    fields: HashMap<String, String>,
}

impl Form {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let invalid =
            |e: axum::extract::multipart::MultipartError| DomainError::Validation(e.body_text());

        let mut form = Form::default();
        while let Some(field) = multipart.next_field().await.map_err(invalid)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let data = field.bytes().await.map_err(invalid)?;
                    form.files.insert(name, FormFile { file_name, data });
                }
                None => {
                    let value = field.text().await.map_err(invalid)?;
                    form.fields.insert(name, value);
                }
            }
        }
        Ok(form)
    }

    fn file(&mut self, name: &str) -> Option<FormFile> {
        self.files.remove(name)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Recognition language for an upload: a sign language name, otherwise ASL.
fn speech_language(requested: &str) -> SignLanguage {
    SignLanguage::from_str(requested).unwrap_or(SignLanguage::Asl)
}

#[derive(Debug, Deserialize)]
struct SelectLanguageRequest {
    #[serde(default)]
    language: String,
}

async fn select_language(
    State(state): State<ApiState>,
    payload: Result<Json<SelectLanguageRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let status = state.sessions.select_language(&req.language).await?;
    Ok(Json(json!({ "status": status })))
}

async fn stop_stream(State(state): State<ApiState>) -> Json<Value> {
    state.sessions.stop_stream().await;
    Json(json!({ "status": "stopped" }))
}

async fn models(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "session": state.sessions.status(),
        "models_dir": state.models.models_dir(),
        "models": state.models.statuses(),
    }))
}

fn default_sign_language() -> String {
    SignLanguage::Asl.as_str().to_string()
}

#[derive(Debug, Deserialize)]
struct TranslateRequest {
    #[serde(default)]
    text: String,
    #[serde(default = "default_sign_language")]
    language: String,
}

async fn translate_text(
    State(state): State<ApiState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let language = SignLanguage::from_str(&req.language)?;
    let result = state.translator.translate(&req.text, language)?;
    Ok(Json(json!({
        "video_paths": result.signs,
        "expressions": result.expressions,
        "context": result.context,
    })))
}

fn speech_ready() -> Response {
    Json(json!({
        "status": "ready",
        "message": "Use Web Speech API or upload audio file",
    }))
    .into_response()
}

/// Without a multipart upload this only reports readiness.
async fn speech_to_text(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let Ok(multipart) = multipart else {
        return speech_ready();
    };
    let mut form = match Form::read(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };
    let Some(audio) = form.file("audio") else {
        return speech_ready();
    };

    let requested = form.field("language").unwrap_or("en-US").to_string();
    match state
        .speech
        .transcribe(&audio.data, speech_language(&requested))
        .await
    {
        Ok(transcript) => Json(json!({
            "text": transcript.text,
            "language": requested,
            "method": transcript.method,
        }))
        .into_response(),
        Err(e) => {
            error!(file = %audio.file_name, error = %e, "Speech recognition failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Speech recognition failed: {}", e) })),
            )
                .into_response()
        }
    }
}

async fn process_audio(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut form = Form::read(multipart?).await?;
    let audio = form
        .file("audio")
        .ok_or_else(|| DomainError::Validation("No audio file provided".to_string()))?;
    let language = form
        .field("language")
        .map(speech_language)
        .unwrap_or(SignLanguage::Asl);

    let processed = state.speech.process(&audio.data, language).await?;
    Ok(Json(json!(processed)))
}

#[derive(Debug, Deserialize)]
struct FeedbackRequest {
    original: Option<String>,
    correction: Option<String>,
}

/// Always answers 200; the outcome is in `status`.
async fn feedback(
    State(state): State<ApiState>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Json<Value> {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "Unreadable feedback request");
            return Json(json!({ "status": false, "error": rejection.body_text() }));
        }
    };
    let original = req.original.unwrap_or_default();
    let correction = req.correction.unwrap_or_default();
    if original.is_empty() || correction.is_empty() {
        return Json(json!({ "status": false, "error": "Missing required fields" }));
    }

    let context = state.translator.analyze(&original);
    match state.feedback.record(&original, &correction, Some(context)).await {
        Ok(_) => Json(json!({ "status": true })),
        Err(e) => {
            warn!(error = %e, "Feedback not saved");
            Json(json!({ "status": false, "error": "Failed to save feedback" }))
        }
    }
}

async fn feedback_stats(State(state): State<ApiState>) -> Result<Json<FeedbackStats>, ApiError> {
    Ok(Json(state.feedback.stats().await?))
}

async fn upload_sign(
    State(state): State<ApiState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut form = Form::read(multipart?).await?;
    let file = form
        .file("file")
        .ok_or_else(|| DomainError::Validation("No file provided".to_string()))?;
    if file.file_name.is_empty() {
        return Err(DomainError::Validation("No file selected".to_string()).into());
    }

    let word = form.field("word").unwrap_or_default();
    let language = SignLanguage::from_str(form.field("language").unwrap_or_default())?;
    let file_type = form.field("type").unwrap_or("video");

    let record = state
        .uploads
        .store(language, word, &file.file_name, file_type, &file.data)
        .await?;
    info!(path = ?record.path, "Upload accepted");

    Ok(Json(json!({
        "success": true,
        "message": "Upload successful",
        "path": record.path,
    })))
}

async fn check_upload_dirs(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let report = state.uploads.check().await?;
    Ok(Json(json!(report)))
}
