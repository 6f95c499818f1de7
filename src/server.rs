//! HTTP boundary: `POST /identify` takes a multipart `file` field and answers with a
//! species profile, or `{"error": ...}` with the classified status.

use crate::adapters::LocalStorage;
use crate::core::classifier::classify;
use crate::core::engine::IdentificationEngine;
use crate::domain::model::{ImageUpload, SpeciesProfile};
use crate::domain::ports::{BiodiversityRegistry, RecognitionService, Storage};
use crate::utils::error::PlantError;
use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Route prefix under which stored uploads are served back.
pub const UPLOADS_ROUTE: &str = "/uploads";

pub struct AppState<V: RecognitionService, R: BiodiversityRegistry> {
    pub engine: Arc<IdentificationEngine<V, R>>,
    pub uploads: LocalStorage,
    pub started_at: DateTime<Utc>,
}

impl<V: RecognitionService, R: BiodiversityRegistry> AppState<V, R> {
    pub fn new(engine: IdentificationEngine<V, R>, uploads: LocalStorage) -> Self {
        Self {
            engine: Arc::new(engine),
            uploads,
            started_at: Utc::now(),
        }
    }
}

impl<V: RecognitionService, R: BiodiversityRegistry> Clone for AppState<V, R> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            uploads: self.uploads.clone(),
            started_at: self.started_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct IdentifyResponse {
    #[serde(flatten)]
    pub profile: SpeciesProfile,
    /// Where the stored photograph can be fetched, absent when storing it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub reference_entries: usize,
}

/// Failure wrapper turning a `PlantError` into `{"error": msg}` with its status.
#[derive(Debug)]
pub struct ApiError(pub PlantError);

impl From<PlantError> for ApiError {
    fn from(err: PlantError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let report = classify(&self.0);
        let status =
            StatusCode::from_u16(report.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(report.body())).into_response()
    }
}

pub fn build_router<V, R>(state: AppState<V, R>) -> Router
where
    V: RecognitionService + 'static,
    R: BiodiversityRegistry + 'static,
{
    let uploads = ServeDir::new(state.uploads.base_path());

    Router::new()
        .route("/health", get(health::<V, R>))
        .route("/identify", post(identify::<V, R>))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

async fn health<V, R>(State(state): State<AppState<V, R>>) -> Json<HealthResponse>
where
    V: RecognitionService + 'static,
    R: BiodiversityRegistry + 'static,
{
    let uptime = Utc::now().signed_duration_since(state.started_at);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        reference_entries: state.engine.references().len(),
    })
}

async fn identify<V, R>(
    State(state): State<AppState<V, R>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<IdentifyResponse>, ApiError>
where
    V: RecognitionService + 'static,
    R: BiodiversityRegistry + 'static,
{
    let mut multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected non-multipart request: {}", e);
        PlantError::input("No file part")
    })?;

    let upload = read_upload(&mut multipart).await?;
    let profile = state.engine.run(&upload).await?;

    let image_url = store_upload(&state.uploads, &upload).await;

    Ok(Json(IdentifyResponse { profile, image_url }))
}

/// Stores the photograph and returns its public URL. A storage failure is logged and
/// leaves the already resolved profile untouched.
async fn store_upload(uploads: &LocalStorage, upload: &ImageUpload) -> Option<String> {
    let stored_name = upload_name(&upload.filename, Utc::now());
    match uploads.write_file(&stored_name, &upload.bytes).await {
        Ok(path) => {
            tracing::debug!("Upload stored at {}", path);
            Some(format!("{}/{}", UPLOADS_ROUTE, stored_name))
        }
        Err(e) => {
            tracing::warn!("Failed to store upload '{}': {}", upload.filename, e);
            None
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<ImageUpload, PlantError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PlantError::input(format!("Invalid upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.trim().is_empty() {
            return Err(PlantError::input("No selected file"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| PlantError::input(format!("Invalid upload: {}", e)))?;
        return Ok(ImageUpload::new(filename, bytes.to_vec()));
    }

    Err(PlantError::input("No file part"))
}

/// Timestamped, path-free file name for a stored upload.
pub fn upload_name(filename: &str, now: DateTime<Utc>) -> String {
    let base = Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = if sanitized.trim_matches('.').is_empty() {
        "upload".to_string()
    } else {
        sanitized
    };

    format!("{}_{}", now.format("%Y%m%d%H%M%S%3f"), sanitized)
}
