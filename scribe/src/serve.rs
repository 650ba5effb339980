//! Serve subcommand - HTTP job server for caption generation.
//!
//! `POST /upload` takes a recognizer JSON dump as the request body and starts a
//! background job. `GET /status/{job_id}` reports the job's progress and
//! `GET /download/{job_id}` returns the finished SRT, or the JSON transcript with
//! `?format=json`. Jobs live in memory for the lifetime of the server.

use axum::extract::{DefaultBodyLimit, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use eyre::{Context, Result};
use scribe_core::format::OutputFormat;
use scribe_core::segment::Segmenter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex, PoisonError};
use tower_http::cors::{self, CorsLayer};
use uuid::Uuid;

/// Largest accepted recognizer dump.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// CLI arguments for the job server.
#[derive(clap::Args, Debug)]
pub struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, default_value_t = 8000)]
    pub port: u16,
}

/// Resolved configuration for the job server.
#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            addr: SocketAddr::new(args.host, args.port),
        }
    }
}

pub fn execute(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .wrap_err("failed to start async runtime")?;

    runtime.block_on(serve(config.addr))
}

async fn serve(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("failed to bind {addr}"))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(AppState::default()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
    }
    tracing::info!("shutting down");
}

/// Build the HTTP routes over a job table.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/upload", post(upload))
        .route("/status/{job_id}", get(status))
        .route("/download/{job_id}", get(download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(cors::Any)
                .allow_methods(cors::Any)
                .allow_headers(cors::Any),
        )
        .with_state(state)
}

/// Lifecycle of a caption job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Processing,
    Completed,
    Error,
}

#[derive(Debug, Default)]
struct Job {
    status: JobStatus,
    /// Percent complete
    progress: u8,
    error: Option<String>,
    /// Base name of downloaded files
    name: String,
    artifacts: HashMap<OutputFormat, String>,
}

/// Shared job table, keyed by job id.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    jobs: Arc<Mutex<HashMap<Uuid, Job>>>,
}

impl AppState {
    fn insert(&self, id: Uuid, job: Job) {
        self.lock().insert(id, job);
    }

    fn update(&self, id: Uuid, f: impl FnOnce(&mut Job)) {
        if let Some(job) = self.lock().get_mut(&id) {
            f(job);
        }
    }

    fn with_job<T>(&self, id: Uuid, f: impl FnOnce(&Job) -> T) -> Option<T> {
        self.lock().get(&id).map(f)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, Job>> {
        // a panicking job leaves the table itself consistent
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caption `json` and render every output format for job `id`.
    fn process(&self, id: Uuid, json: &str, segmenter: Option<Segmenter>) {
        self.update(id, |job| {
            job.status = JobStatus::Processing;
            job.progress = 10;
        });

        let result = crate::cap::caption(json, segmenter)
            .map_err(|e| describe(&e))
            .and_then(|transcript| {
                self.update(id, |job| job.progress = 70);

                OutputFormat::ALL
                    .into_iter()
                    .map(|format| format.render(&transcript).map(|content| (format, content)))
                    .collect::<scribe_core::error::Result<HashMap<_, _>>>()
                    .map_err(|e| describe(&e))
            });

        match result {
            Ok(artifacts) => {
                tracing::info!(%id, "job completed");
                self.update(id, |job| {
                    job.status = JobStatus::Completed;
                    job.progress = 100;
                    job.artifacts = artifacts;
                });
            }
            Err(error) => {
                tracing::warn!(%id, %error, "job failed");
                self.update(id, |job| {
                    job.status = JobStatus::Error;
                    job.error = Some(error);
                });
            }
        }
    }
}

/// Error message followed by its causes.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    std::iter::successors(Some(err), |e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("Job not completed yet")]
    NotCompleted,

    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotCompleted | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(serde_json::json!({ "detail": self.to_string() }))).into_response()
    }
}

fn job_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| ApiError::NotFound("Job not found"))
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "scribe caption API" }))
}

#[derive(Debug, Default, Deserialize)]
struct UploadParams {
    max_words: Option<usize>,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
struct Uploaded {
    job_id: Uuid,
    status: JobStatus,
    message: &'static str,
}

async fn upload(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: String,
) -> Result<Json<Uploaded>, ApiError> {
    if body.trim().is_empty() {
        return Err(ApiError::BadRequest("No recognition provided".to_string()));
    }

    let segmenter = params
        .max_words
        .map(Segmenter::new)
        .transpose()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let name = params.name.unwrap_or_else(|| "transcript".to_string());
    if name.is_empty() || name.contains(['/', '\\', '"']) {
        return Err(ApiError::BadRequest(format!("invalid name: {name:?}")));
    }

    let id = Uuid::new_v4();
    state.insert(
        id,
        Job {
            name,
            ..Job::default()
        },
    );
    tracing::info!(%id, bytes = body.len(), max_words = params.max_words, "job queued");

    let worker = state.clone();
    tokio::task::spawn_blocking(move || worker.process(id, &body, segmenter));

    Ok(Json(Uploaded {
        job_id: id,
        status: JobStatus::Pending,
        message: "Recognition uploaded successfully",
    }))
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    status: JobStatus,
    progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
}

async fn status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<StatusResponse>, ApiError> {
    let id = job_id(&raw_id)?;

    state
        .with_job(id, |job| StatusResponse {
            status: job.status,
            progress: job.progress,
            error: job.error.clone(),
            filename: (job.status == JobStatus::Completed)
                .then(|| format!("{}.{}", job.name, OutputFormat::Srt.extension())),
        })
        .map(Json)
        .ok_or(ApiError::NotFound("Job not found"))
}

#[derive(Debug, Default, Deserialize)]
struct DownloadParams {
    format: Option<String>,
}

async fn download(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Result<Response, ApiError> {
    let id = job_id(&raw_id)?;
    let format = match params.format {
        Some(name) => name
            .parse::<OutputFormat>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => OutputFormat::Srt,
    };

    let (filename, content) = state
        .with_job(id, |job| {
            if job.status != JobStatus::Completed {
                return Err(ApiError::NotCompleted);
            }
            let content = job
                .artifacts
                .get(&format)
                .cloned()
                .ok_or(ApiError::NotFound("Transcript not found"))?;
            Ok((format!("{}.{}", job.name, format.extension()), content))
        })
        .ok_or(ApiError::NotFound("Job not found"))??;

    let content_type = match format {
        OutputFormat::Json => "application/json",
        OutputFormat::Srt => "text/plain; charset=utf-8",
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        content,
    )
        .into_response())
}
