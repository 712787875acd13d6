//! Project API endpoints.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::errors::AppError;
use crate::models::{Project, ProjectSubmission};
use crate::validation::validate;
use crate::AppState;

/// GET /api/projects - List all projects, newest first.
pub async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<Project>>, AppError> {
    let projects = state.store.read_all().await?;
    Ok(Json(projects))
}

/// GET /api/projects/{slug} - Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>, AppError> {
    state
        .store
        .get_project(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Project {} not found", slug)))
}

/// POST /api/projects - Submit a new project.
///
/// The body is taken as raw bytes so malformed JSON maps to a 400 with our
/// own error body instead of the extractor's rejection.
pub async fn create_project(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Project>), AppError> {
    let submission = ProjectSubmission::from_body(&body)?;

    let draft = validate(submission).map_err(|e| {
        tracing::debug!("Rejected submission: {}", e);
        AppError::from(e)
    })?;

    let project = state.store.create_project(draft).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// Any other path under /api.
pub async fn unknown_endpoint() -> AppError {
    AppError::NotFound("Unknown API endpoint".to_string())
}
