//! Client-side mirror of the project store.
//!
//! The client keeps a cached copy of the collection and degrades instead of
//! failing: an unreachable server means cached (or starter) data, and a
//! failed submission becomes a local record marked as pending.

mod cache;
mod normalize;

pub use cache::*;
pub use normalize::*;

use chrono::{DateTime, Utc};
use reqwest::StatusCode;

use crate::errors::ErrorResponse;
use crate::models::{
    records_from_values, Category, Project, ProjectRecord, ProjectSubmission,
};
use crate::slug::allocate_unique;
use crate::storage::starter_projects;
use crate::validation::{validate, NewProject, ValidationError};

/// Warning attached to records that only exist locally.
pub const LOCAL_ONLY_WARNING: &str =
    "Could not reach the server; the project was saved locally and will be retried";

/// Warning attached to local records the server refused.
pub const REFUSED_WARNING: &str = "The server did not accept the project; it was saved locally";

/// Outcome of a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    Synced { at: DateTime<Utc> },
    /// Showing cached or starter data
    Offline { reason: String },
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced { .. })
    }
}

/// Outcome of a submission that passed local validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Accepted by the server
    Synced(Project),
    /// Kept locally and queued for retry; `warning` carries the server's reason
    LocalOnly { project: Project, warning: String },
}

impl SubmitOutcome {
    pub fn project(&self) -> &Project {
        match self {
            SubmitOutcome::Synced(project) => project,
            SubmitOutcome::LocalOnly { project, .. } => project,
        }
    }
}

/// Result of pushing pending records to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub synced: usize,
    /// Refused by the server; kept locally but no longer retried
    pub rejected: usize,
    pub remaining: usize,
}

/// Sync client error.
#[derive(Debug)]
pub enum SyncError {
    /// Refused locally before any request was made
    Invalid(ValidationError),
    /// The server answered with a 4xx
    Rejected { status: u16, message: String },
    /// The server answered with a 5xx
    Server { status: u16 },
    /// No usable answer from the server
    Transport(reqwest::Error),
}

impl SyncError {
    /// Whether the failure says nothing about the submission itself.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, SyncError::Server { .. } | SyncError::Transport(_))
    }
}

impl std::fmt::Display for SyncError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Invalid(err) => write!(f, "invalid submission: {}", err),
            SyncError::Rejected { status, message } => {
                write!(f, "server rejected request ({}): {}", status, message)
            }
            SyncError::Server { status } => write!(f, "server error ({})", status),
            SyncError::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

impl std::error::Error for SyncError {}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::Transport(err)
    }
}

/// Best-effort mirror of the server collection.
pub struct SyncClient<C: ProjectCache> {
    http: reqwest::Client,
    /// API root, e.g. `http://localhost:4173/api`
    base_url: String,
    cache: C,
    starters: Vec<Project>,
    projects: Vec<Project>,
    pending: Vec<String>,
}

impl<C: ProjectCache> SyncClient<C> {
    pub fn new(base_url: impl Into<String>, cache: C) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, cache)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>, cache: C) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache,
            starters: starter_projects(),
            projects: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Current list in stored order, newest submission first.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, slug: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.slug == slug)
    }

    /// Projects of one category, or all of them for `None`.
    pub fn by_category(&self, category: Option<Category>) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect()
    }

    /// Projects ordered by publication date, newest first.
    pub fn sorted(&self) -> Vec<&Project> {
        let mut sorted: Vec<&Project> = self.projects.iter().collect();
        sorted.sort_by(|a, b| compare_newest_first(a, b));
        sorted
    }

    /// Slugs of local records the server has not accepted yet.
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    /// Reload from the server, falling back to the cache.
    pub async fn refresh(&mut self) -> SyncStatus {
        let local_pending = self.pending_records();

        match self.fetch_remote().await {
            Ok(records) => {
                let remote = normalize_projects(records, &self.starters);
                self.adopt_remote(remote, local_pending);
                self.persist();
                SyncStatus::Synced { at: Utc::now() }
            }
            Err(err) => {
                tracing::warn!("Could not sync with the server, using cached data: {}", err);
                self.load_cached();
                SyncStatus::Offline {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// Submit a project, keeping it locally when the server does not take it.
    ///
    /// Only local validation fails the call. Any remote failure produces a
    /// local-only record queued in [`pending`](Self::pending). A record the
    /// server refused is dropped from the queue by the next
    /// [`retry_pending`](Self::retry_pending) if the server refuses it again.
    pub async fn submit(
        &mut self,
        submission: ProjectSubmission,
    ) -> Result<SubmitOutcome, SyncError> {
        let draft = validate(submission.clone()).map_err(SyncError::Invalid)?;

        match self.create_remote(&submission).await {
            Ok(project) => {
                self.projects.insert(0, project.clone());
                self.persist();
                Ok(SubmitOutcome::Synced(project))
            }
            Err(err) => {
                tracing::warn!("Could not submit project to the server: {}", err);
                let warning = match &err {
                    SyncError::Rejected { message, .. } => {
                        format!("{}: {}", REFUSED_WARNING, message)
                    }
                    _ => LOCAL_ONLY_WARNING.to_string(),
                };

                let project = self.fabricate(draft);
                self.projects.insert(0, project.clone());
                self.pending.push(project.slug.clone());
                self.persist();
                Ok(SubmitOutcome::LocalOnly { project, warning })
            }
        }
    }

    /// Push pending records to the server, oldest first.
    ///
    /// Stops at the first connectivity failure; the rest stay pending.
    pub async fn retry_pending(&mut self) -> RetryReport {
        let mut report = RetryReport::default();

        while let Some(slug) = self.pending.first().cloned() {
            let Some(index) = self.projects.iter().position(|p| p.slug == slug) else {
                self.pending.remove(0);
                continue;
            };

            let submission = ProjectSubmission::from(&self.projects[index]);
            match self.create_remote(&submission).await {
                Ok(project) => {
                    tracing::info!(local = %slug, remote = %project.slug, "Pending project synced");
                    self.projects[index] = project;
                    self.pending.remove(0);
                    report.synced += 1;
                }
                Err(err) if err.is_connectivity() => {
                    tracing::warn!(
                        "Server still unreachable, {} projects pending: {}",
                        self.pending.len(),
                        err
                    );
                    break;
                }
                Err(err) => {
                    tracing::warn!(slug = %slug, "Server refused pending project: {}", err);
                    self.pending.remove(0);
                    report.rejected += 1;
                }
            }
        }

        report.remaining = self.pending.len();
        self.persist();
        report
    }

    fn projects_url(&self) -> String {
        format!("{}/projects", self.base_url)
    }

    async fn fetch_remote(&self) -> Result<Vec<ProjectRecord>, SyncError> {
        let response = self.http.get(self.projects_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        let values: Vec<serde_json::Value> = response.json().await?;
        Ok(records_from_values(values))
    }

    async fn create_remote(&self, submission: &ProjectSubmission) -> Result<Project, SyncError> {
        let response = self
            .http
            .post(self.projects_url())
            .json(submission)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, response).await);
        }
        let record: ProjectRecord = response.json().await?;
        Ok(normalize_record(record, &self.starters))
    }

    /// Build a local-only project for a submission the server never saw.
    fn fabricate(&self, draft: NewProject) -> Project {
        let slug = allocate_unique(self.projects.iter().map(|p| p.slug.as_str()), &draft.title);
        let mut project = draft.into_project(slug, Utc::now());
        project.guide = None;
        project
    }

    /// Local records still waiting for the server, oldest first.
    fn pending_records(&mut self) -> Vec<Project> {
        if self.projects.is_empty() {
            if let Ok(Some(document)) = self.cache.load() {
                self.pending = document.pending;
                self.projects = document.projects;
            }
        }

        self.pending
            .iter()
            .filter_map(|slug| self.projects.iter().find(|p| &p.slug == slug).cloned())
            .collect()
    }

    /// Replace the list with the server's, keeping pending local records on top.
    fn adopt_remote(&mut self, remote: Vec<Project>, local_pending: Vec<Project>) {
        let mut projects = remote;
        let mut pending = Vec::with_capacity(local_pending.len());

        for mut record in local_pending {
            if projects.iter().any(|p| p.slug == record.slug) {
                record.slug =
                    allocate_unique(projects.iter().map(|p| p.slug.as_str()), &record.title);
            }
            pending.push(record.slug.clone());
            projects.insert(0, record);
        }

        self.projects = projects;
        self.pending = pending;
    }

    fn load_cached(&mut self) {
        match self.cache.load() {
            Ok(Some(document)) => {
                let records = document.projects.into_iter().map(ProjectRecord::from);
                self.projects = normalize_projects(records, &self.starters);
                self.pending = document.pending;
            }
            Ok(None) => {
                self.projects = self.starters.clone();
                self.pending.clear();
                self.persist();
            }
            Err(err) => {
                tracing::warn!(
                    "Cached projects are unreadable, using starter projects: {}",
                    err
                );
                self.projects = self.starters.clone();
                self.pending.clear();
            }
        }
    }

    fn persist(&self) {
        let document = CacheDocument {
            projects: self.projects.clone(),
            pending: self.pending.clone(),
        };
        if let Err(err) = self.cache.save(&document) {
            tracing::warn!("Could not write project cache: {}", err);
        }
    }
}

async fn status_error(status: StatusCode, response: reqwest::Response) -> SyncError {
    if status.is_client_error() {
        let message = response
            .json::<ErrorResponse>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| status.to_string());
        SyncError::Rejected {
            status: status.as_u16(),
            message,
        }
    } else {
        SyncError::Server {
            status: status.as_u16(),
        }
    }
}
