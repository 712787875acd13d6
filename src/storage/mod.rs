//! File-backed project store.
//!
//! The whole collection lives in one pretty-printed JSON document. Reads and
//! writes always move the entire collection; there is no partial update.

mod seed;

pub use seed::starter_projects;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{records_from_values, Project};
use crate::slug::allocate_unique;
use crate::validation::NewProject;

/// Owner of the project document on disk.
pub struct ProjectStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles in `create_project`
    write_lock: Mutex<()>,
    recoveries: AtomicU64,
    tmp_counter: AtomicU64,
}

impl ProjectStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            recoveries: AtomicU64::new(0),
            tmp_counter: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of times a corrupt document was replaced by the starter set.
    pub fn recoveries(&self) -> u64 {
        self.recoveries.load(Ordering::Relaxed)
    }

    /// Make sure a readable document exists, seeding or reseeding it if not.
    pub async fn ensure(&self) -> Result<(), AppError> {
        self.load().await.map(|_| ())
    }

    /// Read the full collection in stored order.
    pub async fn read_all(&self) -> Result<Vec<Project>, AppError> {
        self.load().await
    }

    /// Replace the whole document with `projects`.
    ///
    /// The new content is written to a sibling file and renamed into place.
    /// No lock is taken: overlapping callers each win or lose as a whole.
    pub async fn write_all(&self, projects: &[Project]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(projects)
            .map_err(|e| AppError::Internal(format!("Failed to encode projects: {}", e)))?;

        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(format!(".tmp-{}", n));
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, json).await?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            tokio::fs::remove_file(&tmp_path).await.ok();
            return Err(err.into());
        }
        Ok(())
    }

    /// Find a single project by slug.
    pub async fn get_project(&self, slug: &str) -> Result<Option<Project>, AppError> {
        let projects = self.read_all().await?;
        Ok(projects.into_iter().find(|p| p.slug == slug))
    }

    /// Assign a unique slug to `draft` and prepend it to the collection.
    pub async fn create_project(&self, draft: NewProject) -> Result<Project, AppError> {
        let _guard = self.write_lock.lock().await;

        let mut projects = self.read_all().await?;
        let slug = allocate_unique(projects.iter().map(|p| p.slug.as_str()), &draft.title);
        let project = draft.into_project(slug, Utc::now());

        projects.insert(0, project.clone());
        self.write_all(&projects).await?;

        tracing::info!(slug = %project.slug, total = projects.len(), "Project created");
        Ok(project)
    }

    async fn load(&self) -> Result<Vec<Project>, AppError> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::info!("Seeding project store at {:?}", self.path);
                return self.reseed().await;
            }
            Err(err) => return Err(err.into()),
        };

        let document = match serde_json::from_slice::<Value>(&content) {
            Ok(document) => document,
            Err(err) => {
                let count = self.recoveries.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::warn!(
                    target: "showcase::storage",
                    path = ?self.path,
                    error = %err,
                    recoveries = count,
                    "Project store is unreadable, replacing it with starter projects"
                );
                return self.reseed().await;
            }
        };

        match document {
            Value::Array(items) => Ok(records_from_values(items)
                .into_iter()
                .map(Project::from)
                .collect()),
            other => Err(AppError::Internal(format!(
                "Project document at {:?} holds {} instead of a list",
                self.path,
                json_kind(&other)
            ))),
        }
    }

    async fn reseed(&self) -> Result<Vec<Project>, AppError> {
        let seeds = starter_projects();
        self.write_all(&seeds).await?;
        Ok(seeds)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::TempDir;

    use super::*;
    use crate::models::{Category, ProjectSubmission};
    use crate::validation::validate;

    fn store_in(dir: &TempDir) -> ProjectStore {
        ProjectStore::new(dir.path().join("storage").join("projects.json"))
    }

    fn draft(title: &str) -> NewProject {
        validate(ProjectSubmission {
            title: Some(title.to_string()),
            description: Some("Built during the spring sprint".to_string()),
            author: Some("Quang".to_string()),
            link: Some("https://example.com".to_string()),
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_first_read_seeds_starter_set() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let projects = store.read_all().await.unwrap();
        assert_eq!(projects, starter_projects());
        assert!(store.path().exists());
        assert_eq!(store.recoveries(), 0);
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.ensure().await.unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"slug\": \"ecocycle\""));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reseeded() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.ensure().await.unwrap();
        std::fs::write(store.path(), "{ definitely not json").unwrap();

        let projects = store.read_all().await.unwrap();
        assert_eq!(projects, starter_projects());
        assert_eq!(store.recoveries(), 1);

        let reread = store.read_all().await.unwrap();
        assert_eq!(reread, projects);
        assert_eq!(store.recoveries(), 1);
    }

    #[tokio::test]
    async fn test_foreign_document_survives_read() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        let document = serde_json::json!([
            {
                "slug": "poster-lab",
                "title": "Poster Lab",
                "description": "Risograph posters",
                "author": "Vy",
                "link": "https://example.com/posters",
                "tags": ["print", "design"],
                "category": "design",
                "publishedAt": "2024-05-01T09:00:00.000Z",
                "guide": { "highlights": "one line", "video": "v" }
            },
            { "slug": "bare" }
        ]);
        std::fs::write(store.path(), document.to_string()).unwrap();

        let projects = store.read_all().await.unwrap();
        assert_eq!(store.recoveries(), 0);
        let slugs: Vec<&str> = projects.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["poster-lab", "bare"]);
        assert_eq!(projects[0].category, Category::Web);
        assert_eq!(
            projects[0].published_at,
            chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(
            projects[0].guide,
            Some(serde_json::json!({ "highlights": "one line", "video": "v" }))
        );

        let created = store.create_project(draft("Zine Shelf")).await.unwrap();
        let after = store.read_all().await.unwrap();
        assert_eq!(after.len(), 3);
        assert_eq!(after[0], created);
        assert_eq!(after[1].guide, projects[0].guide);
    }

    #[tokio::test]
    async fn test_non_list_document_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"projects": []}"#).unwrap();

        assert!(store.read_all().await.is_err());
        assert_eq!(store.recoveries(), 0);
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, r#"{"projects": []}"#);
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.create_project(draft("Campus Radio")).await.unwrap();

        let before = store.read_all().await.unwrap();
        store.write_all(&before).await.unwrap();
        let after = store.read_all().await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_create_prepends_and_allocates_unique_slugs() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let first = store.create_project(draft("Mentor Radar")).await.unwrap();
        let second = store.create_project(draft("Mentor Radar")).await.unwrap();
        assert_eq!(first.slug, "mentor-radar-2");
        assert_eq!(second.slug, "mentor-radar-3");

        let projects = store.read_all().await.unwrap();
        assert_eq!(projects.len(), 5);
        assert_eq!(projects[0].slug, "mentor-radar-3");
        assert_eq!(projects[1].slug, "mentor-radar-2");
        assert!(projects[0].created_at.is_some());

        let found = store.get_project("mentor-radar-2").await.unwrap();
        assert_eq!(found, Some(first));
        assert!(store.get_project("missing").await.unwrap().is_none());
    }

    /// Two raw read-modify-write cycles from the same snapshot lose one
    /// update. Guards the documented behavior of the unlocked primitives.
    #[tokio::test]
    async fn test_unlocked_read_modify_write_can_lose_update() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut snapshot_a = store.read_all().await.unwrap();
        let mut snapshot_b = store.read_all().await.unwrap();

        snapshot_a.insert(0, draft("Alpha").into_project("alpha".into(), Utc::now()));
        snapshot_b.insert(0, draft("Beta").into_project("beta".into(), Utc::now()));

        store.write_all(&snapshot_a).await.unwrap();
        store.write_all(&snapshot_b).await.unwrap();

        let slugs: Vec<String> = store
            .read_all()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert!(slugs.contains(&"beta".to_string()));
        assert!(!slugs.contains(&"alpha".to_string()));
    }

    #[tokio::test]
    async fn test_concurrent_creates_all_persist() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store_in(&dir));
        store.ensure().await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let title = if i % 2 == 0 { "Shared Title" } else { "Other Title" };
                    store.create_project(draft(title)).await.unwrap()
                })
            })
            .collect();

        let mut created = Vec::new();
        for handle in handles {
            created.push(handle.await.unwrap().slug);
        }

        let projects = store.read_all().await.unwrap();
        assert_eq!(projects.len(), 3 + 8);
        for slug in &created {
            assert_eq!(projects.iter().filter(|p| &p.slug == slug).count(), 1);
        }
    }
}
