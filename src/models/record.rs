//! Loosely-shaped project records, as found on disk or on the wire.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::{Category, Project};
use crate::slug::slugify;

/// A project with any field missing or oddly typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient::tag_list")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::date")]
    pub published_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::opaque")]
    pub guide: Option<Value>,
}

impl From<Project> for ProjectRecord {
    fn from(project: Project) -> Self {
        Self {
            slug: Some(project.slug),
            title: Some(project.title),
            description: Some(project.description),
            author: Some(project.author),
            link: Some(project.link),
            image: project.image,
            tags: Some(project.tags),
            category: Some(project.category.as_str().to_string()),
            created_at: project.created_at,
            published_at: project.published_at,
            guide: project.guide,
        }
    }
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        record.complete(&[])
    }
}

fn or_starter<F>(own: Option<String>, starter: Option<&Project>, pick: F) -> String
where
    F: Fn(&Project) -> &str,
{
    own.or_else(|| starter.map(|s| pick(s).to_string()))
        .unwrap_or_default()
}

impl ProjectRecord {
    /// Fill the gaps from the starter with the same slug, then from defaults.
    ///
    /// A missing slug is derived from the title. An unknown category is
    /// inferred from the tags.
    pub fn complete(self, starters: &[Project]) -> Project {
        let slug = self
            .slug
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(self.title.as_deref().unwrap_or_default()));
        let starter = starters.iter().find(|s| s.slug == slug);

        let tags = self
            .tags
            .or_else(|| starter.map(|s| s.tags.clone()))
            .unwrap_or_default();
        let category = self
            .category
            .as_deref()
            .and_then(Category::parse)
            .or_else(|| starter.map(|s| s.category))
            .unwrap_or_else(|| Category::infer_from_tags(&tags));

        Project {
            title: or_starter(self.title, starter, |s| &s.title),
            description: or_starter(self.description, starter, |s| &s.description),
            author: or_starter(self.author, starter, |s| &s.author),
            link: or_starter(self.link, starter, |s| &s.link),
            image: self.image.or_else(|| starter.and_then(|s| s.image.clone())),
            tags,
            category,
            created_at: self.created_at.or_else(|| starter.and_then(|s| s.created_at)),
            published_at: self
                .published_at
                .or_else(|| starter.and_then(|s| s.published_at)),
            guide: self.guide.or_else(|| starter.and_then(|s| s.guide.clone())),
            slug,
        }
    }
}

/// Read each element of a JSON array as a project record.
///
/// Elements that are not objects are skipped with a warning.
pub fn records_from_values(values: Vec<Value>) -> Vec<ProjectRecord> {
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(index, "Skipping unreadable project record: {}", err);
                None
            }
        })
        .collect()
}
