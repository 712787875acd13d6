//! Project model, the single persisted entity of the showcase.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::lenient::scalar_text;
use super::ProjectRecord;

/// Number of tags shown on a project card.
pub const DISPLAY_TAG_LIMIT: usize = 3;

/// Broad grouping used by the front end filters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Web,
    Mobile,
    Ai,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Web => "web",
            Category::Mobile => "mobile",
            Category::Ai => "ai",
        }
    }

    /// Case-insensitive parse; unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "web" => Some(Category::Web),
            "mobile" => Some(Category::Mobile),
            "ai" => Some(Category::Ai),
            _ => None,
        }
    }

    /// Guess a category from tag text. Rules are checked in order.
    pub fn infer_from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let joined = tags
            .iter()
            .map(|t| t.as_ref())
            .collect::<Vec<_>>()
            .join(",")
            .to_lowercase();

        if joined.contains("mobile") {
            Category::Mobile
        } else if joined.contains("ai") || joined.contains("ml") {
            Category::Ai
        } else {
            Category::Web
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a build guide.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GuideStep {
    pub title: String,
    pub detail: String,
}

/// A link attached to a build guide.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct GuideResource {
    pub label: String,
    pub url: String,
}

/// The long-form "how we built it" narrative of a project, as rendered.
///
/// Projects store their guide as raw JSON; this is the view read out of it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Guide {
    pub intro: String,
    pub highlights: Vec<String>,
    pub steps: Vec<GuideStep>,
    pub resources: Vec<GuideResource>,
}

fn field_text(value: &Value, key: &str) -> String {
    value.get(key).and_then(scalar_text).unwrap_or_default()
}

fn objects<'a>(value: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> + 'a {
    value
        .get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

impl Guide {
    /// Read a stored guide. Missing or oddly-typed parts read as empty, and a
    /// single highlight string counts as one highlight.
    pub fn from_value(value: &Value) -> Self {
        let highlights = match value.get("highlights") {
            Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
            Some(other) => scalar_text(other).into_iter().collect(),
            None => Vec::new(),
        };

        Self {
            intro: field_text(value, "intro"),
            highlights,
            steps: objects(value, "steps")
                .map(|step| GuideStep {
                    title: field_text(step, "title"),
                    detail: field_text(step, "detail"),
                })
                .collect(),
            resources: objects(value, "resources")
                .map(|resource| GuideResource {
                    label: field_text(resource, "label"),
                    url: field_text(resource, "url"),
                })
                .collect(),
        }
    }

    pub fn to_value(&self) -> Value {
        let steps: Vec<Value> = self
            .steps
            .iter()
            .map(|step| json!({ "title": step.title, "detail": step.detail }))
            .collect();
        let resources: Vec<Value> = self
            .resources
            .iter()
            .map(|r| json!({ "label": r.label, "url": r.url }))
            .collect();

        json!({
            "intro": self.intro,
            "highlights": self.highlights,
            "steps": steps,
            "resources": resources,
        })
    }

    /// Guide shown for projects that were submitted without one.
    pub fn fallback_for(project: &Project) -> Self {
        let author = if project.author.trim().is_empty() {
            "a community member"
        } else {
            project.author.as_str()
        };

        let resources = if project.link.trim().is_empty() {
            Vec::new()
        } else {
            vec![GuideResource {
                label: "View demo".to_string(),
                url: project.link.clone(),
            }]
        };

        Self {
            intro: project.description.clone(),
            highlights: vec![
                "This write-up was generated from the submission form".to_string(),
                "Add a full build guide to tell the complete story".to_string(),
            ],
            steps: vec![
                GuideStep {
                    title: "Overview".to_string(),
                    detail: project.description.clone(),
                },
                GuideStep {
                    title: "Team".to_string(),
                    detail: format!("Led by {}. More details will follow.", author),
                },
            ],
            resources,
        }
    }
}

/// A showcased project.
///
/// Deserialization goes through [`ProjectRecord`], so documents written by
/// other tools load instead of failing on a field of the wrong shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "ProjectRecord")]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub author: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub category: Category,
    /// Server-assigned; starter projects predate it and carry none
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDate>,
    /// Stored exactly as submitted
    pub guide: Option<Value>,
}

impl Project {
    /// Tags as shown on a card.
    pub fn display_tags(&self) -> &[String] {
        let end = self.tags.len().min(DISPLAY_TAG_LIMIT);
        &self.tags[..end]
    }

    /// The project's own guide, or the generated fallback.
    pub fn guide_or_fallback(&self) -> Guide {
        self.guide
            .as_ref()
            .map(Guide::from_value)
            .unwrap_or_else(|| Guide::fallback_for(self))
    }

    /// Date used for newest-first ordering.
    pub fn sort_date(&self) -> Option<NaiveDate> {
        self.published_at
            .or_else(|| self.created_at.map(|ts| ts.date_naive()))
    }
}
