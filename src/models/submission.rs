//! Request body for submitting a new project.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;
use super::Project;

/// Tags as sent by clients: either a list or a comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl From<Vec<String>> for TagsInput {
    fn from(tags: Vec<String>) -> Self {
        TagsInput::List(tags)
    }
}

impl From<&str> for TagsInput {
    fn from(tags: &str) -> Self {
        TagsInput::Text(tags.to_string())
    }
}

/// Submission payload for `POST /api/projects`.
///
/// Every field is optional here; the validator decides what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSubmission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<TagsInput>,
    /// Free-form; unknown names are ignored and the category is inferred
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// A date or full timestamp; unreadable values count as absent
    #[serde(
        default,
        deserialize_with = "lenient::date",
        skip_serializing_if = "Option::is_none"
    )]
    pub published_at: Option<NaiveDate>,
    /// Any JSON, carried without inspection
    #[serde(
        default,
        deserialize_with = "lenient::opaque",
        skip_serializing_if = "Option::is_none"
    )]
    pub guide: Option<Value>,
}

impl From<&Project> for ProjectSubmission {
    fn from(project: &Project) -> Self {
        Self {
            title: Some(project.title.clone()),
            description: Some(project.description.clone()),
            author: Some(project.author.clone()),
            link: Some(project.link.clone()),
            image: project.image.clone(),
            tags: Some(TagsInput::List(project.tags.clone())),
            category: Some(project.category.as_str().to_string()),
            published_at: project.published_at,
            guide: project.guide.clone(),
        }
    }
}

impl ProjectSubmission {
    /// Parse a raw request body. An empty body reads as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_accept_list_or_text() {
        let list: ProjectSubmission = serde_json::from_str(r#"{"tags":["a","b"]}"#).unwrap();
        assert_eq!(
            list.tags,
            Some(TagsInput::List(vec!["a".to_string(), "b".to_string()]))
        );

        let text: ProjectSubmission = serde_json::from_str(r#"{"tags":"a, b"}"#).unwrap();
        assert_eq!(text.tags, Some(TagsInput::Text("a, b".to_string())));
    }

    #[test]
    fn test_empty_body_is_empty_submission() {
        let submission = ProjectSubmission::from_body(b"  ").unwrap();
        assert!(submission.title.is_none());
    }

    #[test]
    fn test_guide_and_timestamp_accepted_as_sent() {
        let body = br#"{"publishedAt":"2024-05-01T09:00:00Z","guide":{"highlights":"one line","video":"v"}}"#;
        let submission = ProjectSubmission::from_body(body).unwrap();
        assert_eq!(submission.published_at, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(
            submission.guide,
            Some(serde_json::json!({ "highlights": "one line", "video": "v" }))
        );
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(ProjectSubmission::from_body(b"{not json").is_err());
        assert!(ProjectSubmission::from_body(br#"{"title": 42}"#).is_err());
    }
}
