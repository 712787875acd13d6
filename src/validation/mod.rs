//! Submission validation and normalization.
//!
//! Turns a loosely-typed [`ProjectSubmission`] into a [`NewProject`] that is
//! ready to receive a slug and timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use crate::models::{Category, Project, ProjectSubmission, TagsInput};

/// Maximum number of tags kept on a stored project.
pub const MAX_TAGS: usize = 5;

/// Reason a submission was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingTitleOrDescription,
    MissingLink,
    MissingAuthor,
}

impl ValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            ValidationError::MissingTitleOrDescription => "Missing project title or description",
            ValidationError::MissingLink => "Please provide a demo or repository link",
            ValidationError::MissingAuthor => "Missing author information",
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for ValidationError {}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub author: String,
    pub link: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub category: Category,
    pub published_at: Option<NaiveDate>,
    pub guide: Option<Value>,
}

impl NewProject {
    /// Stamp the project with its slug and creation time.
    pub fn into_project(self, slug: String, created_at: DateTime<Utc>) -> Project {
        Project {
            slug,
            title: self.title,
            description: self.description,
            author: self.author,
            link: self.link,
            image: self.image,
            tags: self.tags,
            category: self.category,
            published_at: Some(
                self.published_at
                    .unwrap_or_else(|| created_at.date_naive()),
            ),
            created_at: Some(created_at),
            guide: self.guide,
        }
    }
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Check required fields and normalize tags and category.
pub fn validate(submission: ProjectSubmission) -> Result<NewProject, ValidationError> {
    let (title, description) = match (
        required(&submission.title),
        required(&submission.description),
    ) {
        (Some(title), Some(description)) => (title, description),
        _ => return Err(ValidationError::MissingTitleOrDescription),
    };
    let link = required(&submission.link).ok_or(ValidationError::MissingLink)?;
    let author = required(&submission.author).ok_or(ValidationError::MissingAuthor)?;

    let tags = normalize_tags(submission.tags.as_ref());
    let category = submission
        .category
        .as_deref()
        .and_then(Category::parse)
        .unwrap_or_else(|| infer_category(&tags));

    Ok(NewProject {
        title,
        description,
        author,
        link,
        image: required(&submission.image),
        tags,
        category,
        published_at: submission.published_at,
        guide: submission.guide,
    })
}

/// Trim tags, drop empty ones, and keep at most [`MAX_TAGS`].
pub fn normalize_tags(input: Option<&TagsInput>) -> Vec<String> {
    let raw: Vec<&str> = match input {
        None => return Vec::new(),
        Some(TagsInput::List(tags)) => tags.iter().map(String::as_str).collect(),
        Some(TagsInput::Text(text)) => text.split(',').collect(),
    };

    raw.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// Guess a category from tag text: "mobile" first, then "ai" or "ml".
pub fn infer_category<S: AsRef<str>>(tags: &[S]) -> Category {
    Category::infer_from_tags(tags)
}
