//! Lesson and lesson-content models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Lesson {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub summary: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLesson {
    pub course_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub summary: Option<String>,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateLesson {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub summary: Option<String>,
    pub position: Option<i32>,
}

/// Kind of authored content block inside a lesson.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "content_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    Video,
    Attachment,
}

/// Content block: markdown text, a video URL, or a storage reference.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LessonContent {
    pub id: i32,
    pub lesson_id: i32,
    pub kind: ContentKind,
    pub title: String,
    pub body: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLessonContent {
    pub kind: ContentKind,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[serde(default)]
    pub position: i32,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateLessonContent {
    pub kind: Option<ContentKind>,
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub position: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_kind_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ContentKind::Video).unwrap(),
            "\"video\""
        );
        let kind: ContentKind = serde_json::from_str("\"attachment\"").unwrap();
        assert_eq!(kind, ContentKind::Attachment);
    }

    #[test]
    fn create_lesson_position_defaults_to_zero() {
        let input: CreateLesson =
            serde_json::from_str(r#"{"course_id": 3, "title": "Week 1"}"#).unwrap();
        assert_eq!(input.position, 0);
        assert_eq!(input.course_id, 3);
    }

    #[test]
    fn create_content_rejects_empty_body() {
        let input = CreateLessonContent {
            kind: ContentKind::Text,
            title: "Reading".to_string(),
            body: String::new(),
            position: 0,
        };
        assert!(validator::Validate::validate(&input).is_err());
    }
}
