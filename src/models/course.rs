//! Course catalog model: the unit of ownership for moderators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCourse {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateCourse {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 64))]
    pub category: Option<String>,
    pub is_published: Option<bool>,
}

/// Summary DTO for list views, with the owner's display name joined in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseSummary {
    pub id: i32,
    pub title: String,
    pub category: Option<String>,
    pub is_published: bool,
    pub owner_id: i32,
    pub owner_name: String,
    pub lesson_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_course_defaults_unpublished() {
        let input: CreateCourse =
            serde_json::from_str(r#"{"title": "Intro to Botany"}"#).unwrap();
        assert!(!input.is_published);
        assert!(input.category.is_none());
    }

    #[test]
    fn create_course_rejects_empty_title() {
        let input = CreateCourse {
            title: String::new(),
            description: None,
            category: None,
            is_published: false,
        };
        assert!(validator::Validate::validate(&input).is_err());
    }

    #[test]
    fn update_course_all_fields_optional() {
        let input: UpdateCourse = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.is_published.is_none());
        assert!(validator::Validate::validate(&input).is_ok());
    }
}
