//! Assignment and submission models, including grading DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: i32,
    pub lesson_id: i32,
    pub title: String,
    pub instructions: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssignment {
    pub lesson_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub instructions: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1000))]
    #[serde(default = "default_max_score")]
    pub max_score: i32,
}

fn default_max_score() -> i32 {
    100
}

#[derive(Debug, Clone, Deserialize, Default, Validate)]
pub struct UpdateAssignment {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub instructions: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1, max = 1000))]
    pub max_score: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssignmentSubmission {
    pub id: i32,
    pub assignment_id: i32,
    pub student_id: i32,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub graded_by: Option<i32>,
    pub graded_at: Option<DateTime<Utc>>,
}

impl AssignmentSubmission {
    /// A submission is graded once a score has been recorded.
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSubmission {
    #[validate(length(min = 1))]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSubmission {
    #[validate(length(min = 1))]
    pub content: String,
}

/// Grading request: score is validated against the assignment's max_score
/// in the service, not here, since the bound is per-assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeSubmission {
    #[validate(range(min = 0))]
    pub score: i32,
    pub feedback: Option<String>,
}

/// Submission row joined with the submitting student's name for staff lists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmissionSummary {
    pub id: i32,
    pub assignment_id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub submitted_at: DateTime<Utc>,
    pub score: Option<i32>,
    pub graded_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_assignment_defaults_max_score() {
        let input: CreateAssignment =
            serde_json::from_str(r#"{"lesson_id": 1, "title": "Essay"}"#).unwrap();
        assert_eq!(input.max_score, 100);
    }

    #[test]
    fn grade_rejects_negative_score() {
        let grade = GradeSubmission {
            score: -5,
            feedback: None,
        };
        assert!(validator::Validate::validate(&grade).is_err());
    }

    #[test]
    fn submission_graded_check() {
        let mut sub = AssignmentSubmission {
            id: 1,
            assignment_id: 1,
            student_id: 2,
            content: "My answer".to_string(),
            submitted_at: Utc::now(),
            score: None,
            feedback: None,
            graded_by: None,
            graded_at: None,
        };
        assert!(!sub.is_graded());
        sub.score = Some(85);
        assert!(sub.is_graded());
    }
}
