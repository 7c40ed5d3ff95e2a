//! Course enrollment model: which students belong to which course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CourseEnrollment {
    pub id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub enrolled_at: DateTime<Utc>,
}

/// Enrollment request. `student_id` may only be set by staff; students
/// enroll themselves.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollment {
    pub course_id: i32,
    pub student_id: Option<i32>,
}

/// Enrollment row joined with student identity for roster views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EnrollmentSummary {
    pub id: i32,
    pub course_id: i32,
    pub student_id: i32,
    pub student_name: String,
    pub student_email: String,
    pub enrolled_at: DateTime<Utc>,
}

/// A student's own enrollment with course context.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MyEnrollment {
    pub id: i32,
    pub course_id: i32,
    pub course_title: String,
    pub enrolled_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_enrollment_student_id_optional() {
        let input: CreateEnrollment = serde_json::from_str(r#"{"course_id": 9}"#).unwrap();
        assert_eq!(input.course_id, 9);
        assert!(input.student_id.is_none());

        let staff: CreateEnrollment =
            serde_json::from_str(r#"{"course_id": 9, "student_id": 14}"#).unwrap();
        assert_eq!(staff.student_id, Some(14));
    }
}
