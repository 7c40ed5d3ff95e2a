//! Enrollment service: joining students to courses.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::enrollment::{CourseEnrollment, CreateEnrollment, EnrollmentSummary, MyEnrollment};
use crate::models::user::UserRole;
use crate::services::{auth, course};

/// Enroll a student in a course.
///
/// Students enroll themselves in published courses. Staff may enroll any
/// student (incl. into unpublished courses they are preparing).
pub async fn create(
    pool: &PgPool,
    actor: &CurrentUser,
    input: &CreateEnrollment,
) -> Result<CourseEnrollment, AppError> {
    let target_course = course::find_by_id(pool, input.course_id).await?;

    let student_id = match input.student_id {
        Some(explicit) if explicit != actor.id => {
            if !actor.role.is_staff() {
                return Err(AppError::Forbidden(
                    "Only staff may enroll other users".to_string(),
                ));
            }
            explicit
        }
        _ => actor.id,
    };

    if student_id == actor.id {
        if actor.role != UserRole::Student {
            return Err(AppError::Validation(
                "Only student accounts can be enrolled".to_string(),
            ));
        }
        if !target_course.is_published {
            return Err(AppError::NotFound("Course not found".to_string()));
        }
    } else {
        let target = auth::find_user_by_id(pool, student_id).await?;
        if target.role != UserRole::Student {
            return Err(AppError::Validation(
                "Only student accounts can be enrolled".to_string(),
            ));
        }
    }

    let enrollment = sqlx::query_as::<_, CourseEnrollment>(
        r#"
        INSERT INTO course_enrollments (course_id, student_id)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(input.course_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("Student is already enrolled in this course".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(enrollment)
}

/// List a course's roster (owner or admin).
pub async fn list_for_course(
    pool: &PgPool,
    course_id: i32,
    actor: &CurrentUser,
) -> Result<Vec<EnrollmentSummary>, AppError> {
    course::ensure_owned(pool, course_id, actor).await?;

    let roster = sqlx::query_as::<_, EnrollmentSummary>(
        r#"
        SELECT e.id, e.course_id, e.student_id, u.full_name AS student_name,
               u.email AS student_email, e.enrolled_at
        FROM course_enrollments e
        JOIN users u ON u.id = e.student_id
        WHERE e.course_id = $1
        ORDER BY e.enrolled_at ASC
        "#,
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(roster)
}

/// List the acting user's own enrollments with course titles.
pub async fn list_mine(pool: &PgPool, user_id: i32) -> Result<Vec<MyEnrollment>, AppError> {
    let enrollments = sqlx::query_as::<_, MyEnrollment>(
        r#"
        SELECT e.id, e.course_id, c.title AS course_title, e.enrolled_at
        FROM course_enrollments e
        JOIN courses c ON c.id = e.course_id
        WHERE e.student_id = $1
        ORDER BY e.enrolled_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(enrollments)
}
