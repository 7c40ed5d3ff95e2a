//! Assignment service: authoring, student submissions, and grading.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::assignment::{
    Assignment, AssignmentSubmission, CreateAssignment, CreateSubmission, GradeSubmission,
    SubmissionSummary, UpdateAssignment, UpdateSubmission,
};
use crate::models::user::UserRole;
use crate::services::{course, lesson};

/// Create an assignment under a lesson owned by the actor.
pub async fn create(
    pool: &PgPool,
    actor: &CurrentUser,
    input: &CreateAssignment,
) -> Result<Assignment, AppError> {
    let parent = lesson::find_by_id(pool, input.lesson_id).await?;
    course::ensure_owned(pool, parent.course_id, actor).await?;

    let assignment = sqlx::query_as::<_, Assignment>(
        r#"
        INSERT INTO assignments (lesson_id, title, instructions, due_at, max_score)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(input.lesson_id)
    .bind(&input.title)
    .bind(&input.instructions)
    .bind(input.due_at)
    .bind(input.max_score)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

/// Find assignment by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Assignment, AppError> {
    sqlx::query_as::<_, Assignment>("SELECT * FROM assignments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
}

/// List a lesson's assignments.
pub async fn list_for_lesson(pool: &PgPool, lesson_id: i32) -> Result<Vec<Assignment>, AppError> {
    lesson::find_by_id(pool, lesson_id).await?;

    let assignments = sqlx::query_as::<_, Assignment>(
        "SELECT * FROM assignments WHERE lesson_id = $1 ORDER BY created_at ASC",
    )
    .bind(lesson_id)
    .fetch_all(pool)
    .await?;

    Ok(assignments)
}

/// Update an assignment (owner or admin).
pub async fn update(
    pool: &PgPool,
    id: i32,
    actor: &CurrentUser,
    input: &UpdateAssignment,
) -> Result<Assignment, AppError> {
    let existing = find_by_id(pool, id).await?;
    let parent = lesson::find_by_id(pool, existing.lesson_id).await?;
    course::ensure_owned(pool, parent.course_id, actor).await?;

    let assignment = sqlx::query_as::<_, Assignment>(
        r#"
        UPDATE assignments SET
            title = COALESCE($2, title),
            instructions = COALESCE($3, instructions),
            due_at = COALESCE($4, due_at),
            max_score = COALESCE($5, max_score),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.instructions)
    .bind(input.due_at)
    .bind(input.max_score)
    .fetch_one(pool)
    .await?;

    Ok(assignment)
}

/// Resolve the owning course's owner id for an assignment.
async fn course_owner_of(pool: &PgPool, assignment_id: i32) -> Result<i32, AppError> {
    sqlx::query_scalar::<_, i32>(
        r#"
        SELECT c.owner_id
        FROM assignments a
        JOIN lessons l ON l.id = a.lesson_id
        JOIN courses c ON c.id = l.course_id
        WHERE a.id = $1
        "#,
    )
    .bind(assignment_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Assignment not found".to_string()))
}

/// Check that the actor may see or grade submissions for an assignment.
async fn ensure_staff_access(
    pool: &PgPool,
    assignment_id: i32,
    actor: &CurrentUser,
) -> Result<(), AppError> {
    let owner_id = course_owner_of(pool, assignment_id).await?;
    if actor.role != UserRole::Administrator && owner_id != actor.id {
        return Err(AppError::Forbidden(
            "Only the course owner may access these submissions".to_string(),
        ));
    }
    Ok(())
}

/// Submit work for an assignment. One submission per student per assignment.
pub async fn submit(
    pool: &PgPool,
    assignment_id: i32,
    actor: &CurrentUser,
    input: &CreateSubmission,
) -> Result<AssignmentSubmission, AppError> {
    if actor.role != UserRole::Student {
        return Err(AppError::Forbidden(
            "Only students may submit assignments".to_string(),
        ));
    }
    find_by_id(pool, assignment_id).await?;

    let submission = sqlx::query_as::<_, AssignmentSubmission>(
        r#"
        INSERT INTO assignment_submissions (assignment_id, student_id, content)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(assignment_id)
    .bind(actor.id)
    .bind(&input.content)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("You have already submitted this assignment".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(submission)
}

/// List an assignment's submissions with student names (owner or admin).
pub async fn list_submissions(
    pool: &PgPool,
    assignment_id: i32,
    actor: &CurrentUser,
) -> Result<Vec<SubmissionSummary>, AppError> {
    ensure_staff_access(pool, assignment_id, actor).await?;

    let submissions = sqlx::query_as::<_, SubmissionSummary>(
        r#"
        SELECT s.id, s.assignment_id, s.student_id, u.full_name AS student_name,
               s.submitted_at, s.score, s.graded_at
        FROM assignment_submissions s
        JOIN users u ON u.id = s.student_id
        WHERE s.assignment_id = $1
        ORDER BY s.submitted_at DESC
        "#,
    )
    .bind(assignment_id)
    .fetch_all(pool)
    .await?;

    Ok(submissions)
}

/// Fetch a single submission. Visible to the submitting student, the course
/// owner, and administrators.
pub async fn find_submission(
    pool: &PgPool,
    id: i32,
    actor: &CurrentUser,
) -> Result<AssignmentSubmission, AppError> {
    let submission = sqlx::query_as::<_, AssignmentSubmission>(
        "SELECT * FROM assignment_submissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    if submission.student_id == actor.id || actor.role == UserRole::Administrator {
        return Ok(submission);
    }
    let owner_id = course_owner_of(pool, submission.assignment_id).await?;
    if owner_id != actor.id {
        return Err(AppError::Forbidden(
            "You may not view this submission".to_string(),
        ));
    }
    Ok(submission)
}

/// Replace the content of an ungraded submission (submitting student only).
pub async fn update_submission(
    pool: &PgPool,
    id: i32,
    actor: &CurrentUser,
    input: &UpdateSubmission,
) -> Result<AssignmentSubmission, AppError> {
    let existing = sqlx::query_as::<_, AssignmentSubmission>(
        "SELECT * FROM assignment_submissions WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    if existing.student_id != actor.id {
        return Err(AppError::Forbidden(
            "Only the submitting student may edit a submission".to_string(),
        ));
    }
    if existing.is_graded() {
        return Err(AppError::Conflict(
            "Submission has already been graded".to_string(),
        ));
    }

    let submission = sqlx::query_as::<_, AssignmentSubmission>(
        r#"
        UPDATE assignment_submissions
        SET content = $2, submitted_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.content)
    .fetch_one(pool)
    .await?;

    Ok(submission)
}

/// Grade a submission (owner or admin). The score must not exceed the
/// assignment's max_score.
pub async fn grade(
    pool: &PgPool,
    submission_id: i32,
    actor: &CurrentUser,
    input: &GradeSubmission,
) -> Result<AssignmentSubmission, AppError> {
    let existing = sqlx::query_as::<_, AssignmentSubmission>(
        "SELECT * FROM assignment_submissions WHERE id = $1",
    )
    .bind(submission_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    ensure_staff_access(pool, existing.assignment_id, actor).await?;

    let assignment = find_by_id(pool, existing.assignment_id).await?;
    if input.score > assignment.max_score {
        return Err(AppError::Validation(format!(
            "Score {} exceeds the assignment maximum of {}",
            input.score, assignment.max_score
        )));
    }

    let submission = sqlx::query_as::<_, AssignmentSubmission>(
        r#"
        UPDATE assignment_submissions
        SET score = $2, feedback = $3, graded_by = $4, graded_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(submission_id)
    .bind(input.score)
    .bind(&input.feedback)
    .bind(actor.id)
    .fetch_one(pool)
    .await?;

    Ok(submission)
}
