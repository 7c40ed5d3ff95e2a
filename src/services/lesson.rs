//! Lesson and content-block service.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::lesson::{
    CreateLesson, CreateLessonContent, Lesson, LessonContent, UpdateLesson, UpdateLessonContent,
};
use crate::services::course;

/// Create a lesson in a course owned by the actor.
pub async fn create(
    pool: &PgPool,
    actor: &CurrentUser,
    input: &CreateLesson,
) -> Result<Lesson, AppError> {
    course::ensure_owned(pool, input.course_id, actor).await?;

    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        INSERT INTO lessons (course_id, title, summary, position)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(input.course_id)
    .bind(&input.title)
    .bind(&input.summary)
    .bind(input.position)
    .fetch_one(pool)
    .await?;

    Ok(lesson)
}

/// Find lesson by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Lesson, AppError> {
    sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".to_string()))
}

/// List a course's lessons in display order.
pub async fn list_for_course(pool: &PgPool, course_id: i32) -> Result<Vec<Lesson>, AppError> {
    // Surface a 404 for unknown courses rather than an empty list.
    course::find_by_id(pool, course_id).await?;

    let lessons = sqlx::query_as::<_, Lesson>(
        "SELECT * FROM lessons WHERE course_id = $1 ORDER BY position ASC, id ASC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(lessons)
}

/// Resolve a lesson and check the actor owns its course.
async fn ensure_owned(
    pool: &PgPool,
    lesson_id: i32,
    actor: &CurrentUser,
) -> Result<Lesson, AppError> {
    let lesson = find_by_id(pool, lesson_id).await?;
    course::ensure_owned(pool, lesson.course_id, actor).await?;
    Ok(lesson)
}

/// Update a lesson (owner or admin).
pub async fn update(
    pool: &PgPool,
    id: i32,
    actor: &CurrentUser,
    input: &UpdateLesson,
) -> Result<Lesson, AppError> {
    ensure_owned(pool, id, actor).await?;

    let lesson = sqlx::query_as::<_, Lesson>(
        r#"
        UPDATE lessons SET
            title = COALESCE($2, title),
            summary = COALESCE($3, summary),
            position = COALESCE($4, position),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.summary)
    .bind(input.position)
    .fetch_one(pool)
    .await?;

    Ok(lesson)
}

/// Add a content block to a lesson (owner or admin).
pub async fn add_content(
    pool: &PgPool,
    lesson_id: i32,
    actor: &CurrentUser,
    input: &CreateLessonContent,
) -> Result<LessonContent, AppError> {
    ensure_owned(pool, lesson_id, actor).await?;

    let content = sqlx::query_as::<_, LessonContent>(
        r#"
        INSERT INTO lesson_contents (lesson_id, kind, title, body, position)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(lesson_id)
    .bind(input.kind)
    .bind(&input.title)
    .bind(&input.body)
    .bind(input.position)
    .fetch_one(pool)
    .await?;

    Ok(content)
}

/// List a lesson's content blocks in display order.
pub async fn list_contents(pool: &PgPool, lesson_id: i32) -> Result<Vec<LessonContent>, AppError> {
    find_by_id(pool, lesson_id).await?;

    let contents = sqlx::query_as::<_, LessonContent>(
        "SELECT * FROM lesson_contents WHERE lesson_id = $1 ORDER BY position ASC, id ASC",
    )
    .bind(lesson_id)
    .fetch_all(pool)
    .await?;

    Ok(contents)
}

/// Update a content block (owner or admin).
pub async fn update_content(
    pool: &PgPool,
    content_id: i32,
    actor: &CurrentUser,
    input: &UpdateLessonContent,
) -> Result<LessonContent, AppError> {
    let existing = sqlx::query_as::<_, LessonContent>(
        "SELECT * FROM lesson_contents WHERE id = $1",
    )
    .bind(content_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Content block not found".to_string()))?;

    ensure_owned(pool, existing.lesson_id, actor).await?;

    let content = sqlx::query_as::<_, LessonContent>(
        r#"
        UPDATE lesson_contents SET
            kind = COALESCE($2, kind),
            title = COALESCE($3, title),
            body = COALESCE($4, body),
            position = COALESCE($5, position),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(content_id)
    .bind(input.kind)
    .bind(&input.title)
    .bind(&input.body)
    .bind(input.position)
    .fetch_one(pool)
    .await?;

    Ok(content)
}
