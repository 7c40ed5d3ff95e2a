//! Course catalog service: authoring CRUD and ownership checks.

use serde::Deserialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::course::{Course, CourseSummary, CreateCourse, UpdateCourse};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::user::UserRole;

/// Filters for listing courses.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CourseFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_published: Option<bool>,
    pub owner_id: Option<i32>,
}

/// Create a new course owned by the acting staff user.
pub async fn create(pool: &PgPool, owner_id: i32, input: &CreateCourse) -> Result<Course, AppError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (owner_id, title, description, category, is_published)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.category)
    .bind(input.is_published)
    .fetch_one(pool)
    .await?;

    Ok(course)
}

/// Find course by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Course, AppError> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}

/// Resolve a course and check that the actor may modify it.
///
/// Administrators may modify any course; moderators only their own.
pub async fn ensure_owned(
    pool: &PgPool,
    course_id: i32,
    actor: &CurrentUser,
) -> Result<Course, AppError> {
    let course = find_by_id(pool, course_id).await?;
    if actor.role != UserRole::Administrator && course.owner_id != actor.id {
        return Err(AppError::Forbidden(
            "Only the course owner may modify this course".to_string(),
        ));
    }
    Ok(course)
}

/// List courses with filters and pagination.
///
/// Non-staff callers only ever see published courses, whatever the filters
/// say.
pub async fn list(
    pool: &PgPool,
    filters: &CourseFilters,
    pagination: &Pagination,
    staff_view: bool,
) -> Result<PagedResult<CourseSummary>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    if !staff_view {
        conditions.push("c.is_published = true".to_string());
    } else if filters.is_published.is_some() {
        param_index += 1;
        conditions.push(format!("c.is_published = ${param_index}"));
    }
    if filters.category.is_some() {
        param_index += 1;
        conditions.push(format!("c.category = ${param_index}"));
    }
    if filters.owner_id.is_some() {
        param_index += 1;
        conditions.push(format!("c.owner_id = ${param_index}"));
    }
    if filters.search.is_some() {
        param_index += 1;
        conditions.push(format!("c.title ILIKE ${param_index}"));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM courses c {where_clause}");
    let data_sql = format!(
        "SELECT c.id, c.title, c.category, c.is_published, c.owner_id, \
                u.full_name AS owner_name, \
                (SELECT COUNT(*) FROM lessons l WHERE l.course_id = c.id) AS lesson_count \
         FROM courses c \
         JOIN users u ON u.id = c.owner_id \
         {where_clause} ORDER BY c.created_at DESC LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, CourseSummary>(&data_sql);

    // Bind parameters in the same order for both queries
    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if staff_view {
        if let Some(published) = filters.is_published {
            bind_both!(published);
        }
    }
    if let Some(ref category) = filters.category {
        bind_both!(category);
    }
    if let Some(owner_id) = filters.owner_id {
        bind_both!(owner_id);
    }
    if let Some(ref search) = filters.search {
        let pattern = format!("%{search}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Update a course (ownership already verified by the caller).
pub async fn update(pool: &PgPool, id: i32, input: &UpdateCourse) -> Result<Course, AppError> {
    let course = sqlx::query_as::<_, Course>(
        r#"
        UPDATE courses SET
            title = COALESCE($2, title),
            description = COALESCE($3, description),
            category = COALESCE($4, category),
            is_published = COALESCE($5, is_published),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(&input.category)
    .bind(input.is_published)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    Ok(course)
}
