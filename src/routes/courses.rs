//! Course routes: authoring CRUD plus course-scoped rosters and lessons.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireStaff;
use crate::models::course::{Course, CourseSummary, CreateCourse, UpdateCourse};
use crate::models::enrollment::EnrollmentSummary;
use crate::models::lesson::Lesson;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::subscription::Subscription;
use crate::services::course::{self as course_service, CourseFilters};
use crate::services::{enrollment as enrollment_service, lesson as lesson_service, subscription as subscription_service};
use crate::AppState;

/// GET /api/v1/courses — list courses with filters and pagination.
///
/// Students only see published courses; staff see everything.
pub async fn list(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<CourseFilters>,
) -> Result<Json<ApiResponse<PagedResult<CourseSummary>>>, AppError> {
    let staff_view = current_user.role.is_staff();
    let result = course_service::list(&state.db, &filters, &pagination, staff_view).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/courses — create a course owned by the acting staff user.
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(body): Json<CreateCourse>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    body.validate()?;
    let course = course_service::create(&state.db, staff.id, &body).await?;
    Ok(ApiResponse::success(course))
}

/// GET /api/v1/courses/:id — get course by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    let course = course_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(course))
}

/// PUT /api/v1/courses/:id — update a course (owner or admin).
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCourse>,
) -> Result<Json<ApiResponse<Course>>, AppError> {
    body.validate()?;
    course_service::ensure_owned(&state.db, id, &staff).await?;
    let course = course_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(course))
}

/// GET /api/v1/courses/:id/lessons — list a course's lessons in order.
pub async fn list_lessons(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, AppError> {
    let lessons = lesson_service::list_for_course(&state.db, id).await?;
    Ok(ApiResponse::success(lessons))
}

/// GET /api/v1/courses/:id/enrollments — course roster (owner or admin).
pub async fn list_enrollments(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<EnrollmentSummary>>>, AppError> {
    let roster = enrollment_service::list_for_course(&state.db, id, &staff).await?;
    Ok(ApiResponse::success(roster))
}

/// GET /api/v1/courses/:id/subscriptions — course subscriptions (owner or admin).
pub async fn list_subscriptions(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Subscription>>>, AppError> {
    let subscriptions = subscription_service::list_for_course(&state.db, id, &staff).await?;
    Ok(ApiResponse::success(subscriptions))
}
