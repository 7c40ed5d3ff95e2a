//! Lesson routes: lesson CRUD and content blocks.

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireStaff;
use crate::models::assignment::Assignment;
use crate::models::lesson::{
    CreateLesson, CreateLessonContent, Lesson, LessonContent, UpdateLesson, UpdateLessonContent,
};
use crate::services::{assignment as assignment_service, lesson as lesson_service};
use crate::AppState;

/// POST /api/v1/lessons — create a lesson (owner or admin).
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(body): Json<CreateLesson>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    body.validate()?;
    let lesson = lesson_service::create(&state.db, &staff, &body).await?;
    Ok(ApiResponse::success(lesson))
}

/// GET /api/v1/lessons/:id — get lesson by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    let lesson = lesson_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(lesson))
}

/// PUT /api/v1/lessons/:id — update a lesson (owner or admin).
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateLesson>,
) -> Result<Json<ApiResponse<Lesson>>, AppError> {
    body.validate()?;
    let lesson = lesson_service::update(&state.db, id, &staff, &body).await?;
    Ok(ApiResponse::success(lesson))
}

/// GET /api/v1/lessons/:id/contents — list content blocks in order.
pub async fn list_contents(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<LessonContent>>>, AppError> {
    let contents = lesson_service::list_contents(&state.db, id).await?;
    Ok(ApiResponse::success(contents))
}

/// POST /api/v1/lessons/:id/contents — add a content block (owner or admin).
pub async fn add_content(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<CreateLessonContent>,
) -> Result<Json<ApiResponse<LessonContent>>, AppError> {
    body.validate()?;
    let content = lesson_service::add_content(&state.db, id, &staff, &body).await?;
    Ok(ApiResponse::success(content))
}

/// PUT /api/v1/contents/:id — update a content block (owner or admin).
pub async fn update_content(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateLessonContent>,
) -> Result<Json<ApiResponse<LessonContent>>, AppError> {
    body.validate()?;
    let content = lesson_service::update_content(&state.db, id, &staff, &body).await?;
    Ok(ApiResponse::success(content))
}

/// GET /api/v1/lessons/:id/assignments — list a lesson's assignments.
pub async fn list_assignments(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<Assignment>>>, AppError> {
    let assignments = assignment_service::list_for_lesson(&state.db, id).await?;
    Ok(ApiResponse::success(assignments))
}
