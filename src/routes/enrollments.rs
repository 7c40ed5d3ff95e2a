//! Enrollment routes.

use axum::{extract::State, Json};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::enrollment::{CourseEnrollment, CreateEnrollment, MyEnrollment};
use crate::services::enrollment as enrollment_service;
use crate::AppState;

/// POST /api/v1/enrollments — enroll in a course (self, or any student if staff).
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateEnrollment>,
) -> Result<Json<ApiResponse<CourseEnrollment>>, AppError> {
    let enrollment = enrollment_service::create(&state.db, &current_user, &body).await?;
    Ok(ApiResponse::success(enrollment))
}

/// GET /api/v1/enrollments/mine — list the caller's enrollments.
pub async fn list_mine(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<MyEnrollment>>>, AppError> {
    let enrollments = enrollment_service::list_mine(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(enrollments))
}
