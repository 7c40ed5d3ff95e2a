//! Assignment routes: authoring, submissions, and grading.

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireStaff;
use crate::models::assignment::{
    Assignment, AssignmentSubmission, CreateAssignment, CreateSubmission, GradeSubmission,
    SubmissionSummary, UpdateAssignment, UpdateSubmission,
};
use crate::services::assignment as assignment_service;
use crate::AppState;

/// POST /api/v1/assignments — create an assignment (owner or admin).
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Json(body): Json<CreateAssignment>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    body.validate()?;
    let assignment = assignment_service::create(&state.db, &staff, &body).await?;
    Ok(ApiResponse::success(assignment))
}

/// GET /api/v1/assignments/:id — get assignment by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    let assignment = assignment_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(assignment))
}

/// PUT /api/v1/assignments/:id — update an assignment (owner or admin).
pub async fn update(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<UpdateAssignment>,
) -> Result<Json<ApiResponse<Assignment>>, AppError> {
    body.validate()?;
    let assignment = assignment_service::update(&state.db, id, &staff, &body).await?;
    Ok(ApiResponse::success(assignment))
}

/// POST /api/v1/assignments/:id/submissions — submit work (students only).
pub async fn submit(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<CreateSubmission>,
) -> Result<Json<ApiResponse<AssignmentSubmission>>, AppError> {
    body.validate()?;
    let submission = assignment_service::submit(&state.db, id, &current_user, &body).await?;
    Ok(ApiResponse::success(submission))
}

/// GET /api/v1/assignments/:id/submissions — list submissions (owner or admin).
pub async fn list_submissions(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<SubmissionSummary>>>, AppError> {
    let submissions = assignment_service::list_submissions(&state.db, id, &staff).await?;
    Ok(ApiResponse::success(submissions))
}

/// GET /api/v1/submissions/:id — fetch one submission.
pub async fn get_submission(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<AssignmentSubmission>>, AppError> {
    let submission = assignment_service::find_submission(&state.db, id, &current_user).await?;
    Ok(ApiResponse::success(submission))
}

/// PUT /api/v1/submissions/:id — edit an ungraded submission (its student only).
pub async fn update_submission(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateSubmission>,
) -> Result<Json<ApiResponse<AssignmentSubmission>>, AppError> {
    body.validate()?;
    let submission =
        assignment_service::update_submission(&state.db, id, &current_user, &body).await?;
    Ok(ApiResponse::success(submission))
}

/// PUT /api/v1/submissions/:id/grade — record a score (owner or admin).
pub async fn grade(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<i32>,
    Json(body): Json<GradeSubmission>,
) -> Result<Json<ApiResponse<AssignmentSubmission>>, AppError> {
    body.validate()?;
    let submission = assignment_service::grade(&state.db, id, &staff, &body).await?;
    Ok(ApiResponse::success(submission))
}
