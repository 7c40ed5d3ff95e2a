//! Subscription routes.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::subscription::{
    CreateSubscription, Subscription, SubscriptionSummary, UpdateSubscription,
};
use crate::services::subscription as subscription_service;
use crate::AppState;

/// POST /api/v1/subscriptions — subscribe to a published course (students only).
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CreateSubscription>,
) -> Result<Json<ApiResponse<Subscription>>, AppError> {
    let subscription = subscription_service::create(&state.db, &current_user, &body).await?;
    Ok(ApiResponse::success(subscription))
}

/// PUT /api/v1/subscriptions/:id — change status (subscriber cancels, staff any).
pub async fn update_status(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i32>,
    Json(body): Json<UpdateSubscription>,
) -> Result<Json<ApiResponse<Subscription>>, AppError> {
    let subscription =
        subscription_service::update_status(&state.db, id, &current_user, &body).await?;
    Ok(ApiResponse::success(subscription))
}

/// GET /api/v1/subscriptions/mine — list the caller's subscriptions.
pub async fn list_mine(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<SubscriptionSummary>>>, AppError> {
    let subscriptions = subscription_service::list_mine(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(subscriptions))
}
