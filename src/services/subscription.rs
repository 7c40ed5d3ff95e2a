//! Subscription service: course access grants counted by the dashboard.

use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::subscription::{
    CreateSubscription, Subscription, SubscriptionStatus, SubscriptionSummary, UpdateSubscription,
};
use crate::models::user::UserRole;
use crate::services::course;

/// Default subscription term.
const SUBSCRIPTION_TERM_DAYS: i64 = 30;

/// Subscribe the acting student to a published course.
///
/// Payment is handled outside this service; a new subscription starts
/// active with a 30-day term.
pub async fn create(
    pool: &PgPool,
    actor: &CurrentUser,
    input: &CreateSubscription,
) -> Result<Subscription, AppError> {
    if actor.role != UserRole::Student {
        return Err(AppError::Forbidden(
            "Only students may subscribe to courses".to_string(),
        ));
    }

    let target_course = course::find_by_id(pool, input.course_id).await?;
    if !target_course.is_published {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    let expires_at = Utc::now() + Duration::days(SUBSCRIPTION_TERM_DAYS);

    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        INSERT INTO subscriptions (user_id, course_id, status, expires_at)
        VALUES ($1, $2, 'active', $3)
        RETURNING *
        "#,
    )
    .bind(actor.id)
    .bind(input.course_id)
    .bind(expires_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("You already have a subscription for this course".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(subscription)
}

/// Find subscription by ID.
pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Subscription, AppError> {
    sqlx::query_as::<_, Subscription>("SELECT * FROM subscriptions WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Subscription not found".to_string()))
}

/// Change a subscription's status.
///
/// The subscriber may cancel their own subscription; staff may set any
/// status.
pub async fn update_status(
    pool: &PgPool,
    id: i32,
    actor: &CurrentUser,
    input: &UpdateSubscription,
) -> Result<Subscription, AppError> {
    let existing = find_by_id(pool, id).await?;

    let permitted = actor.role.is_staff()
        || (existing.user_id == actor.id && input.status == SubscriptionStatus::Cancelled);
    if !permitted {
        return Err(AppError::Forbidden(
            "You may only cancel your own subscription".to_string(),
        ));
    }

    let subscription = sqlx::query_as::<_, Subscription>(
        r#"
        UPDATE subscriptions
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.status)
    .fetch_one(pool)
    .await?;

    Ok(subscription)
}

/// List the acting user's subscriptions with course titles.
pub async fn list_mine(pool: &PgPool, user_id: i32) -> Result<Vec<SubscriptionSummary>, AppError> {
    let subscriptions = sqlx::query_as::<_, SubscriptionSummary>(
        r#"
        SELECT s.id, s.course_id, c.title AS course_title, s.status,
               s.started_at, s.expires_at
        FROM subscriptions s
        JOIN courses c ON c.id = s.course_id
        WHERE s.user_id = $1
        ORDER BY s.started_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(subscriptions)
}

/// List a course's subscriptions (owner or admin).
pub async fn list_for_course(
    pool: &PgPool,
    course_id: i32,
    actor: &CurrentUser,
) -> Result<Vec<Subscription>, AppError> {
    course::ensure_owned(pool, course_id, actor).await?;

    let subscriptions = sqlx::query_as::<_, Subscription>(
        "SELECT * FROM subscriptions WHERE course_id = $1 ORDER BY started_at DESC",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(subscriptions)
}
