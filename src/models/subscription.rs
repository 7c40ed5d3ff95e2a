//! Subscription model: paid/active access to a course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lifecycle status of a subscription. Only `active` rows count toward
/// dashboard statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "subscription_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Pending,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscription {
    pub id: i32,
    pub user_id: i32,
    pub course_id: i32,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscription {
    pub course_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubscription {
    pub status: SubscriptionStatus,
}

/// Subscription row joined with course context for "my subscriptions" views.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubscriptionSummary {
    pub id: i32,
    pub course_id: i32,
    pub course_title: String,
    pub status: SubscriptionStatus,
    pub started_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SubscriptionStatus::Active).unwrap(),
            "\"active\""
        );
        let status: SubscriptionStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Cancelled);
    }

    #[test]
    fn update_subscription_parses_status() {
        let update: UpdateSubscription =
            serde_json::from_str(r#"{"status": "expired"}"#).unwrap();
        assert_eq!(update.status, SubscriptionStatus::Expired);
    }
}
