//! Route definitions for the LearnHub API.

pub mod assignments;
pub mod auth;
pub mod courses;
pub mod dashboard;
pub mod enrollments;
pub mod health;
pub mod lessons;
pub mod subscriptions;
