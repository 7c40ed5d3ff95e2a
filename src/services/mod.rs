//! Business logic services.

pub mod assignment;
pub mod auth;
pub mod course;
pub mod dashboard;
pub mod enrollment;
pub mod lesson;
pub mod subscription;
