//! Database models and DTOs for all domain entities.

pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod lesson;
pub mod pagination;
pub mod subscription;
pub mod user;
