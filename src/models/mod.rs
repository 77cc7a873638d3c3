// src/models/mod.rs

//! Domain models for the admin client.
//!
//! Records are owned by the backend; the client only holds read-only copies
//! and edit drafts. Identity is always the backend-issued id.

mod api;
mod config;
mod department;
mod export;
mod student;

// Re-export all public types
pub use api::{ApiResponse, FormMessage, Page};
pub use config::{ApiConfig, Config, FormConfig, ListConfig, LoggingConfig, StorageConfig};
pub use department::{
    Course, CreateDepartmentRequest, Department, NewCourse, UpdateDepartmentRequest,
};
pub use export::ExportFormat;
pub use student::{CreateStudentRequest, DepartmentRef, Student, UpdateStudentRequest};

/// A backend record that can be located in a list by its id.
pub trait Entity: Clone {
    fn id(&self) -> i64;
}
