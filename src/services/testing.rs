//! Gateway stand-ins for unit tests.

use async_trait::async_trait;

use super::RemoteGateway;
use crate::error::Result;
use crate::models::{
    Course, CreateDepartmentRequest, CreateStudentRequest, Department, ExportFormat, Page,
    Student, UpdateDepartmentRequest, UpdateStudentRequest,
};
use crate::query::QueryState;

/// Gateway for state-only tests. Any call is a test failure.
pub struct Offline;

#[async_trait]
impl RemoteGateway for Offline {
    async fn list_students(&self, _: &QueryState) -> Result<Page<Student>> {
        unreachable!("list_students")
    }
    async fn get_student(&self, _: &str) -> Result<Student> {
        unreachable!("get_student")
    }
    async fn create_student(&self, _: &CreateStudentRequest) -> Result<Student> {
        unreachable!("create_student")
    }
    async fn update_student(&self, _: &str, _: &UpdateStudentRequest) -> Result<Student> {
        unreachable!("update_student")
    }
    async fn toggle_student_status(&self, _: &str) -> Result<Student> {
        unreachable!("toggle_student_status")
    }
    async fn download_students(&self, _: ExportFormat, _: &QueryState) -> Result<Vec<u8>> {
        unreachable!("download_students")
    }
    async fn list_departments(&self, _: &QueryState) -> Result<Page<Department>> {
        unreachable!("list_departments")
    }
    async fn active_departments(&self) -> Result<Vec<Department>> {
        unreachable!("active_departments")
    }
    async fn get_department(&self, _: i64) -> Result<Department> {
        unreachable!("get_department")
    }
    async fn create_department(&self, _: &CreateDepartmentRequest) -> Result<Department> {
        unreachable!("create_department")
    }
    async fn update_department(&self, _: i64, _: &UpdateDepartmentRequest) -> Result<Department> {
        unreachable!("update_department")
    }
    async fn toggle_department_status(&self, _: i64) -> Result<Department> {
        unreachable!("toggle_department_status")
    }
    async fn list_courses(&self, _: Option<i64>) -> Result<Vec<Course>> {
        unreachable!("list_courses")
    }
}
