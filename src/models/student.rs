//! Student records and request payloads.

use serde::{Deserialize, Serialize};

use super::{Course, Entity};

/// Department reference embedded in a student record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartmentRef {
    pub id: i64,
    pub name: String,
}

/// A student as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// Backend-issued numeric id
    pub id: i64,

    /// Business identifier, immutable after creation
    pub student_id: String,

    pub first_name: String,
    pub last_name: String,
    pub email: String,

    #[serde(default)]
    pub department: Option<DepartmentRef>,

    #[serde(default)]
    pub courses: Vec<Course>,

    #[serde(default)]
    pub active: bool,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

impl Student {
    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Comma-separated course names, empty when enrolled in none.
    pub fn course_names(&self) -> String {
        self.courses
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Canonical update payload for this record.
    pub fn to_update_request(&self) -> UpdateStudentRequest {
        UpdateStudentRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            department_id: self.department.as_ref().map(|d| d.id),
            course_ids: self.courses.iter().map(|c| c.id).collect(),
        }
    }
}

impl Entity for Student {
    fn id(&self) -> i64 {
        self.id
    }
}

/// `POST /students` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub course_ids: Vec<i64>,
}

/// `PUT /students/{studentId}` body. The business id travels in the path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department_id: Option<i64>,
    pub course_ids: Vec<i64>,
}
