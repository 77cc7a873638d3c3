//! Departments, their courses, and request payloads.

use serde::{Deserialize, Serialize};

use super::Entity;

/// A course offered by a department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: i64,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_active")]
    pub active: bool,
}

/// A department with its nested course list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: i64,

    /// Canonical upper-snake name, e.g. `COMPUTER_SCIENCE`
    pub name: String,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub courses: Vec<Course>,
}

impl Department {
    /// Name with underscores shown as spaces.
    pub fn display_name(&self) -> String {
        self.name.replace('_', " ")
    }
}

impl Entity for Department {
    fn id(&self) -> i64 {
        self.id
    }
}

fn default_active() -> bool {
    true
}

/// Course entry inside a department creation request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `POST /departments` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateDepartmentRequest {
    pub name: String,
    pub courses: Vec<NewCourse>,
    pub status: bool,
}

/// `PUT /departments/{id}` body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateDepartmentRequest {
    pub name: String,
    pub status: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let dept: Department = serde_json::from_str(r#"{"id":3,"name":"CIVIL_ENGINEERING"}"#).unwrap();
        assert!(dept.active);
        assert!(dept.courses.is_empty());
        assert_eq!(dept.display_name(), "CIVIL ENGINEERING");
    }

    #[test]
    fn test_new_course_omits_empty_description() {
        let course = NewCourse {
            name: "Statics".into(),
            description: None,
        };
        assert_eq!(serde_json::to_string(&course).unwrap(), r#"{"name":"Statics"}"#);
    }
}
