// src/routes.rs

//! Client-side route table.

use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A screen of the admin client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Students,
    NewStudent,
    /// Carries the student's business id
    EditStudent(String),
    Departments,
    NewDepartment,
    /// Carries the department's numeric id
    EditDepartment(i64),
}

impl Route {
    /// Resolve a path. Anything unknown lands on [`Route::Home`].
    pub fn parse(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            ["home"] => Route::Home,
            ["students"] => Route::Students,
            ["students", "new"] => Route::NewStudent,
            ["students", "edit", id] => Route::EditStudent((*id).to_string()),
            ["departments"] => Route::Departments,
            ["departments", "new"] => Route::NewDepartment,
            ["departments", "edit", id] => match id.parse() {
                Ok(id) => Route::EditDepartment(id),
                Err(_) => Route::Home,
            },
            _ => Route::Home,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Students => "Student List",
            Route::NewStudent => "Add Student",
            Route::EditStudent(_) => "Edit Student",
            Route::Departments => "Department List",
            Route::NewDepartment => "Add Department",
            Route::EditDepartment(_) => "Edit Department",
        }
    }

    /// Edit routes carry the id of the record being edited.
    pub fn is_edit(&self) -> bool {
        matches!(self, Route::EditStudent(_) | Route::EditDepartment(_))
    }

    /// List a form returns to after saving.
    pub fn list_route(&self) -> Route {
        match self {
            Route::NewStudent | Route::EditStudent(_) | Route::Students => Route::Students,
            Route::NewDepartment | Route::EditDepartment(_) | Route::Departments => {
                Route::Departments
            }
            Route::Home => Route::Home,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Home => write!(f, "/home"),
            Route::Students => write!(f, "/students"),
            Route::NewStudent => write!(f, "/students/new"),
            Route::EditStudent(id) => write!(f, "/students/edit/{id}"),
            Route::Departments => write!(f, "/departments"),
            Route::NewDepartment => write!(f, "/departments/new"),
            Route::EditDepartment(id) => write!(f, "/departments/edit/{id}"),
        }
    }
}

impl FromStr for Route {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Route::parse(s))
    }
}
