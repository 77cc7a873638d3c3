// src/controllers/department_form.rs

//! Department create/edit form.
//!
//! Create mode edits a dynamic list of course entries that is sent with the
//! department. Edit mode only changes the name and status; courses of an
//! existing department are managed elsewhere.

use std::sync::Arc;
use std::time::Duration;

use super::form::{FormMode, FormState, FormStatus, Navigation, SubmitOutcome};
use super::normalize::{canonical_name, collapse_whitespace, display_name, optional_text};
use super::validation::{DEPARTMENT_NAME, Field, Rule};
use crate::error::{AppError, Result};
use crate::models::{CreateDepartmentRequest, Department, NewCourse, UpdateDepartmentRequest};
use crate::routes::Route;
use crate::services::RemoteGateway;

pub const DEPARTMENT_ADDED: &str = "Department added successfully!";
pub const DEPARTMENT_UPDATED: &str = "Department updated successfully!";

/// One row of the dynamic course list.
///
/// `key` stays with the row when rows before it are removed.
#[derive(Debug, Clone)]
pub struct CourseEntry {
    key: u64,
    name: Field,
    description: Field,
}

impl CourseEntry {
    fn new(key: u64) -> Self {
        Self {
            key,
            name: Field::new(vec![Rule::Required]),
            description: Field::new(Vec::new()),
        }
    }

    pub fn key(&self) -> u64 {
        self.key
    }

    pub fn name(&self) -> &Field {
        &self.name
    }

    pub fn description(&self) -> &Field {
        &self.description
    }

    pub fn is_valid(&self) -> bool {
        self.name.is_valid() && self.description.is_valid()
    }

    fn to_request(&self) -> NewCourse {
        NewCourse {
            name: collapse_whitespace(self.name.value()),
            description: optional_text(self.description.value()),
        }
    }
}

pub struct DepartmentForm {
    gateway: Arc<dyn RemoteGateway>,
    mode: FormMode<i64>,
    state: FormState,
    name: Field,
    status: bool,
    courses: Vec<CourseEntry>,
    next_key: u64,
    redirect_delay: Duration,
}

impl DepartmentForm {
    fn with_mode(
        gateway: Arc<dyn RemoteGateway>,
        mode: FormMode<i64>,
        redirect_delay: Duration,
    ) -> Self {
        let state = if mode.is_edit() {
            FormState::loading()
        } else {
            FormState::idle()
        };
        Self {
            gateway,
            mode,
            state,
            name: Field::new(vec![Rule::Required, Rule::Pattern(&DEPARTMENT_NAME)]),
            status: true,
            courses: Vec::new(),
            next_key: 0,
            redirect_delay,
        }
    }

    pub fn create(gateway: Arc<dyn RemoteGateway>, redirect_delay: Duration) -> Self {
        Self::with_mode(gateway, FormMode::Create, redirect_delay)
    }

    pub fn edit(gateway: Arc<dyn RemoteGateway>, id: i64, redirect_delay: Duration) -> Self {
        Self::with_mode(gateway, FormMode::Edit(id), redirect_delay)
    }

    /// Form for `/departments/new` or `/departments/edit/:id`.
    pub fn for_route(
        gateway: Arc<dyn RemoteGateway>,
        route: &Route,
        redirect_delay: Duration,
    ) -> Option<Self> {
        match route {
            Route::NewDepartment => Some(Self::create(gateway, redirect_delay)),
            Route::EditDepartment(id) => Some(Self::edit(gateway, *id, redirect_delay)),
            _ => None,
        }
    }

    pub fn mode(&self) -> &FormMode<i64> {
        &self.mode
    }

    pub fn status(&self) -> &FormStatus {
        self.state.status()
    }

    pub fn name(&self) -> &Field {
        &self.name
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> bool {
        self.name.set(value)
    }

    pub fn active(&self) -> bool {
        self.status
    }

    pub fn set_active(&mut self, active: bool) {
        self.status = active;
    }

    pub fn courses(&self) -> &[CourseEntry] {
        &self.courses
    }

    /// Append an empty course row. Refused in edit mode.
    pub fn add_course(&mut self) -> Option<u64> {
        if self.mode.is_edit() {
            return None;
        }
        let key = self.next_key;
        self.next_key += 1;
        self.courses.push(CourseEntry::new(key));
        Some(key)
    }

    /// Remove the row at `index`. Later rows keep their values and flags.
    pub fn remove_course(&mut self, index: usize) -> Option<CourseEntry> {
        (index < self.courses.len()).then(|| self.courses.remove(index))
    }

    pub fn set_course_name(&mut self, index: usize, value: impl Into<String>) -> bool {
        self.courses
            .get_mut(index)
            .is_some_and(|entry| entry.name.set(value))
    }

    pub fn set_course_description(&mut self, index: usize, value: impl Into<String>) -> bool {
        self.courses
            .get_mut(index)
            .is_some_and(|entry| entry.description.set(value))
    }

    pub fn is_valid(&self) -> bool {
        self.name.is_valid() && self.courses.iter().all(CourseEntry::is_valid)
    }

    fn touch_all(&mut self) {
        self.name.touch();
        for entry in &mut self.courses {
            entry.name.touch();
            entry.description.touch();
        }
    }

    /// Fetch the department being edited. No-op in create mode.
    pub async fn load(&mut self) -> Result<()> {
        let FormMode::Edit(id) = self.mode else {
            return Ok(());
        };
        match self.gateway.get_department(id).await {
            Ok(department) => {
                self.fill_from(&department);
                self.state.finish_loading();
                Ok(())
            }
            Err(e) => {
                log::error!("Department form load failed: {}", e);
                self.state.fail(e.user_message());
                Err(e)
            }
        }
    }

    fn fill_from(&mut self, department: &Department) {
        self.name.patch(display_name(&department.name));
        self.status = department.active;
    }

    /// Body for `POST /departments`. New departments always start active.
    pub fn create_payload(&self) -> CreateDepartmentRequest {
        CreateDepartmentRequest {
            name: canonical_name(self.name.value()),
            courses: self.courses.iter().map(CourseEntry::to_request).collect(),
            status: true,
        }
    }

    /// Body for `PUT /departments/{id}`.
    pub fn update_payload(&self) -> UpdateDepartmentRequest {
        UpdateDepartmentRequest {
            name: canonical_name(self.name.value()),
            status: self.status,
        }
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if !self.state.can_submit() {
            return Err(AppError::transition(format!(
                "department form is {:?}",
                self.state.status()
            )));
        }
        if !self.is_valid() {
            self.touch_all();
            return Ok(SubmitOutcome::Invalid);
        }
        self.state.begin_submit()?;

        let (result, success) = match self.mode {
            FormMode::Create => (
                self.gateway.create_department(&self.create_payload()).await,
                DEPARTMENT_ADDED,
            ),
            FormMode::Edit(id) => (
                self.gateway
                    .update_department(id, &self.update_payload())
                    .await,
                DEPARTMENT_UPDATED,
            ),
        };

        match result {
            Ok(department) => {
                log::info!("Saved department {} ({})", department.name, department.id);
                self.state.succeed(success);
                Ok(SubmitOutcome::Saved(Navigation {
                    route: Route::Departments,
                    after: self.redirect_delay,
                }))
            }
            Err(e) => {
                log::error!("Department submit failed: {}", e);
                let message = e.user_message();
                self.state.fail(message.clone());
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Offline;

    fn form() -> DepartmentForm {
        DepartmentForm::create(Arc::new(Offline), Duration::ZERO)
    }

    #[test]
    fn test_create_payload_canonical() {
        let mut form = form();
        form.set_name(" computer   science ");
        form.add_course();
        form.set_course_name(0, "  Data  Structures ");
        form.set_course_description(0, "   ");

        let payload = form.create_payload();
        assert_eq!(payload.name, "COMPUTER_SCIENCE");
        assert!(payload.status);
        assert_eq!(
            payload.courses,
            vec![NewCourse {
                name: "Data Structures".into(),
                description: None,
            }]
        );
    }

    #[test]
    fn test_remove_keeps_later_rows() {
        let mut form = form();
        for _ in 0..3 {
            form.add_course();
        }
        form.set_course_name(0, "A");
        form.set_course_name(2, "C");
        let removed = form.remove_course(1).unwrap();
        assert_eq!(removed.key(), 1);

        let rows = form.courses();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key(), 2);
        assert_eq!(rows[1].name().value(), "C");
        assert!(rows[1].name().is_dirty());
        assert!(form.remove_course(5).is_none());
    }

    #[test]
    fn test_blank_course_blocks_submit() {
        let mut form = form();
        form.set_name("Physics");
        assert!(form.is_valid());
        form.add_course();
        assert!(!form.is_valid());
    }

    #[test]
    fn test_edit_mode_has_no_course_rows() {
        let mut form = DepartmentForm::edit(Arc::new(Offline), 4, Duration::ZERO);
        assert!(form.add_course().is_none());
        assert_eq!(form.status(), &FormStatus::Loading);
    }

    #[test]
    fn test_name_pattern() {
        let mut form = form();
        form.set_name("Civil_Engineering");
        assert!(form.name().is_valid());
        form.set_name("Math 101");
        assert!(!form.name().is_valid());
    }
}
