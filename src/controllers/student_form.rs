// src/controllers/student_form.rs

//! Student create/edit form.
//!
//! Edit mode always fetches the record by its business id; a record passed
//! in by the caller only paints the form early. Selecting a department
//! clears the selected courses and loads the new department's course list.

use std::sync::Arc;
use std::time::Duration;

use super::form::{FormMode, FormState, FormStatus, Navigation, SubmitOutcome};
use super::normalize::collapse_whitespace;
use super::validation::{Field, PERSON_NAME, Rule};
use crate::error::{AppError, Result};
use crate::models::{
    Course, CreateStudentRequest, Department, Student, UpdateStudentRequest,
};
use crate::routes::Route;
use crate::services::RemoteGateway;

pub const STUDENT_ADDED: &str = "Student added successfully!";
pub const STUDENT_UPDATED: &str = "Student updated successfully!";

/// Text inputs of the student form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentField {
    StudentId,
    FirstName,
    LastName,
    Email,
}

impl StudentField {
    pub const ALL: [StudentField; 4] = [
        StudentField::StudentId,
        StudentField::FirstName,
        StudentField::LastName,
        StudentField::Email,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StudentField::StudentId => "Student ID",
            StudentField::FirstName => "First name",
            StudentField::LastName => "Last name",
            StudentField::Email => "Email",
        }
    }
}

/// Identifies one course-option load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseLoad {
    version: u64,
    department_id: i64,
}

impl CourseLoad {
    pub fn department_id(&self) -> i64 {
        self.department_id
    }
}

pub struct StudentForm {
    gateway: Arc<dyn RemoteGateway>,
    mode: FormMode<String>,
    state: FormState,
    student_id: Field,
    first_name: Field,
    last_name: Field,
    email: Field,
    department_id: Option<i64>,
    department_touched: bool,
    course_ids: Vec<i64>,
    department_options: Vec<Department>,
    course_options: Vec<Course>,
    course_load_version: u64,
    redirect_delay: Duration,
}

impl StudentForm {
    fn with_mode(
        gateway: Arc<dyn RemoteGateway>,
        mode: FormMode<String>,
        redirect_delay: Duration,
    ) -> Self {
        let mut student_id = Field::new(vec![Rule::Required, Rule::MaxLength(100)]);
        let state = match &mode {
            FormMode::Create => FormState::idle(),
            FormMode::Edit(id) => {
                student_id.patch(id.clone());
                student_id.disable();
                FormState::loading()
            }
        };
        let person = || Field::new(vec![Rule::Required, Rule::MinLength(2), Rule::Pattern(&PERSON_NAME)]);

        Self {
            gateway,
            mode,
            state,
            student_id,
            first_name: person(),
            last_name: person(),
            email: Field::new(vec![Rule::Required, Rule::Email]),
            department_id: None,
            department_touched: false,
            course_ids: Vec::new(),
            department_options: Vec::new(),
            course_options: Vec::new(),
            course_load_version: 0,
            redirect_delay,
        }
    }

    pub fn create(gateway: Arc<dyn RemoteGateway>, redirect_delay: Duration) -> Self {
        Self::with_mode(gateway, FormMode::Create, redirect_delay)
    }

    pub fn edit(
        gateway: Arc<dyn RemoteGateway>,
        student_id: impl Into<String>,
        redirect_delay: Duration,
    ) -> Self {
        Self::with_mode(gateway, FormMode::Edit(student_id.into()), redirect_delay)
    }

    /// Form for `/students/new` or `/students/edit/:id`.
    pub fn for_route(
        gateway: Arc<dyn RemoteGateway>,
        route: &Route,
        redirect_delay: Duration,
    ) -> Option<Self> {
        match route {
            Route::NewStudent => Some(Self::create(gateway, redirect_delay)),
            Route::EditStudent(id) => Some(Self::edit(gateway, id.clone(), redirect_delay)),
            _ => None,
        }
    }

    pub fn mode(&self) -> &FormMode<String> {
        &self.mode
    }

    pub fn status(&self) -> &FormStatus {
        self.state.status()
    }

    pub fn field(&self, which: StudentField) -> &Field {
        match which {
            StudentField::StudentId => &self.student_id,
            StudentField::FirstName => &self.first_name,
            StudentField::LastName => &self.last_name,
            StudentField::Email => &self.email,
        }
    }

    fn field_mut(&mut self, which: StudentField) -> &mut Field {
        match which {
            StudentField::StudentId => &mut self.student_id,
            StudentField::FirstName => &mut self.first_name,
            StudentField::LastName => &mut self.last_name,
            StudentField::Email => &mut self.email,
        }
    }

    /// User edit of a text input. Returns `false` for a disabled input.
    pub fn set(&mut self, which: StudentField, value: impl Into<String>) -> bool {
        self.field_mut(which).set(value)
    }

    pub fn department_id(&self) -> Option<i64> {
        self.department_id
    }

    pub fn department_error(&self) -> bool {
        self.department_id.is_none()
    }

    pub fn department_options(&self) -> &[Department] {
        &self.department_options
    }

    pub fn course_options(&self) -> &[Course] {
        &self.course_options
    }

    pub fn course_ids(&self) -> &[i64] {
        &self.course_ids
    }

    pub fn is_valid(&self) -> bool {
        StudentField::ALL.iter().all(|f| self.field(*f).is_valid()) && !self.department_error()
    }

    fn touch_all(&mut self) {
        for which in StudentField::ALL {
            self.field_mut(which).touch();
        }
        self.department_touched = true;
    }

    pub fn department_touched(&self) -> bool {
        self.department_touched
    }

    /// Paint the form from a record already in hand.
    ///
    /// The record is not trusted as the edit target; [`StudentForm::load`]
    /// still fetches it.
    pub fn prefill(&mut self, student: &Student) {
        if let FormMode::Edit(id) = &self.mode {
            if *id == student.student_id {
                self.fill_from(student);
            }
        }
    }

    fn fill_from(&mut self, student: &Student) {
        self.student_id.patch(student.student_id.clone());
        self.first_name.patch(student.first_name.clone());
        self.last_name.patch(student.last_name.clone());
        self.email.patch(student.email.clone());
        self.department_id = student.department.as_ref().map(|d| d.id);
        self.course_ids = student.courses.iter().map(|c| c.id).collect();
    }

    /// Load department options and, in edit mode, the student itself.
    pub async fn load(&mut self) -> Result<()> {
        let result = self.load_inner().await;
        match &result {
            Ok(()) => self.state.finish_loading(),
            Err(e) => {
                log::error!("Student form load failed: {}", e);
                self.state.fail(e.user_message());
            }
        }
        result
    }

    async fn load_inner(&mut self) -> Result<()> {
        self.department_options = self.gateway.active_departments().await?;

        let FormMode::Edit(id) = &self.mode else {
            return Ok(());
        };
        let student = self.gateway.get_student(id).await?;
        self.fill_from(&student);

        // Courses of the loaded department; the student's own selection stays.
        if let Some(department_id) = self.department_id {
            self.course_options = self.gateway.list_courses(Some(department_id)).await?;
        }
        Ok(())
    }

    /// Select a department. Always clears the selected courses.
    ///
    /// Returns the course load to run for the new department, if any.
    pub fn choose_department(&mut self, department_id: Option<i64>) -> Option<CourseLoad> {
        self.department_id = department_id;
        self.department_touched = true;
        self.course_ids.clear();
        self.course_options.clear();
        self.course_load_version += 1;
        department_id.map(|department_id| CourseLoad {
            version: self.course_load_version,
            department_id,
        })
    }

    /// Apply loaded course options if `load` is still the latest request.
    pub fn complete_course_load(&mut self, load: CourseLoad, result: Result<Vec<Course>>) -> bool {
        if load.version != self.course_load_version {
            log::debug!(
                "Dropping course options for department {}",
                load.department_id
            );
            return false;
        }
        match result {
            Ok(courses) => self.course_options = courses,
            Err(e) => {
                log::error!(
                    "Failed to load courses for department {}: {}",
                    load.department_id,
                    e
                );
                self.course_options.clear();
            }
        }
        true
    }

    /// Select a department and wait for its courses.
    pub async fn select_department(&mut self, department_id: Option<i64>) -> bool {
        let Some(load) = self.choose_department(department_id) else {
            return false;
        };
        let result = self.gateway.list_courses(Some(load.department_id)).await;
        self.complete_course_load(load, result)
    }

    /// Add or remove a course from the selection.
    pub fn toggle_course(&mut self, course_id: i64) {
        match self.course_ids.iter().position(|&id| id == course_id) {
            Some(index) => {
                self.course_ids.remove(index);
            }
            None => self.course_ids.push(course_id),
        }
    }

    pub fn set_courses(&mut self, course_ids: Vec<i64>) {
        self.course_ids = course_ids;
    }

    /// Normalized body for `POST /students`.
    pub fn create_payload(&self) -> CreateStudentRequest {
        CreateStudentRequest {
            student_id: self.student_id.value().trim().to_string(),
            first_name: collapse_whitespace(self.first_name.value()),
            last_name: collapse_whitespace(self.last_name.value()),
            email: self.email.value().trim().to_string(),
            department_id: self.department_id,
            course_ids: self.course_ids.clone(),
        }
    }

    /// Normalized body for `PUT /students/{studentId}`.
    pub fn update_payload(&self) -> UpdateStudentRequest {
        UpdateStudentRequest {
            first_name: collapse_whitespace(self.first_name.value()),
            last_name: collapse_whitespace(self.last_name.value()),
            email: self.email.value().trim().to_string(),
            department_id: self.department_id,
            course_ids: self.course_ids.clone(),
        }
    }

    /// Validate, send, and move the status machine.
    ///
    /// Fails only when the form is not in a submittable state.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        if !self.state.can_submit() {
            return Err(AppError::transition(format!(
                "student form is {:?}",
                self.state.status()
            )));
        }
        if !self.is_valid() {
            self.touch_all();
            return Ok(SubmitOutcome::Invalid);
        }
        self.state.begin_submit()?;

        let (result, success) = match &self.mode {
            FormMode::Create => (
                self.gateway.create_student(&self.create_payload()).await,
                STUDENT_ADDED,
            ),
            FormMode::Edit(id) => (
                self.gateway.update_student(id, &self.update_payload()).await,
                STUDENT_UPDATED,
            ),
        };

        match result {
            Ok(_) => {
                self.state.succeed(success);
                Ok(SubmitOutcome::Saved(Navigation {
                    route: Route::Students,
                    after: self.redirect_delay,
                }))
            }
            Err(e) => {
                log::error!("Student submit failed: {}", e);
                let message = e.user_message();
                self.state.fail(message.clone());
                Ok(SubmitOutcome::Rejected(message))
            }
        }
    }
}
