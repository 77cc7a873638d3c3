//! In-memory backend shared by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use roster::error::{AppError, Result};
use roster::models::{
    Course, CreateDepartmentRequest, CreateStudentRequest, Department, DepartmentRef,
    ExportFormat, FormMessage, Page, Student, UpdateDepartmentRequest, UpdateStudentRequest,
};
use roster::query::QueryState;
use roster::services::RemoteGateway;
use tokio::time::Instant;

/// A recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListStudents(QueryState),
    GetStudent(String),
    CreateStudent(CreateStudentRequest),
    UpdateStudent(String, UpdateStudentRequest),
    ToggleStudent(String),
    Download(ExportFormat, QueryState),
    ListDepartments(QueryState),
    ActiveDepartments,
    GetDepartment(i64),
    CreateDepartment(CreateDepartmentRequest),
    UpdateDepartment(i64, UpdateDepartmentRequest),
    ToggleDepartment(i64),
    ListCourses(Option<i64>),
}

#[derive(Default)]
pub struct FakeBackend {
    students: Mutex<Vec<Student>>,
    departments: Mutex<Vec<Department>>,
    calls: Mutex<Vec<(Instant, Call)>>,
    filter_delays: Mutex<HashMap<String, Duration>>,
    fail_lists: Mutex<bool>,
    reject_writes: Mutex<Option<(u16, FormMessage)>>,
}

impl FakeBackend {
    pub fn new(students: Vec<Student>, departments: Vec<Department>) -> Self {
        Self {
            students: Mutex::new(students),
            departments: Mutex::new(departments),
            ..Default::default()
        }
    }

    /// Delay list responses for queries with this filter text.
    pub fn delay_filter(&self, filter: &str, delay: Duration) {
        self.filter_delays
            .lock()
            .unwrap()
            .insert(filter.to_string(), delay);
    }

    pub fn fail_lists(&self, fail: bool) {
        *self.fail_lists.lock().unwrap() = fail;
    }

    /// Reject the next create/update with this status and message.
    pub fn reject_next_write(&self, status: u16, message: FormMessage) {
        *self.reject_writes.lock().unwrap() = Some((status, message));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn timed_calls(&self) -> Vec<(Instant, Call)> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that write to the backend.
    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| {
                matches!(
                    c,
                    Call::CreateStudent(_)
                        | Call::UpdateStudent(..)
                        | Call::ToggleStudent(_)
                        | Call::CreateDepartment(_)
                        | Call::UpdateDepartment(..)
                        | Call::ToggleDepartment(_)
                )
            })
            .collect()
    }

    pub fn student_list_filters(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::ListStudents(q) => Some(q.filter),
                _ => None,
            })
            .collect()
    }

    pub fn department(&self, id: i64) -> Option<Department> {
        self.departments
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push((Instant::now(), call));
    }

    fn take_rejection(&self) -> Result<()> {
        match self.reject_writes.lock().unwrap().take() {
            Some((status, message)) => Err(AppError::api(status, message)),
            None => Ok(()),
        }
    }

    async fn list_delay(&self, query: &QueryState) -> Result<()> {
        let delay = self.filter_delays.lock().unwrap().get(&query.filter).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if *self.fail_lists.lock().unwrap() {
            return Err(AppError::api(500, FormMessage::Single("boom".into())));
        }
        Ok(())
    }

    fn department_ref(&self, id: Option<i64>) -> Option<DepartmentRef> {
        let id = id?;
        self.department(id).map(|d| DepartmentRef { id: d.id, name: d.name })
    }

    fn courses_by_id(&self, ids: &[i64]) -> Vec<Course> {
        let departments = self.departments.lock().unwrap();
        ids.iter()
            .filter_map(|id| {
                departments
                    .iter()
                    .flat_map(|d| d.courses.iter())
                    .find(|c| c.id == *id)
                    .cloned()
            })
            .collect()
    }
}

fn paginate<T: Clone>(items: Vec<T>, query: &QueryState) -> Page<T> {
    let size = query.size.max(1) as usize;
    let total = items.len();
    let content = items
        .into_iter()
        .skip(query.page as usize * size)
        .take(size)
        .collect();
    Page {
        content,
        total_elements: total as u64,
        total_pages: total.div_ceil(size) as u32,
    }
}

fn matches_status(active: bool, query: &QueryState) -> bool {
    query.status.is_active().is_none_or(|want| want == active)
}

#[async_trait]
impl RemoteGateway for FakeBackend {
    async fn list_students(&self, query: &QueryState) -> Result<Page<Student>> {
        self.record(Call::ListStudents(query.clone()));
        self.list_delay(query).await?;
        let needle = query.filter.to_lowercase();
        let items: Vec<Student> = self
            .students
            .lock()
            .unwrap()
            .iter()
            .filter(|s| matches_status(s.active, query))
            .filter(|s| {
                needle.is_empty()
                    || s.full_name().to_lowercase().contains(&needle)
                    || s.student_id.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();
        Ok(paginate(items, query))
    }

    async fn get_student(&self, student_id: &str) -> Result<Student> {
        self.record(Call::GetStudent(student_id.to_string()));
        self.students
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.student_id == student_id)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Student {student_id}")))
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        self.record(Call::CreateStudent(request.clone()));
        self.take_rejection()?;
        let department = self.department_ref(request.department_id);
        let courses = self.courses_by_id(&request.course_ids);
        let mut students = self.students.lock().unwrap();
        let student = Student {
            id: students.len() as i64 + 1,
            student_id: request.student_id.clone(),
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            department,
            courses,
            active: true,
            created_at: String::new(),
            updated_at: String::new(),
        };
        students.push(student.clone());
        Ok(student)
    }

    async fn update_student(
        &self,
        student_id: &str,
        request: &UpdateStudentRequest,
    ) -> Result<Student> {
        self.record(Call::UpdateStudent(student_id.to_string(), request.clone()));
        self.take_rejection()?;
        let department = self.department_ref(request.department_id);
        let courses = self.courses_by_id(&request.course_ids);
        let mut students = self.students.lock().unwrap();
        let student = students
            .iter_mut()
            .find(|s| s.student_id == student_id)
            .ok_or_else(|| AppError::not_found(format!("Student {student_id}")))?;
        student.first_name = request.first_name.clone();
        student.last_name = request.last_name.clone();
        student.email = request.email.clone();
        student.department = department;
        student.courses = courses;
        Ok(student.clone())
    }

    async fn toggle_student_status(&self, student_id: &str) -> Result<Student> {
        self.record(Call::ToggleStudent(student_id.to_string()));
        let mut students = self.students.lock().unwrap();
        let student = students
            .iter_mut()
            .find(|s| s.student_id == student_id)
            .ok_or_else(|| AppError::not_found(format!("Student {student_id}")))?;
        student.active = !student.active;
        Ok(student.clone())
    }

    async fn download_students(&self, format: ExportFormat, query: &QueryState) -> Result<Vec<u8>> {
        self.record(Call::Download(format, query.clone()));
        Ok(format!("{}:{}", format, query.filter).into_bytes())
    }

    async fn list_departments(&self, query: &QueryState) -> Result<Page<Department>> {
        self.record(Call::ListDepartments(query.clone()));
        self.list_delay(query).await?;
        let needle = query.filter.to_lowercase();
        let items: Vec<Department> = self
            .departments
            .lock()
            .unwrap()
            .iter()
            .filter(|d| matches_status(d.active, query))
            .filter(|d| needle.is_empty() || d.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        Ok(paginate(items, query))
    }

    async fn active_departments(&self) -> Result<Vec<Department>> {
        self.record(Call::ActiveDepartments);
        Ok(self
            .departments
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.active)
            .cloned()
            .collect())
    }

    async fn get_department(&self, id: i64) -> Result<Department> {
        self.record(Call::GetDepartment(id));
        self.department(id)
            .ok_or_else(|| AppError::not_found(format!("Department {id}")))
    }

    async fn create_department(&self, request: &CreateDepartmentRequest) -> Result<Department> {
        self.record(Call::CreateDepartment(request.clone()));
        self.take_rejection()?;
        let mut departments = self.departments.lock().unwrap();
        let id = departments.len() as i64 + 1;
        let department = Department {
            id,
            name: request.name.clone(),
            active: request.status,
            courses: request
                .courses
                .iter()
                .enumerate()
                .map(|(i, c)| Course {
                    id: id * 100 + i as i64,
                    name: c.name.clone(),
                    description: c.description.clone(),
                    active: true,
                })
                .collect(),
        };
        departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Department> {
        self.record(Call::UpdateDepartment(id, request.clone()));
        self.take_rejection()?;
        let mut departments = self.departments.lock().unwrap();
        let department = departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found(format!("Department {id}")))?;
        department.name = request.name.clone();
        department.active = request.status;
        Ok(department.clone())
    }

    async fn toggle_department_status(&self, id: i64) -> Result<Department> {
        self.record(Call::ToggleDepartment(id));
        let mut departments = self.departments.lock().unwrap();
        let department = departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::not_found(format!("Department {id}")))?;
        department.active = !department.active;
        let active = department.active;
        for course in &mut department.courses {
            course.active = active;
        }
        Ok(department.clone())
    }

    async fn list_courses(&self, department_id: Option<i64>) -> Result<Vec<Course>> {
        self.record(Call::ListCourses(department_id));
        let departments = self.departments.lock().unwrap();
        Ok(departments
            .iter()
            .filter(|d| department_id.is_none_or(|id| d.id == id))
            .flat_map(|d| d.courses.iter().cloned())
            .collect())
    }
}

pub fn course(id: i64, name: &str) -> Course {
    Course {
        id,
        name: name.to_string(),
        description: None,
        active: true,
    }
}

pub fn department(id: i64, name: &str, courses: Vec<Course>) -> Department {
    Department {
        id,
        name: name.to_string(),
        active: true,
        courses,
    }
}

pub fn student(id: i64, student_id: &str, first: &str, last: &str) -> Student {
    Student {
        id,
        student_id: student_id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.edu", first.to_lowercase()),
        department: None,
        courses: Vec::new(),
        active: true,
        created_at: "2025-01-01T00:00:00".to_string(),
        updated_at: "2025-01-01T00:00:00".to_string(),
    }
}

/// Two departments sharing course 12 (it appears under both ids).
pub fn sample_departments() -> Vec<Department> {
    vec![
        department(
            1,
            "COMPUTER_SCIENCE",
            vec![course(11, "Algorithms"), course(12, "Ethics")],
        ),
        department(2, "PHILOSOPHY", vec![course(12, "Ethics"), course(21, "Logic")]),
    ]
}

pub fn sample_students() -> Vec<Student> {
    let mut jane = student(1, "S100", "Jane", "Doe");
    jane.department = Some(DepartmentRef {
        id: 1,
        name: "COMPUTER_SCIENCE".into(),
    });
    jane.courses = vec![course(11, "Algorithms")];
    vec![
        jane,
        student(2, "S101", "John", "Smith"),
        student(3, "S102", "Alice", "Li"),
    ]
}
