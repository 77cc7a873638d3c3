// src/services/gateway.rs

//! Remote data gateway.
//!
//! The only place in the crate that talks HTTP. Controllers depend on the
//! [`RemoteGateway`] trait so they can be driven by an in-memory backend in
//! tests.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{
    ApiConfig, ApiResponse, Course, CreateDepartmentRequest, CreateStudentRequest, Department,
    ExportFormat, FormMessage, Page, Student, UpdateDepartmentRequest, UpdateStudentRequest,
};
use crate::query::QueryState;
use crate::utils::http::create_async_client;

/// Path prefix of every backend endpoint.
pub const API_PREFIX: &str = "api/v1";

/// Every backend call the client makes.
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn list_students(&self, query: &QueryState) -> Result<Page<Student>>;

    async fn get_student(&self, student_id: &str) -> Result<Student>;

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student>;

    async fn update_student(
        &self,
        student_id: &str,
        request: &UpdateStudentRequest,
    ) -> Result<Student>;

    async fn toggle_student_status(&self, student_id: &str) -> Result<Student>;

    /// Export file bytes for the filter and status of `query`.
    async fn download_students(&self, format: ExportFormat, query: &QueryState)
    -> Result<Vec<u8>>;

    async fn list_departments(&self, query: &QueryState) -> Result<Page<Department>>;

    async fn active_departments(&self) -> Result<Vec<Department>>;

    async fn get_department(&self, id: i64) -> Result<Department>;

    async fn create_department(&self, request: &CreateDepartmentRequest) -> Result<Department>;

    async fn update_department(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Department>;

    async fn toggle_department_status(&self, id: i64) -> Result<Department>;

    async fn list_courses(&self, department_id: Option<i64>) -> Result<Vec<Course>>;
}

/// [`RemoteGateway`] over the backend's REST API.
#[derive(Clone)]
pub struct HttpGateway {
    client: Client,
    base: Url,
}

impl HttpGateway {
    /// Build a gateway with its own client from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let client = create_async_client(config)?;
        Self::new(client, &config.base_url)
    }

    /// Build a gateway around an existing client.
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        if base.cannot_be_a_base() {
            return Err(AppError::config(format!("{base_url} cannot be a base URL")));
        }
        base.path_segments_mut()
            .map_err(|_| AppError::config(format!("{base_url} cannot be a base URL")))?
            .pop_if_empty()
            .extend(API_PREFIX.split('/'));
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Endpoint URL with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn with_params(mut url: Url, params: &[(&str, String)]) -> Url {
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        url
    }

    fn json_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: &B,
    ) -> Result<RequestBuilder> {
        let bytes = serde_json::to_vec(body)?;
        Ok(self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .body(bytes))
    }

    /// Send and return the raw body of a successful response.
    async fn send_raw(&self, request: RequestBuilder, what: &str) -> Result<Vec<u8>> {
        let response = request.send().await.inspect_err(|e| {
            log::error!("Request for {} failed: {}", what, e);
        })?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            log::warn!("{} not found ({})", what, url);
            return Err(AppError::not_found(what));
        }
        if !status.is_success() {
            let message = FormMessage::from_error_body(&body);
            log::error!("{} {} -> {}: {}", what, url, status, message);
            return Err(AppError::api(status.as_u16(), message));
        }

        log::debug!("{} {} -> {} ({} bytes)", what, url, status, body.len());
        Ok(body.to_vec())
    }

    /// Send and unwrap the `data` field of the response envelope.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let body = self.send_raw(request, what).await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&body)?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl RemoteGateway for HttpGateway {
    async fn list_students(&self, query: &QueryState) -> Result<Page<Student>> {
        let url = Self::with_params(self.endpoint(&["students"]), &query.list_params());
        self.send(self.client.get(url), "Student list").await
    }

    async fn get_student(&self, student_id: &str) -> Result<Student> {
        let url = self.endpoint(&["students", student_id]);
        self.send(self.client.get(url), &format!("Student {student_id}"))
            .await
    }

    async fn create_student(&self, request: &CreateStudentRequest) -> Result<Student> {
        let url = self.endpoint(&["students"]);
        let builder = self.json_request(Method::POST, url, request)?;
        self.send(builder, "Student").await
    }

    async fn update_student(
        &self,
        student_id: &str,
        request: &UpdateStudentRequest,
    ) -> Result<Student> {
        let url = self.endpoint(&["students", student_id]);
        let builder = self.json_request(Method::PUT, url, request)?;
        self.send(builder, &format!("Student {student_id}")).await
    }

    async fn toggle_student_status(&self, student_id: &str) -> Result<Student> {
        let url = self.endpoint(&["students", student_id, "toggle-status"]);
        let builder = self.json_request(Method::PATCH, url, &serde_json::json!({}))?;
        self.send(builder, &format!("Student {student_id}")).await
    }

    async fn download_students(
        &self,
        format: ExportFormat,
        query: &QueryState,
    ) -> Result<Vec<u8>> {
        let url = Self::with_params(
            self.endpoint(&["students", "download", format.as_str()]),
            &query.filter_params(),
        );
        // Overrides the client's JSON-only default.
        let accept = format!("{}, */*", format.mime_type());
        let request = self.client.get(url).header(ACCEPT, accept);
        self.send_raw(request, "Student export").await
    }

    async fn list_departments(&self, query: &QueryState) -> Result<Page<Department>> {
        let url = Self::with_params(self.endpoint(&["departments"]), &query.list_params());
        self.send(self.client.get(url), "Department list").await
    }

    async fn active_departments(&self) -> Result<Vec<Department>> {
        let url = self.endpoint(&["departments", "active"]);
        self.send(self.client.get(url), "Active departments").await
    }

    async fn get_department(&self, id: i64) -> Result<Department> {
        let url = self.endpoint(&["departments", &id.to_string()]);
        self.send(self.client.get(url), &format!("Department {id}"))
            .await
    }

    async fn create_department(&self, request: &CreateDepartmentRequest) -> Result<Department> {
        let url = self.endpoint(&["departments"]);
        let builder = self.json_request(Method::POST, url, request)?;
        self.send(builder, "Department").await
    }

    async fn update_department(
        &self,
        id: i64,
        request: &UpdateDepartmentRequest,
    ) -> Result<Department> {
        let url = self.endpoint(&["departments", &id.to_string()]);
        let builder = self.json_request(Method::PUT, url, request)?;
        self.send(builder, &format!("Department {id}")).await
    }

    async fn toggle_department_status(&self, id: i64) -> Result<Department> {
        let url = self.endpoint(&["departments", &id.to_string(), "toggle-status"]);
        let builder = self.json_request(Method::PATCH, url, &serde_json::json!({}))?;
        self.send(builder, &format!("Department {id}")).await
    }

    async fn list_courses(&self, department_id: Option<i64>) -> Result<Vec<Course>> {
        let params: Vec<(&str, String)> = department_id
            .map(|id| vec![("departmentId", id.to_string())])
            .unwrap_or_default();
        let url = Self::with_params(self.endpoint(&["courses"]), &params);
        self.send(self.client.get(url), "Course list").await
    }
}
