//! REST boundary: trait seams plus reqwest implementations.
//!
//! Requests are asynchronous, not cancellable in flight, and never retried
//! automatically; timeouts come from the shared HTTP client configuration.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use portview_core::config::ClientConfig;
use portview_core::domain::project::Project;
use portview_core::domain::role::{
    ApprovedEmployee, PendingRoleRequest, Programme, ProgrammeId, RejectedRoleRequest, RequestId,
};
use portview_core::forms::NewProjectInput;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("invalid response payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            return Self::Decode(error.to_string());
        }
        Self::Transport(error.to_string())
    }
}

#[async_trait]
pub trait PortfolioApi: Send + Sync {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;
    async fn create_project(&self, input: &NewProjectInput) -> Result<Project, ApiError>;
    async fn update_project(&self, project: &Project) -> Result<Project, ApiError>;
}

#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn pending_requests(&self) -> Result<Vec<PendingRoleRequest>, ApiError>;
    async fn approved_employees(&self) -> Result<Vec<ApprovedEmployee>, ApiError>;
    async fn rejected_requests(&self) -> Result<Vec<RejectedRoleRequest>, ApiError>;
    async fn programmes(&self) -> Result<Vec<Programme>, ApiError>;
    async fn approve_request(
        &self,
        id: &RequestId,
        programme_id: Option<&ProgrammeId>,
    ) -> Result<ApprovedEmployee, ApiError>;
    async fn reject_request(&self, id: &RequestId, reason: &str) -> Result<(), ApiError>;
}

/// Error body shape shared with the server (`{"error": "..."}`).
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

fn build_http_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs.max(1)))
        .build()
        .map_err(|error| ApiError::Transport(error.to_string()))
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };

    Err(ApiError::Status { status: status.as_u16(), message })
}

#[derive(Clone)]
pub struct HttpPortfolioApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPortfolioApi {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        let response = self.http.get(self.url("/api/projects")).send().await?;
        let response = check_status(response).await?;
        response.json().await.map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn create_project(&self, input: &NewProjectInput) -> Result<Project, ApiError> {
        let body = serde_json::json!({
            "name": input.name,
            "category": input.category,
            "totalBudget": input.total_budget,
            "description": input.description,
        });

        let response =
            self.http.post(self.url("/api/projects")).json(&body).send().await?;
        let response = check_status(response).await?;
        response.json().await.map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn update_project(&self, project: &Project) -> Result<Project, ApiError> {
        let path = format!("/api/projects/{}", project.id.0);
        let response = self.http.put(self.url(&path)).json(project).send().await?;
        let response = check_status(response).await?;
        response.json().await.map_err(|error| ApiError::Decode(error.to_string()))
    }
}

#[derive(Clone)]
pub struct HttpAdminApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAdminApi {
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: build_http_client(config)?,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/admin/role-management{path}", self.base_url)
    }

    async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        let response = check_status(response).await?;
        response.json().await.map_err(|error| ApiError::Decode(error.to_string()))
    }
}

#[async_trait]
impl AdminApi for HttpAdminApi {
    async fn pending_requests(&self) -> Result<Vec<PendingRoleRequest>, ApiError> {
        self.get_list("/pending-requests").await
    }

    async fn approved_employees(&self) -> Result<Vec<ApprovedEmployee>, ApiError> {
        self.get_list("/approved-employees").await
    }

    async fn rejected_requests(&self) -> Result<Vec<RejectedRoleRequest>, ApiError> {
        self.get_list("/rejected-requests").await
    }

    async fn programmes(&self) -> Result<Vec<Programme>, ApiError> {
        self.get_list("/programmes").await
    }

    async fn approve_request(
        &self,
        id: &RequestId,
        programme_id: Option<&ProgrammeId>,
    ) -> Result<ApprovedEmployee, ApiError> {
        let path = format!("/pending-requests/{}/approve", id.0);
        let body = serde_json::json!({
            "programmeId": programme_id.map(|programme_id| programme_id.0.clone()),
        });

        let response = self.http.post(self.url(&path)).json(&body).send().await?;
        let response = check_status(response).await?;
        response.json().await.map_err(|error| ApiError::Decode(error.to_string()))
    }

    async fn reject_request(&self, id: &RequestId, reason: &str) -> Result<(), ApiError> {
        let path = format!("/pending-requests/{}/reject", id.0);
        let body = serde_json::json!({ "rejectionReason": reason });

        let response = self.http.post(self.url(&path)).json(&body).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
