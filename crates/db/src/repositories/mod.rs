use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use portview_core::domain::project::{Project, ProjectId};
use portview_core::domain::role::{
    ApprovedEmployee, PendingRoleRequest, Programme, ProgrammeId, RejectedRoleRequest, RequestId,
};

pub mod programme;
pub mod project;
pub mod role;

pub use programme::SqlProgrammeRepository;
pub use project::SqlProjectRepository;
pub use role::SqlRoleRequestRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
}

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError>;
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError>;
    async fn insert(&self, project: &Project, now: DateTime<Utc>) -> Result<(), RepositoryError>;
    /// Full-record replace including the milestone list. Returns false when no
    /// project with the given id exists.
    async fn update(&self, project: &Project, now: DateTime<Utc>)
        -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait RoleRequestRepository: Send + Sync {
    async fn list_pending(&self) -> Result<Vec<PendingRoleRequest>, RepositoryError>;
    async fn list_approved(&self) -> Result<Vec<ApprovedEmployee>, RepositoryError>;
    async fn list_rejected(&self) -> Result<Vec<RejectedRoleRequest>, RepositoryError>;
    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<PendingRoleRequest>, RepositoryError>;
    /// Single-statement transition guarded on the pending status; returns
    /// false when the request is unknown or already decided.
    async fn mark_approved(
        &self,
        id: &RequestId,
        programme_id: Option<&ProgrammeId>,
        decided_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
    async fn mark_rejected(
        &self,
        id: &RequestId,
        reason: &str,
        decided_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;
}

#[async_trait]
pub trait ProgrammeRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Programme>, RepositoryError>;
    async fn find_by_id(&self, id: &ProgrammeId) -> Result<Option<Programme>, RepositoryError>;
}
