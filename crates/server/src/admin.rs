//! Admin role management API.
//!
//! Endpoints:
//! - `GET  /api/admin/role-management/pending-requests`
//! - `GET  /api/admin/role-management/approved-employees`
//! - `GET  /api/admin/role-management/rejected-requests`
//! - `GET  /api/admin/role-management/programmes`
//! - `POST /api/admin/role-management/pending-requests/{id}/approve`
//! - `POST /api/admin/role-management/pending-requests/{id}/reject`
//!
//! Approvals and rejections are terminal. The status transition is a single
//! guarded UPDATE, so a request can never end up half-decided.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use portview_core::domain::role::{
    ApprovedEmployee, PendingRoleRequest, Programme, ProgrammeId, RejectedRoleRequest, RequestId,
};
use portview_core::errors::DomainError;
use portview_core::roles::{approve_request, validate_rejection};
use portview_db::repositories::{
    ProgrammeRepository, RepositoryError, RoleRequestRepository, SqlProgrammeRepository,
    SqlRoleRequestRepository,
};
use portview_db::DbPool;

#[derive(Clone)]
pub struct AdminState {
    db_pool: DbPool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveRequestBody {
    #[serde(default)]
    pub programme_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectRequestBody {
    pub rejection_reason: String,
}

#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/api/admin/role-management/pending-requests", get(list_pending))
        .route("/api/admin/role-management/approved-employees", get(list_approved))
        .route("/api/admin/role-management/rejected-requests", get(list_rejected))
        .route("/api/admin/role-management/programmes", get(list_programmes))
        .route("/api/admin/role-management/pending-requests/{id}/approve", post(approve))
        .route("/api/admin/role-management/pending-requests/{id}/reject", post(reject))
        .with_state(AdminState { db_pool })
}

async fn list_pending(
    State(state): State<AdminState>,
) -> Result<Json<Vec<PendingRoleRequest>>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlRoleRequestRepository::new(state.db_pool.clone());
    Ok(Json(repo.list_pending().await.map_err(db_error)?))
}

async fn list_approved(
    State(state): State<AdminState>,
) -> Result<Json<Vec<ApprovedEmployee>>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlRoleRequestRepository::new(state.db_pool.clone());
    Ok(Json(repo.list_approved().await.map_err(db_error)?))
}

async fn list_rejected(
    State(state): State<AdminState>,
) -> Result<Json<Vec<RejectedRoleRequest>>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlRoleRequestRepository::new(state.db_pool.clone());
    Ok(Json(repo.list_rejected().await.map_err(db_error)?))
}

async fn list_programmes(
    State(state): State<AdminState>,
) -> Result<Json<Vec<Programme>>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlProgrammeRepository::new(state.db_pool.clone());
    Ok(Json(repo.list().await.map_err(db_error)?))
}

async fn approve(
    Path(id): Path<String>,
    State(state): State<AdminState>,
    Json(body): Json<ApproveRequestBody>,
) -> Result<Json<ApprovedEmployee>, (StatusCode, Json<ErrorBody>)> {
    let request_id = RequestId(id);
    let requests = SqlRoleRequestRepository::new(state.db_pool.clone());

    let request = requests
        .find_by_id(&request_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("role request `{}` not found", request_id.0)))?;

    let programme = resolve_programme(&state, body.programme_id.as_deref()).await?;

    let approved = approve_request(&request, programme.as_ref(), Utc::now())
        .map_err(domain_error)?;

    let applied = requests
        .mark_approved(
            &request_id,
            programme.as_ref().map(|programme| &programme.id),
            approved.approved_at,
        )
        .await
        .map_err(db_error)?;
    if !applied {
        return Err(conflict(format!("role request `{}` is already decided", request_id.0)));
    }

    info!(
        event_name = "admin.role_request.approved",
        request_id = %request_id.0,
        assigned_role = approved.assigned_role.label(),
        programme = approved.assigned_programme.as_deref().unwrap_or("-"),
        "role request approved"
    );

    Ok(Json(approved))
}

async fn reject(
    Path(id): Path<String>,
    State(state): State<AdminState>,
    Json(body): Json<RejectRequestBody>,
) -> Result<Json<AdminResponse>, (StatusCode, Json<ErrorBody>)> {
    let request_id = RequestId(id);
    let requests = SqlRoleRequestRepository::new(state.db_pool.clone());

    let request = requests
        .find_by_id(&request_id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| not_found(format!("role request `{}` not found", request_id.0)))?;

    let reason = body.rejection_reason.trim();
    validate_rejection(&request, reason).map_err(domain_error)?;

    let applied =
        requests.mark_rejected(&request_id, reason, Utc::now()).await.map_err(db_error)?;
    if !applied {
        return Err(conflict(format!("role request `{}` is already decided", request_id.0)));
    }

    info!(
        event_name = "admin.role_request.rejected",
        request_id = %request_id.0,
        "role request rejected"
    );

    Ok(Json(AdminResponse {
        success: true,
        message: format!("Role request {} rejected.", request_id.0),
    }))
}

async fn resolve_programme(
    state: &AdminState,
    programme_id: Option<&str>,
) -> Result<Option<Programme>, (StatusCode, Json<ErrorBody>)> {
    let Some(programme_id) = programme_id else {
        return Ok(None);
    };

    let repo = SqlProgrammeRepository::new(state.db_pool.clone());
    let programme = repo
        .find_by_id(&ProgrammeId(programme_id.to_string()))
        .await
        .map_err(db_error)?
        .ok_or_else(|| bad_request(format!("programme `{programme_id}` not found")))?;

    Ok(Some(programme))
}

fn domain_error(error: DomainError) -> (StatusCode, Json<ErrorBody>) {
    let status = match error {
        DomainError::InvalidRequestTransition { .. } => StatusCode::CONFLICT,
        _ => StatusCode::BAD_REQUEST,
    };
    (status, Json(ErrorBody { error: error.to_string() }))
}

fn db_error(error: RepositoryError) -> (StatusCode, Json<ErrorBody>) {
    error!(error = %error, "admin api database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: "an internal error occurred".to_string() }),
    )
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message }))
}

fn not_found(message: String) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: message }))
}

fn conflict(message: String) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::CONFLICT, Json(ErrorBody { error: message }))
}
