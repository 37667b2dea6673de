use std::sync::Arc;

use tracing::{info, warn};

use portview_core::domain::role::{
    ApprovedEmployee, PendingRoleRequest, Programme, ProgrammeId, RejectedRoleRequest, RequestId,
};
use portview_core::errors::{ApplicationError, DomainError};
use portview_core::roles::{validate_approval, validate_rejection};

use crate::api::AdminApi;

/// Admin-side role request queue.
///
/// A request leaves the pending list only after the backend confirms the
/// decision; validation failures and backend errors leave every list exactly
/// as it was.
pub struct RoleAdminQueue {
    api: Arc<dyn AdminApi>,
    pending: Vec<PendingRoleRequest>,
    approved: Vec<ApprovedEmployee>,
    rejected: Vec<RejectedRoleRequest>,
    programmes: Vec<Programme>,
    backend_offline: bool,
    last_error: Option<String>,
}

impl RoleAdminQueue {
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self {
            api,
            pending: Vec::new(),
            approved: Vec::new(),
            rejected: Vec::new(),
            programmes: Vec::new(),
            backend_offline: false,
            last_error: None,
        }
    }

    pub fn pending(&self) -> &[PendingRoleRequest] {
        &self.pending
    }

    pub fn approved(&self) -> &[ApprovedEmployee] {
        &self.approved
    }

    pub fn rejected(&self) -> &[RejectedRoleRequest] {
        &self.rejected
    }

    pub fn programmes(&self) -> &[Programme] {
        &self.programmes
    }

    pub fn backend_offline(&self) -> bool {
        self.backend_offline
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Reload all queue views. Failure keeps whatever loaded last.
    pub async fn refresh(&mut self) -> Result<(), ApplicationError> {
        let loaded = async {
            let pending = self.api.pending_requests().await?;
            let approved = self.api.approved_employees().await?;
            let rejected = self.api.rejected_requests().await?;
            let programmes = self.api.programmes().await?;
            Ok::<_, crate::api::ApiError>((pending, approved, rejected, programmes))
        }
        .await;

        match loaded {
            Ok((pending, approved, rejected, programmes)) => {
                self.pending = pending;
                self.approved = approved;
                self.rejected = rejected;
                self.programmes = programmes;
                self.mark_online();
                Ok(())
            }
            Err(error) => Err(self.mark_offline("admin.refresh.failed", error.to_string())),
        }
    }

    /// Approve a pending request, binding a programme when the requested role
    /// demands one. Client-side validation runs before anything touches the
    /// network.
    pub async fn approve(
        &mut self,
        request_id: &RequestId,
        programme_id: Option<&ProgrammeId>,
    ) -> Result<(), ApplicationError> {
        let Some(request) = self.pending.iter().find(|request| &request.id == request_id) else {
            return Err(self.validation_failed(DomainError::UnknownRequest {
                id: request_id.0.clone(),
            }));
        };

        let programme = match programme_id {
            Some(programme_id) => {
                match self.programmes.iter().find(|programme| &programme.id == programme_id) {
                    Some(programme) => Some(programme),
                    None => {
                        let error =
                            DomainError::UnknownProgramme { id: programme_id.0.clone() };
                        self.last_error = Some(error.to_string());
                        return Err(error.into());
                    }
                }
            }
            None => None,
        };

        if let Err(error) = validate_approval(request, programme) {
            return Err(self.validation_failed(error));
        }

        match self.api.approve_request(request_id, programme_id).await {
            Ok(approved) => {
                info!(
                    event_name = "admin.request.approved",
                    request_id = %request_id.0,
                    assigned_role = approved.assigned_role.label(),
                    "role request approved"
                );
                self.pending.retain(|request| &request.id != request_id);
                self.approved.push(approved);
                self.mark_online();
                Ok(())
            }
            Err(error) => Err(self.mark_offline("admin.approve.failed", error.to_string())),
        }
    }

    /// Reject a pending request with a mandatory reason.
    pub async fn reject(
        &mut self,
        request_id: &RequestId,
        reason: &str,
    ) -> Result<(), ApplicationError> {
        let Some(request) = self.pending.iter().find(|request| &request.id == request_id) else {
            return Err(self.validation_failed(DomainError::UnknownRequest {
                id: request_id.0.clone(),
            }));
        };

        if let Err(error) = validate_rejection(request, reason) {
            return Err(self.validation_failed(error));
        }

        match self.api.reject_request(request_id, reason).await {
            Ok(()) => {
                info!(
                    event_name = "admin.request.rejected",
                    request_id = %request_id.0,
                    "role request rejected"
                );
                self.pending.retain(|request| &request.id != request_id);
                self.mark_online();
                Ok(())
            }
            Err(error) => Err(self.mark_offline("admin.reject.failed", error.to_string())),
        }
    }

    fn validation_failed(&mut self, error: DomainError) -> ApplicationError {
        self.last_error = Some(error.to_string());
        error.into()
    }

    fn mark_online(&mut self) {
        self.backend_offline = false;
        self.last_error = None;
    }

    fn mark_offline(&mut self, event_name: &'static str, detail: String) -> ApplicationError {
        warn!(event_name, error = %detail, "admin backend call failed");
        self.backend_offline = true;
        let error = ApplicationError::Integration(detail);
        self.last_error = Some(error.user_message());
        error
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use portview_core::domain::role::{
        ApprovedEmployee, EmployeeRole, PendingRoleRequest, Programme, ProgrammeId,
        RejectedRoleRequest, RequestId, RoleRequestStatus,
    };
    use portview_core::errors::{ApplicationError, DomainError};

    use super::RoleAdminQueue;
    use crate::api::{AdminApi, ApiError};

    struct FakeAdminApi {
        pending: Mutex<Vec<PendingRoleRequest>>,
        programmes: Vec<Programme>,
        fail: AtomicBool,
        approve_calls: AtomicUsize,
        reject_calls: AtomicUsize,
    }

    impl FakeAdminApi {
        fn seeded() -> Arc<Self> {
            Arc::new(Self {
                pending: Mutex::new(vec![
                    request("RR-1", EmployeeRole::ProgrammeDirector),
                    request("RR-2", EmployeeRole::ProjectDirector),
                ]),
                programmes: vec![Programme {
                    id: ProgrammeId("PG-1".to_string()),
                    name: "GSLV".to_string(),
                }],
                fail: AtomicBool::new(false),
                approve_calls: AtomicUsize::new(0),
                reject_calls: AtomicUsize::new(0),
            })
        }

        fn check(&self) -> Result<(), ApiError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(())
        }
    }

    fn request(id: &str, role: EmployeeRole) -> PendingRoleRequest {
        PendingRoleRequest {
            id: RequestId(id.to_string()),
            employee_name: "A. Rao".to_string(),
            employee_code: "EMP-0042".to_string(),
            requested_role: role,
            submitted_at: Utc::now(),
            status: RoleRequestStatus::Pending,
        }
    }

    #[async_trait]
    impl AdminApi for FakeAdminApi {
        async fn pending_requests(&self) -> Result<Vec<PendingRoleRequest>, ApiError> {
            self.check()?;
            Ok(self.pending.lock().expect("lock").clone())
        }

        async fn approved_employees(&self) -> Result<Vec<ApprovedEmployee>, ApiError> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn rejected_requests(&self) -> Result<Vec<RejectedRoleRequest>, ApiError> {
            self.check()?;
            Ok(Vec::new())
        }

        async fn programmes(&self) -> Result<Vec<Programme>, ApiError> {
            self.check()?;
            Ok(self.programmes.clone())
        }

        async fn approve_request(
            &self,
            id: &RequestId,
            programme_id: Option<&ProgrammeId>,
        ) -> Result<ApprovedEmployee, ApiError> {
            self.approve_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;

            let pending = self.pending.lock().expect("lock");
            let request = pending
                .iter()
                .find(|request| &request.id == id)
                .ok_or(ApiError::Status { status: 404, message: "not found".to_string() })?;

            let programme_name = programme_id.and_then(|programme_id| {
                self.programmes
                    .iter()
                    .find(|programme| &programme.id == programme_id)
                    .map(|programme| programme.name.clone())
            });

            Ok(ApprovedEmployee {
                id: request.id.clone(),
                employee_name: request.employee_name.clone(),
                employee_code: request.employee_code.clone(),
                assigned_role: request.requested_role,
                assigned_programme: programme_name,
                approved_at: Utc::now(),
            })
        }

        async fn reject_request(&self, _id: &RequestId, _reason: &str) -> Result<(), ApiError> {
            self.reject_calls.fetch_add(1, Ordering::SeqCst);
            self.check()?;
            Ok(())
        }
    }

    async fn loaded_queue(api: Arc<FakeAdminApi>) -> RoleAdminQueue {
        let mut queue = RoleAdminQueue::new(api);
        queue.refresh().await.expect("refresh");
        queue
    }

    #[tokio::test]
    async fn programme_director_approval_without_programme_mutates_nothing() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        let error = queue
            .approve(&RequestId("RR-1".to_string()), None)
            .await
            .expect_err("programme is mandatory");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::ProgrammeRequired { .. })
        ));
        assert_eq!(queue.pending().len(), 2, "pending list must be untouched");
        assert!(queue.approved().is_empty(), "approved registry must be untouched");
        assert_eq!(api.approve_calls.load(Ordering::SeqCst), 0, "no network call allowed");
    }

    #[tokio::test]
    async fn approval_with_programme_moves_request_into_registry() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        queue
            .approve(&RequestId("RR-1".to_string()), Some(&ProgrammeId("PG-1".to_string())))
            .await
            .expect("approval succeeds");

        assert_eq!(queue.pending().len(), 1);
        assert_eq!(queue.approved().len(), 1);
        assert_eq!(queue.approved()[0].assigned_programme.as_deref(), Some("GSLV"));
    }

    #[tokio::test]
    async fn project_director_approval_needs_no_programme() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        queue.approve(&RequestId("RR-2".to_string()), None).await.expect("approval succeeds");

        assert_eq!(queue.approved().len(), 1);
        assert_eq!(queue.approved()[0].assigned_programme, None);
    }

    #[tokio::test]
    async fn rejection_with_blank_reason_mutates_nothing() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        let error = queue
            .reject(&RequestId("RR-2".to_string()), "   ")
            .await
            .expect_err("blank reason is invalid");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::EmptyRejectionReason)
        ));
        assert_eq!(queue.pending().len(), 2);
        assert_eq!(api.reject_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn backend_failure_leaves_the_request_pending() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        api.fail.store(true, Ordering::SeqCst);
        let error = queue
            .reject(&RequestId("RR-2".to_string()), "Employee code could not be verified.")
            .await
            .expect_err("backend is down");

        assert!(matches!(error, ApplicationError::Integration(_)));
        assert_eq!(queue.pending().len(), 2, "no partial transition on failure");
        assert!(queue.backend_offline());
        assert!(queue.last_error().is_some());
    }

    #[tokio::test]
    async fn unknown_programme_id_is_a_validation_error() {
        let api = FakeAdminApi::seeded();
        let mut queue = loaded_queue(api.clone()).await;

        let error = queue
            .approve(&RequestId("RR-1".to_string()), Some(&ProgrammeId("PG-404".to_string())))
            .await
            .expect_err("unknown programme");

        assert!(matches!(
            error,
            ApplicationError::Domain(DomainError::UnknownProgramme { .. })
        ));
        assert_eq!(api.approve_calls.load(Ordering::SeqCst), 0);
    }
}
