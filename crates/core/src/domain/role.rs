use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgrammeId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeRole {
    #[serde(rename = "Project Director")]
    ProjectDirector,
    #[serde(rename = "Programme Director")]
    ProgrammeDirector,
    #[serde(rename = "Admin")]
    Admin,
}

impl EmployeeRole {
    pub const ALL: [EmployeeRole; 3] =
        [EmployeeRole::ProjectDirector, EmployeeRole::ProgrammeDirector, EmployeeRole::Admin];

    /// Programme Directors are bound to a programme at approval time; the
    /// other roles are portfolio-wide.
    pub fn requires_programme(self) -> bool {
        matches!(self, Self::ProgrammeDirector)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ProjectDirector => "Project Director",
            Self::ProgrammeDirector => "Programme Director",
            Self::Admin => "Admin",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.label() == raw.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleRequestStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Approved")]
    Approved,
    #[serde(rename = "Rejected")]
    Rejected,
}

impl RoleRequestStatus {
    pub fn can_transition_to(self, next: RoleRequestStatus) -> bool {
        matches!(
            (self, next),
            (RoleRequestStatus::Pending, RoleRequestStatus::Approved)
                | (RoleRequestStatus::Pending, RoleRequestStatus::Rejected)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        [Self::Pending, Self::Approved, Self::Rejected]
            .into_iter()
            .find(|status| status.label() == raw.trim())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingRoleRequest {
    pub id: RequestId,
    pub employee_name: String,
    pub employee_code: String,
    pub requested_role: EmployeeRole,
    pub submitted_at: DateTime<Utc>,
    pub status: RoleRequestStatus,
}

impl PendingRoleRequest {
    pub fn transition_to(&mut self, next: RoleRequestStatus) -> Result<(), DomainError> {
        if self.status.can_transition_to(next) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidRequestTransition { from: self.status, to: next })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedEmployee {
    pub id: RequestId,
    pub employee_name: String,
    pub employee_code: String,
    pub assigned_role: EmployeeRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_programme: Option<String>,
    pub approved_at: DateTime<Utc>,
}

/// Retained record of a rejected request, so a rejection stays auditable
/// instead of vanishing from every list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRoleRequest {
    pub id: RequestId,
    pub employee_name: String,
    pub employee_code: String,
    pub requested_role: EmployeeRole,
    pub rejection_reason: String,
    pub rejected_at: DateTime<Utc>,
}

/// Read-only reference data used to populate the programme assignment step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Programme {
    pub id: ProgrammeId,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{EmployeeRole, PendingRoleRequest, RequestId, RoleRequestStatus};
    use crate::errors::DomainError;

    fn request(status: RoleRequestStatus) -> PendingRoleRequest {
        PendingRoleRequest {
            id: RequestId("RR-1".to_string()),
            employee_name: "A. Rao".to_string(),
            employee_code: "EMP-0042".to_string(),
            requested_role: EmployeeRole::ProjectDirector,
            submitted_at: Utc::now(),
            status,
        }
    }

    #[test]
    fn pending_requests_can_be_approved_or_rejected() {
        let mut approved = request(RoleRequestStatus::Pending);
        approved.transition_to(RoleRequestStatus::Approved).expect("pending -> approved");
        assert_eq!(approved.status, RoleRequestStatus::Approved);

        let mut rejected = request(RoleRequestStatus::Pending);
        rejected.transition_to(RoleRequestStatus::Rejected).expect("pending -> rejected");
        assert_eq!(rejected.status, RoleRequestStatus::Rejected);
    }

    #[test]
    fn approval_and_rejection_are_terminal() {
        let mut request = request(RoleRequestStatus::Approved);
        let error = request
            .transition_to(RoleRequestStatus::Rejected)
            .expect_err("approved requests must not transition");
        assert!(matches!(error, DomainError::InvalidRequestTransition { .. }));
    }

    #[test]
    fn only_programme_directors_need_a_programme() {
        assert!(EmployeeRole::ProgrammeDirector.requires_programme());
        assert!(!EmployeeRole::ProjectDirector.requires_programme());
        assert!(!EmployeeRole::Admin.requires_programme());
    }
}
