//! Role request approval workflow.
//!
//! A pending request either becomes an approved employee (Programme Director
//! requests must carry a programme assignment) or is rejected with a reason.
//! Both outcomes are terminal. The functions here are pure; callers apply the
//! resulting transition only after the backend confirms it.

use chrono::{DateTime, Utc};

use crate::domain::role::{ApprovedEmployee, PendingRoleRequest, Programme, RoleRequestStatus};
use crate::errors::DomainError;

pub fn validate_approval(
    request: &PendingRoleRequest,
    programme: Option<&Programme>,
) -> Result<(), DomainError> {
    if !request.status.can_transition_to(RoleRequestStatus::Approved) {
        return Err(DomainError::InvalidRequestTransition {
            from: request.status,
            to: RoleRequestStatus::Approved,
        });
    }

    if request.requested_role.requires_programme() && programme.is_none() {
        return Err(DomainError::ProgrammeRequired { role: request.requested_role });
    }

    Ok(())
}

pub fn validate_rejection(request: &PendingRoleRequest, reason: &str) -> Result<(), DomainError> {
    if !request.status.can_transition_to(RoleRequestStatus::Rejected) {
        return Err(DomainError::InvalidRequestTransition {
            from: request.status,
            to: RoleRequestStatus::Rejected,
        });
    }

    if reason.trim().is_empty() {
        return Err(DomainError::EmptyRejectionReason);
    }

    Ok(())
}

/// Build the approved-registry entry for a pending request.
pub fn approve_request(
    request: &PendingRoleRequest,
    programme: Option<&Programme>,
    approved_at: DateTime<Utc>,
) -> Result<ApprovedEmployee, DomainError> {
    validate_approval(request, programme)?;

    Ok(ApprovedEmployee {
        id: request.id.clone(),
        employee_name: request.employee_name.clone(),
        employee_code: request.employee_code.clone(),
        assigned_role: request.requested_role,
        assigned_programme: programme.map(|programme| programme.name.clone()),
        approved_at,
    })
}
