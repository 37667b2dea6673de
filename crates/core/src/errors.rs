use thiserror::Error;

use crate::domain::role::{EmployeeRole, RoleRequestStatus};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid role request transition from {from:?} to {to:?}")]
    InvalidRequestTransition { from: RoleRequestStatus, to: RoleRequestStatus },
    #[error("project name must not be empty")]
    EmptyProjectName,
    #[error("project budget must not be negative")]
    NegativeBudget,
    #[error("milestone title must not be empty")]
    EmptyMilestoneTitle,
    #[error("a programme assignment is required for the {role:?} role")]
    ProgrammeRequired { role: EmployeeRole },
    #[error("a rejection reason is required")]
    EmptyRejectionReason,
    #[error("project `{id}` was not found")]
    UnknownProject { id: String },
    #[error("role request `{id}` was not found")]
    UnknownRequest { id: String },
    #[error("programme `{id}` was not found")]
    UnknownProgramme { id: String },
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("integration failure: {0}")]
    Integration(String),
}

impl ApplicationError {
    /// A short, user-safe message for banners and inline feedback. Validation
    /// problems keep their domain wording; infrastructure detail stays in the
    /// logs.
    pub fn user_message(&self) -> String {
        match self {
            Self::Domain(domain) => domain.to_string(),
            Self::Persistence(_) | Self::Integration(_) => {
                "The backend is unreachable. Showing the last loaded data.".to_string()
            }
        }
    }
}
