pub mod analytics;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod milestones;
pub mod roles;

pub use analytics::{
    category_rollups, portfolio_stats, status_histogram, utilization_pct, CategoryRollup,
    PortfolioStats, StatusHistogram,
};
pub use domain::project::{
    Milestone, MilestoneId, MilestoneStatus, Project, ProjectCategory, ProjectId, ProjectStatus,
};
pub use domain::role::{
    ApprovedEmployee, EmployeeRole, PendingRoleRequest, Programme, ProgrammeId, RejectedRoleRequest,
    RequestId, RoleRequestStatus,
};
pub use errors::{ApplicationError, DomainError};
pub use forms::{NewMilestoneInput, NewProjectInput};
pub use milestones::{add_milestone, toggle_milestone_status, ToggleOutcome};
pub use roles::{approve_request, validate_approval, validate_rejection};
