use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use portview_core::domain::project::{Milestone, MilestoneId, Project, ProjectCategory, ProjectId};
use portview_core::errors::{ApplicationError, DomainError};
use portview_core::forms::{NewMilestoneInput, NewProjectInput};
use portview_core::milestones::{add_milestone, toggle_milestone_status, ToggleOutcome};

use crate::api::PortfolioApi;

/// Session-scoped cache of project records.
///
/// Mutations follow an update-then-merge policy: the local snapshot changes
/// only after the backend confirms the write, so a failed request can never
/// leave local state ahead of the server.
pub struct ProjectStore {
    api: Arc<dyn PortfolioApi>,
    projects: Vec<Project>,
    backend_offline: bool,
    last_error: Option<String>,
}

impl ProjectStore {
    pub fn new(api: Arc<dyn PortfolioApi>) -> Self {
        Self { api, projects: Vec::new(), backend_offline: false, last_error: None }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn find(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| &project.id == id)
    }

    pub fn by_category(&self, category: ProjectCategory) -> Vec<&Project> {
        self.projects.iter().filter(|project| project.category == category).collect()
    }

    /// True after a failed backend call; cleared by the next success.
    pub fn backend_offline(&self) -> bool {
        self.backend_offline
    }

    /// The most recent user-facing failure message, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Reload the working set. On failure the last successfully loaded
    /// snapshot stays usable (empty on first failure).
    pub async fn refresh(&mut self) -> Result<(), ApplicationError> {
        match self.api.list_projects().await {
            Ok(projects) => {
                info!(
                    event_name = "store.refresh.loaded",
                    project_count = projects.len(),
                    "project working set reloaded"
                );
                self.projects = projects;
                self.mark_online();
                Ok(())
            }
            Err(error) => Err(self.mark_offline("store.refresh.failed", error.to_string())),
        }
    }

    /// Create a project from a validated input. On success the
    /// server-assigned record is appended locally and its id returned so the
    /// caller can navigate to the detail view.
    pub async fn create(&mut self, input: NewProjectInput) -> Result<ProjectId, ApplicationError> {
        if let Err(error) = input.validate() {
            self.last_error = Some(error.to_string());
            return Err(error.into());
        }

        match self.api.create_project(&input).await {
            Ok(created) => {
                info!(
                    event_name = "store.project.created",
                    project_id = %created.id.0,
                    category = created.category.label(),
                    "project created"
                );
                let id = created.id.clone();
                self.projects.push(created);
                self.mark_online();
                Ok(id)
            }
            Err(error) => Err(self.mark_offline("store.create.failed", error.to_string())),
        }
    }

    /// Full-record replace. The server's copy of the record is merged back by
    /// id once the call succeeds; on failure local state is left unchanged.
    pub async fn update(&mut self, project: Project) -> Result<(), ApplicationError> {
        match self.api.update_project(&project).await {
            Ok(updated) => {
                match self.projects.iter_mut().find(|existing| existing.id == updated.id) {
                    Some(existing) => *existing = updated,
                    None => self.projects.push(updated),
                }
                self.mark_online();
                Ok(())
            }
            Err(error) => Err(self.mark_offline("store.update.failed", error.to_string())),
        }
    }

    /// Append a milestone to a loaded project and persist the updated record.
    pub async fn add_milestone(
        &mut self,
        project_id: &ProjectId,
        input: NewMilestoneInput,
    ) -> Result<MilestoneId, ApplicationError> {
        let Some(existing) = self.find(project_id) else {
            let error = DomainError::UnknownProject { id: project_id.0.clone() };
            self.last_error = Some(error.to_string());
            return Err(error.into());
        };

        let mut working = existing.clone();
        let milestone_id = mint_milestone_id();
        if let Err(error) = add_milestone(&mut working, milestone_id.clone(), &input) {
            self.last_error = Some(error.to_string());
            return Err(error.into());
        }

        self.update(working).await?;
        Ok(milestone_id)
    }

    /// Cycle a milestone's status and persist the updated record. An unknown
    /// milestone id is a no-op and never reaches the backend.
    pub async fn toggle_milestone(
        &mut self,
        project_id: &ProjectId,
        milestone_id: &MilestoneId,
        today: NaiveDate,
    ) -> Result<ToggleOutcome, ApplicationError> {
        let Some(existing) = self.find(project_id) else {
            let error = DomainError::UnknownProject { id: project_id.0.clone() };
            self.last_error = Some(error.to_string());
            return Err(error.into());
        };

        let mut working = existing.clone();
        let outcome = toggle_milestone_status(&mut working, milestone_id, today);
        if outcome == ToggleOutcome::NotFound {
            return Ok(outcome);
        }

        self.update(working).await?;
        Ok(outcome)
    }

    pub fn milestone(&self, project_id: &ProjectId, milestone_id: &MilestoneId) -> Option<&Milestone> {
        self.find(project_id).and_then(|project| project.milestone(milestone_id))
    }

    fn mark_online(&mut self) {
        self.backend_offline = false;
        self.last_error = None;
    }

    fn mark_offline(&mut self, event_name: &'static str, detail: String) -> ApplicationError {
        warn!(event_name, error = %detail, "backend call failed");
        self.backend_offline = true;
        let error = ApplicationError::Integration(detail);
        self.last_error = Some(error.user_message());
        error
    }
}

fn mint_milestone_id() -> MilestoneId {
    MilestoneId(format!("MS-{}", &Uuid::new_v4().simple().to_string()[..12]))
}
