//! Milestone workflow over a project's milestone list.
//!
//! Mutations here are purely in-memory; the caller is responsible for
//! persisting the updated project afterwards so local state never drifts from
//! the backend.

use chrono::NaiveDate;

use crate::domain::project::{Milestone, MilestoneId, MilestoneStatus, Project};
use crate::errors::DomainError;
use crate::forms::NewMilestoneInput;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied { from: MilestoneStatus, to: MilestoneStatus },
    NotFound,
}

/// Append a new Pending milestone with no completion date.
pub fn add_milestone(
    project: &mut Project,
    id: MilestoneId,
    input: &NewMilestoneInput,
) -> Result<(), DomainError> {
    input.validate()?;

    project.milestones.push(Milestone {
        id,
        title: input.title.trim().to_string(),
        due_date: input.due_date,
        status: MilestoneStatus::Pending,
        completed_date: None,
    });

    Ok(())
}

/// Advance a milestone one step along Pending -> In Progress -> Completed ->
/// Pending. The completion date is set iff the resulting status is Completed.
/// An unknown milestone id is a no-op.
pub fn toggle_milestone_status(
    project: &mut Project,
    milestone_id: &MilestoneId,
    today: NaiveDate,
) -> ToggleOutcome {
    let Some(milestone) = project.milestone_mut(milestone_id) else {
        return ToggleOutcome::NotFound;
    };

    let from = milestone.status;
    let to = from.next();
    milestone.status = to;
    milestone.completed_date = (to == MilestoneStatus::Completed).then_some(today);

    ToggleOutcome::Applied { from, to }
}
