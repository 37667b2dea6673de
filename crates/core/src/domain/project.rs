use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneId(pub String);

/// Programme areas are a closed set; the wire and storage representation is
/// the display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[serde(rename = "Launch Vehicles")]
    LaunchVehicles,
    #[serde(rename = "Satellite Communication")]
    SatelliteCommunication,
    #[serde(rename = "Infrastructure & Advanced R&D")]
    InfrastructureRd,
    #[serde(rename = "User Funded Projects")]
    UserFunded,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] = [
        ProjectCategory::LaunchVehicles,
        ProjectCategory::SatelliteCommunication,
        ProjectCategory::InfrastructureRd,
        ProjectCategory::UserFunded,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::LaunchVehicles => "Launch Vehicles",
            Self::SatelliteCommunication => "Satellite Communication",
            Self::InfrastructureRd => "Infrastructure & Advanced R&D",
            Self::UserFunded => "User Funded Projects",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.label() == raw.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[serde(rename = "On Track")]
    OnTrack,
    #[serde(rename = "At Risk")]
    AtRisk,
    #[serde(rename = "Delayed")]
    Delayed,
    #[serde(rename = "Completed")]
    Completed,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::OnTrack,
        ProjectStatus::AtRisk,
        ProjectStatus::Delayed,
        ProjectStatus::Completed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::OnTrack => "On Track",
            Self::AtRisk => "At Risk",
            Self::Delayed => "Delayed",
            Self::Completed => "Completed",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.label() == raw.trim())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MilestoneStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Completed")]
    Completed,
}

impl MilestoneStatus {
    /// Explicit transition table. The progression is cyclic: toggling a
    /// completed milestone re-opens it.
    pub fn next(self) -> MilestoneStatus {
        match self {
            Self::Pending => Self::InProgress,
            Self::InProgress => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        [Self::Pending, Self::InProgress, Self::Completed]
            .into_iter()
            .find(|status| status.label() == raw.trim())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: MilestoneId,
    pub title: String,
    pub due_date: NaiveDate,
    pub status: MilestoneStatus,
    /// Set exactly when the milestone transitions into Completed, cleared on
    /// any other transition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub category: ProjectCategory,
    pub total_budget: Decimal,
    pub expenditure: Decimal,
    pub status: ProjectStatus,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_remarks: Option<String>,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

impl Project {
    /// A freshly created project: On Track, nothing spent, no milestones.
    pub fn created(
        id: ProjectId,
        name: String,
        category: ProjectCategory,
        total_budget: Decimal,
        description: String,
    ) -> Self {
        Self {
            id,
            name,
            category,
            total_budget,
            expenditure: Decimal::ZERO,
            status: ProjectStatus::OnTrack,
            description,
            delay_remarks: None,
            milestones: Vec::new(),
        }
    }

    pub fn milestone(&self, milestone_id: &MilestoneId) -> Option<&Milestone> {
        self.milestones.iter().find(|milestone| &milestone.id == milestone_id)
    }

    pub fn milestone_mut(&mut self, milestone_id: &MilestoneId) -> Option<&mut Milestone> {
        self.milestones.iter_mut().find(|milestone| &milestone.id == milestone_id)
    }
}
