//! Portfolio aggregation: budget/expenditure sums, utilization, and status
//! histograms over an in-memory project collection.
//!
//! Everything here is pure and total: an empty collection yields all-zero
//! outputs and a zero total budget yields 0% utilization rather than a
//! division error.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::domain::project::{Project, ProjectCategory, ProjectStatus};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_budget: Decimal,
    pub total_expenditure: Decimal,
    pub utilization_pct: u32,
    pub project_count: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StatusHistogram {
    pub on_track: usize,
    pub at_risk: usize,
    pub delayed: usize,
    pub completed: usize,
}

impl StatusHistogram {
    pub fn count(&self, status: ProjectStatus) -> usize {
        match status {
            ProjectStatus::OnTrack => self.on_track,
            ProjectStatus::AtRisk => self.at_risk,
            ProjectStatus::Delayed => self.delayed,
            ProjectStatus::Completed => self.completed,
        }
    }

    pub fn total(&self) -> usize {
        self.on_track + self.at_risk + self.delayed + self.completed
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryRollup {
    pub category: ProjectCategory,
    pub total_budget: Decimal,
    pub total_expenditure: Decimal,
    pub project_count: usize,
}

/// Whole-percent budget utilization, rounded half away from zero. Defined as
/// 0 when the budget is zero, for any expenditure.
pub fn utilization_pct(total_budget: Decimal, total_expenditure: Decimal) -> u32 {
    if total_budget.is_zero() {
        return 0;
    }

    let pct = total_expenditure * Decimal::ONE_HUNDRED / total_budget;
    pct.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Sum budget and expenditure over the collection, optionally restricted to a
/// single category.
pub fn portfolio_stats(projects: &[Project], category: Option<ProjectCategory>) -> PortfolioStats {
    let mut total_budget = Decimal::ZERO;
    let mut total_expenditure = Decimal::ZERO;
    let mut project_count = 0usize;

    for project in projects {
        if category.is_some_and(|wanted| project.category != wanted) {
            continue;
        }
        total_budget += project.total_budget;
        total_expenditure += project.expenditure;
        project_count += 1;
    }

    PortfolioStats {
        total_budget,
        total_expenditure,
        utilization_pct: utilization_pct(total_budget, total_expenditure),
        project_count,
    }
}

/// Project counts per status over the fixed four-value status set. Bucket
/// counts always sum to the collection length.
pub fn status_histogram(projects: &[Project]) -> StatusHistogram {
    let mut histogram = StatusHistogram::default();
    for project in projects {
        match project.status {
            ProjectStatus::OnTrack => histogram.on_track += 1,
            ProjectStatus::AtRisk => histogram.at_risk += 1,
            ProjectStatus::Delayed => histogram.delayed += 1,
            ProjectStatus::Completed => histogram.completed += 1,
        }
    }
    histogram
}

/// Per-category budget/expenditure rollups, one entry per category in
/// declaration order.
pub fn category_rollups(projects: &[Project]) -> Vec<CategoryRollup> {
    ProjectCategory::ALL
        .into_iter()
        .map(|category| {
            let stats = portfolio_stats(projects, Some(category));
            CategoryRollup {
                category,
                total_budget: stats.total_budget,
                total_expenditure: stats.total_expenditure,
                project_count: stats.project_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{category_rollups, portfolio_stats, status_histogram, utilization_pct};
    use crate::domain::project::{Project, ProjectCategory, ProjectId, ProjectStatus};

    fn project(
        id: &str,
        category: ProjectCategory,
        budget: i64,
        expenditure: i64,
        status: ProjectStatus,
    ) -> Project {
        let mut project = Project::created(
            ProjectId(id.to_string()),
            format!("Project {id}"),
            category,
            Decimal::new(budget, 0),
            "fixture".to_string(),
        );
        project.expenditure = Decimal::new(expenditure, 0);
        project.status = status;
        project
    }

    #[test]
    fn empty_collection_yields_all_zero_outputs() {
        let stats = portfolio_stats(&[], None);
        assert_eq!(stats.total_budget, Decimal::ZERO);
        assert_eq!(stats.total_expenditure, Decimal::ZERO);
        assert_eq!(stats.utilization_pct, 0);
        assert_eq!(stats.project_count, 0);

        assert_eq!(status_histogram(&[]).total(), 0);
    }

    #[test]
    fn utilization_is_zero_for_zero_budget_regardless_of_expenditure() {
        assert_eq!(utilization_pct(Decimal::ZERO, Decimal::ZERO), 0);
        assert_eq!(utilization_pct(Decimal::ZERO, Decimal::new(5_000_000, 0)), 0);
    }

    #[test]
    fn utilization_rounds_half_away_from_zero() {
        assert_eq!(utilization_pct(Decimal::new(200, 0), Decimal::new(101, 0)), 51);
        assert_eq!(utilization_pct(Decimal::new(200, 0), Decimal::new(100, 0)), 50);
    }

    #[test]
    fn two_project_scenario_matches_expected_totals() {
        let projects = vec![
            project("1", ProjectCategory::LaunchVehicles, 100, 50, ProjectStatus::OnTrack),
            project("2", ProjectCategory::LaunchVehicles, 200, 200, ProjectStatus::Completed),
        ];

        let stats = portfolio_stats(&projects, None);
        assert_eq!(stats.total_budget, Decimal::new(300, 0));
        assert_eq!(stats.total_expenditure, Decimal::new(250, 0));
        assert_eq!(stats.utilization_pct, 83);

        let histogram = status_histogram(&projects);
        assert_eq!(histogram.on_track, 1);
        assert_eq!(histogram.completed, 1);
        assert_eq!(histogram.at_risk, 0);
        assert_eq!(histogram.delayed, 0);
    }

    #[test]
    fn histogram_buckets_sum_to_collection_length() {
        let projects = vec![
            project("1", ProjectCategory::LaunchVehicles, 10, 0, ProjectStatus::OnTrack),
            project("2", ProjectCategory::UserFunded, 10, 5, ProjectStatus::AtRisk),
            project("3", ProjectCategory::InfrastructureRd, 10, 10, ProjectStatus::Delayed),
            project("4", ProjectCategory::SatelliteCommunication, 10, 10, ProjectStatus::Completed),
            project("5", ProjectCategory::SatelliteCommunication, 10, 2, ProjectStatus::OnTrack),
        ];

        assert_eq!(status_histogram(&projects).total(), projects.len());
    }

    #[test]
    fn category_filter_restricts_the_sums() {
        let projects = vec![
            project("1", ProjectCategory::LaunchVehicles, 100, 40, ProjectStatus::OnTrack),
            project("2", ProjectCategory::SatelliteCommunication, 900, 300, ProjectStatus::OnTrack),
        ];

        let launch = portfolio_stats(&projects, Some(ProjectCategory::LaunchVehicles));
        assert_eq!(launch.total_budget, Decimal::new(100, 0));
        assert_eq!(launch.project_count, 1);
    }

    #[test]
    fn rollups_cover_every_category_in_declaration_order() {
        let projects = vec![
            project("1", ProjectCategory::UserFunded, 70, 10, ProjectStatus::OnTrack),
        ];

        let rollups = category_rollups(&projects);
        assert_eq!(rollups.len(), 4);
        assert_eq!(rollups[0].category, ProjectCategory::LaunchVehicles);
        assert_eq!(rollups[0].project_count, 0);
        assert_eq!(rollups[3].category, ProjectCategory::UserFunded);
        assert_eq!(rollups[3].total_budget, Decimal::new(70, 0));
    }
}
