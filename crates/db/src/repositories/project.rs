use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::Row;

use portview_core::domain::project::{
    Milestone, MilestoneId, MilestoneStatus, Project, ProjectCategory, ProjectId, ProjectStatus,
};

use super::{ProjectRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProjectRepository {
    pool: DbPool,
}

impl SqlProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_project_status(raw: &str) -> ProjectStatus {
    ProjectStatus::from_label(raw).unwrap_or(ProjectStatus::OnTrack)
}

fn parse_milestone_status(raw: &str) -> MilestoneStatus {
    MilestoneStatus::from_label(raw).unwrap_or(MilestoneStatus::Pending)
}

fn parse_category(raw: &str) -> Result<ProjectCategory, RepositoryError> {
    ProjectCategory::from_label(raw)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown project category `{raw}`")))
}

fn parse_amount(raw: &str) -> Result<Decimal, RepositoryError> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|error| RepositoryError::Decode(format!("invalid amount `{raw}`: {error}")))
}

fn parse_date(raw: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|error| RepositoryError::Decode(format!("invalid date `{raw}`: {error}")))
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> Result<Project, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let category: String =
        row.try_get("category").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let total_budget: String =
        row.try_get("total_budget").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let expenditure: String =
        row.try_get("expenditure").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let description: String =
        row.try_get("description").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let delay_remarks: Option<String> =
        row.try_get("delay_remarks").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Project {
        id: ProjectId(id),
        name,
        category: parse_category(&category)?,
        total_budget: parse_amount(&total_budget)?,
        expenditure: parse_amount(&expenditure)?,
        status: parse_project_status(&status),
        description,
        delay_remarks,
        milestones: Vec::new(),
    })
}

fn row_to_milestone(row: &sqlx::sqlite::SqliteRow) -> Result<Milestone, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let title: String =
        row.try_get("title").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let due_date: String =
        row.try_get("due_date").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let completed_date: Option<String> =
        row.try_get("completed_date").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(Milestone {
        id: MilestoneId(id),
        title,
        due_date: parse_date(&due_date)?,
        status: parse_milestone_status(&status),
        completed_date: completed_date.as_deref().map(parse_date).transpose()?,
    })
}

async fn insert_milestones<'a>(
    tx: &mut sqlx::Transaction<'a, sqlx::Sqlite>,
    project: &Project,
) -> Result<(), RepositoryError> {
    for (position, milestone) in project.milestones.iter().enumerate() {
        sqlx::query(
            "INSERT INTO milestone (id, project_id, title, due_date, status, completed_date, position)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&milestone.id.0)
        .bind(&project.id.0)
        .bind(&milestone.title)
        .bind(milestone.due_date.format("%Y-%m-%d").to_string())
        .bind(milestone.status.label())
        .bind(milestone.completed_date.map(|date| date.format("%Y-%m-%d").to_string()))
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[async_trait::async_trait]
impl ProjectRepository for SqlProjectRepository {
    async fn list(&self) -> Result<Vec<Project>, RepositoryError> {
        let project_rows = sqlx::query(
            "SELECT id, name, category, total_budget, expenditure, status, description, delay_remarks
             FROM project ORDER BY created_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        let milestone_rows = sqlx::query(
            "SELECT id, project_id, title, due_date, status, completed_date
             FROM milestone ORDER BY project_id, position",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut milestones_by_project: HashMap<String, Vec<Milestone>> = HashMap::new();
        for row in &milestone_rows {
            let project_id: String =
                row.try_get("project_id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
            milestones_by_project.entry(project_id).or_default().push(row_to_milestone(row)?);
        }

        let mut projects = Vec::with_capacity(project_rows.len());
        for row in &project_rows {
            let mut project = row_to_project(row)?;
            project.milestones =
                milestones_by_project.remove(&project.id.0).unwrap_or_default();
            projects.push(project);
        }

        Ok(projects)
    }

    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, name, category, total_budget, expenditure, status, description, delay_remarks
             FROM project WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut project = row_to_project(&row)?;

        let milestone_rows = sqlx::query(
            "SELECT id, title, due_date, status, completed_date
             FROM milestone WHERE project_id = ? ORDER BY position",
        )
        .bind(&id.0)
        .fetch_all(&self.pool)
        .await?;

        for row in &milestone_rows {
            project.milestones.push(row_to_milestone(row)?);
        }

        Ok(Some(project))
    }

    async fn insert(&self, project: &Project, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO project
                (id, name, category, total_budget, expenditure, status, description,
                 delay_remarks, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&project.id.0)
        .bind(&project.name)
        .bind(project.category.label())
        .bind(project.total_budget.to_string())
        .bind(project.expenditure.to_string())
        .bind(project.status.label())
        .bind(&project.description)
        .bind(&project.delay_remarks)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        insert_milestones(&mut tx, project).await?;
        tx.commit().await?;

        Ok(())
    }

    async fn update(
        &self,
        project: &Project,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE project
             SET name = ?, category = ?, total_budget = ?, expenditure = ?, status = ?,
                 description = ?, delay_remarks = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&project.name)
        .bind(project.category.label())
        .bind(project.total_budget.to_string())
        .bind(project.expenditure.to_string())
        .bind(project.status.label())
        .bind(&project.description)
        .bind(&project.delay_remarks)
        .bind(now.to_rfc3339())
        .bind(&project.id.0)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        // Milestones are owned by the project record and replaced wholesale.
        sqlx::query("DELETE FROM milestone WHERE project_id = ?")
            .bind(&project.id.0)
            .execute(&mut *tx)
            .await?;
        insert_milestones(&mut tx, project).await?;

        tx.commit().await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};
    use rust_decimal::Decimal;

    use portview_core::domain::project::{
        Milestone, MilestoneId, MilestoneStatus, Project, ProjectCategory, ProjectId,
        ProjectStatus,
    };

    use super::SqlProjectRepository;
    use crate::repositories::ProjectRepository;
    use crate::{connect_with_settings, migrations};

    async fn setup() -> SqlProjectRepository {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        SqlProjectRepository::new(pool)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn fixture() -> Project {
        let mut project = Project::created(
            ProjectId("PRJ-TEST-001".to_string()),
            "Orbiter-7 Mesh Network".to_string(),
            ProjectCategory::SatelliteCommunication,
            Decimal::new(85_000_000, 0),
            "Low-latency communication network.".to_string(),
        );
        project.expenditure = Decimal::new(78_000_000, 0);
        project.status = ProjectStatus::Delayed;
        project.delay_remarks = Some("Processor sourcing slipped by four months.".to_string());
        project.milestones = vec![
            Milestone {
                id: MilestoneId("MS-1".to_string()),
                title: "Satellite Bus Assembly".to_string(),
                due_date: date(2025, 11, 20),
                status: MilestoneStatus::Completed,
                completed_date: Some(date(2025, 12, 10)),
            },
            Milestone {
                id: MilestoneId("MS-2".to_string()),
                title: "Transponder Testing".to_string(),
                due_date: date(2026, 1, 15),
                status: MilestoneStatus::InProgress,
                completed_date: None,
            },
        ];
        project
    }

    #[tokio::test]
    async fn insert_then_find_round_trips_the_full_record() {
        let repo = setup().await;
        let project = fixture();

        repo.insert(&project, Utc::now()).await.expect("insert");
        let loaded = repo
            .find_by_id(&project.id)
            .await
            .expect("find")
            .expect("project should exist");

        assert_eq!(loaded, project);
    }

    #[tokio::test]
    async fn list_preserves_milestone_order() {
        let repo = setup().await;
        let project = fixture();
        repo.insert(&project, Utc::now()).await.expect("insert");

        let listed = repo.list().await.expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].milestones[0].title, "Satellite Bus Assembly");
        assert_eq!(listed[0].milestones[1].title, "Transponder Testing");
    }

    #[tokio::test]
    async fn update_replaces_milestones_wholesale() {
        let repo = setup().await;
        let mut project = fixture();
        repo.insert(&project, Utc::now()).await.expect("insert");

        project.milestones.remove(0);
        project.milestones.push(Milestone {
            id: MilestoneId("MS-3".to_string()),
            title: "Ground Segment Integration".to_string(),
            due_date: date(2026, 5, 1),
            status: MilestoneStatus::Pending,
            completed_date: None,
        });
        project.status = ProjectStatus::AtRisk;

        let updated = repo.update(&project, Utc::now()).await.expect("update");
        assert!(updated);

        let loaded = repo.find_by_id(&project.id).await.expect("find").expect("exists");
        assert_eq!(loaded.status, ProjectStatus::AtRisk);
        assert_eq!(loaded.milestones.len(), 2);
        assert_eq!(loaded.milestones[1].id.0, "MS-3");
    }

    #[tokio::test]
    async fn update_of_unknown_project_reports_missing() {
        let repo = setup().await;
        let updated = repo.update(&fixture(), Utc::now()).await.expect("update call");
        assert!(!updated);
    }
}
