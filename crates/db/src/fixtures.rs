use sqlx::Row;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

const SEED_PROJECT_IDS: &[&str] = &["PRJ-0001", "PRJ-0002", "PRJ-0003", "PRJ-0004"];

const SEED_PROGRAMME_IDS: &[&str] = &["PG-0001", "PG-0002", "PG-0003", "PG-0004", "PG-0005"];

const SEED_MILESTONE_COUNT: i64 = 7;

/// Deterministic demo dataset: one project per category (with a delayed
/// project carrying remarks), programme reference data, and a role request in
/// each workflow state.
pub struct DemoPortfolio;

#[derive(Clone, Debug)]
pub struct SeedResult {
    pub projects: usize,
    pub programmes: usize,
}

#[derive(Clone, Debug)]
pub struct SeedCheck {
    pub name: &'static str,
    pub expected: i64,
    pub actual: i64,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub passed: bool,
    pub checks: Vec<SeedCheck>,
}

impl DemoPortfolio {
    pub const SQL: &'static str = include_str!("../../../config/fixtures/demo_portfolio.sql");

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        sqlx::raw_sql(Self::SQL).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(SeedResult {
            projects: SEED_PROJECT_IDS.len(),
            programmes: SEED_PROGRAMME_IDS.len(),
        })
    }

    /// Verify that the seeded rows match the fixture contract.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        checks.push(SeedCheck {
            name: "project_count",
            expected: SEED_PROJECT_IDS.len() as i64,
            actual: count(pool, "SELECT COUNT(*) FROM project").await?,
        });
        checks.push(SeedCheck {
            name: "milestone_count",
            expected: SEED_MILESTONE_COUNT,
            actual: count(pool, "SELECT COUNT(*) FROM milestone").await?,
        });
        checks.push(SeedCheck {
            name: "programme_count",
            expected: SEED_PROGRAMME_IDS.len() as i64,
            actual: count(pool, "SELECT COUNT(*) FROM programme").await?,
        });
        checks.push(SeedCheck {
            name: "pending_role_requests",
            expected: 2,
            actual: count(pool, "SELECT COUNT(*) FROM role_request WHERE status = 'Pending'")
                .await?,
        });
        checks.push(SeedCheck {
            name: "approved_role_requests",
            expected: 1,
            actual: count(pool, "SELECT COUNT(*) FROM role_request WHERE status = 'Approved'")
                .await?,
        });
        checks.push(SeedCheck {
            name: "rejected_role_requests",
            expected: 1,
            actual: count(pool, "SELECT COUNT(*) FROM role_request WHERE status = 'Rejected'")
                .await?,
        });

        let passed = checks.iter().all(|check| check.expected == check.actual);
        Ok(VerificationResult { passed, checks })
    }
}

async fn count(pool: &DbPool, sql: &str) -> Result<i64, RepositoryError> {
    let row = sqlx::query(sql).fetch_one(pool).await?;
    row.try_get::<i64, _>(0).map_err(|e| RepositoryError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::DemoPortfolio;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn demo_portfolio_loads_and_verifies() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        let seeded = DemoPortfolio::load(&pool).await.expect("load fixtures");
        assert_eq!(seeded.projects, 4);
        assert_eq!(seeded.programmes, 5);

        let verification = DemoPortfolio::verify(&pool).await.expect("verify fixtures");
        assert!(
            verification.passed,
            "all fixture checks should pass: {:?}",
            verification.checks
        );
    }

    #[tokio::test]
    async fn seeded_projects_cover_every_category() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        DemoPortfolio::load(&pool).await.expect("load fixtures");

        let distinct: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT category) FROM project")
                .fetch_one(&pool)
                .await
                .expect("count categories");
        assert_eq!(distinct, 4);
    }
}
