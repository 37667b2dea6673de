use sqlx::Row;

use portview_core::domain::role::{Programme, ProgrammeId};

use super::{ProgrammeRepository, RepositoryError};
use crate::DbPool;

pub struct SqlProgrammeRepository {
    pool: DbPool,
}

impl SqlProgrammeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_programme(row: &sqlx::sqlite::SqliteRow) -> Result<Programme, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let name: String = row.try_get("name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    Ok(Programme { id: ProgrammeId(id), name })
}

#[async_trait::async_trait]
impl ProgrammeRepository for SqlProgrammeRepository {
    async fn list(&self) -> Result<Vec<Programme>, RepositoryError> {
        let rows = sqlx::query("SELECT id, name FROM programme ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_programme).collect()
    }

    async fn find_by_id(&self, id: &ProgrammeId) -> Result<Option<Programme>, RepositoryError> {
        let row = sqlx::query("SELECT id, name FROM programme WHERE id = ?")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref row) => Ok(Some(row_to_programme(row)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use portview_core::domain::role::ProgrammeId;

    use super::SqlProgrammeRepository;
    use crate::repositories::ProgrammeRepository;
    use crate::{connect_with_settings, migrations};

    #[tokio::test]
    async fn listing_returns_reference_data_sorted_by_name() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        sqlx::query(
            "INSERT INTO programme (id, name) VALUES ('PG-2', 'PSLV'), ('PG-1', 'GSLV')",
        )
        .execute(&pool)
        .await
        .expect("seed programmes");

        let repo = SqlProgrammeRepository::new(pool);
        let programmes = repo.list().await.expect("list");
        assert_eq!(programmes.len(), 2);
        assert_eq!(programmes[0].name, "GSLV");

        let found = repo
            .find_by_id(&ProgrammeId("PG-2".to_string()))
            .await
            .expect("find")
            .expect("exists");
        assert_eq!(found.name, "PSLV");

        let missing =
            repo.find_by_id(&ProgrammeId("PG-404".to_string())).await.expect("find call");
        assert!(missing.is_none());
    }
}
