use chrono::{DateTime, Utc};
use sqlx::Row;

use portview_core::domain::role::{
    ApprovedEmployee, EmployeeRole, PendingRoleRequest, ProgrammeId, RejectedRoleRequest,
    RequestId, RoleRequestStatus,
};

use super::{RepositoryError, RoleRequestRepository};
use crate::DbPool;

pub struct SqlRoleRequestRepository {
    pool: DbPool,
}

impl SqlRoleRequestRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn parse_status(raw: &str) -> RoleRequestStatus {
    RoleRequestStatus::from_label(raw).unwrap_or(RoleRequestStatus::Pending)
}

fn parse_role(raw: &str) -> Result<EmployeeRole, RepositoryError> {
    EmployeeRole::from_label(raw)
        .ok_or_else(|| RepositoryError::Decode(format!("unknown employee role `{raw}`")))
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_request(row: &sqlx::sqlite::SqliteRow) -> Result<PendingRoleRequest, RepositoryError> {
    let id: String = row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let employee_name: String =
        row.try_get("employee_name").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let employee_code: String =
        row.try_get("employee_code").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let requested_role: String =
        row.try_get("requested_role").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let status: String =
        row.try_get("status").map_err(|e| RepositoryError::Decode(e.to_string()))?;
    let submitted_at: String =
        row.try_get("submitted_at").map_err(|e| RepositoryError::Decode(e.to_string()))?;

    Ok(PendingRoleRequest {
        id: RequestId(id),
        employee_name,
        employee_code,
        requested_role: parse_role(&requested_role)?,
        submitted_at: parse_timestamp(&submitted_at),
        status: parse_status(&status),
    })
}

#[async_trait::async_trait]
impl RoleRequestRepository for SqlRoleRequestRepository {
    async fn list_pending(&self) -> Result<Vec<PendingRoleRequest>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, employee_name, employee_code, requested_role, status, submitted_at
             FROM role_request WHERE status = 'Pending' ORDER BY submitted_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_request).collect()
    }

    async fn list_approved(&self) -> Result<Vec<ApprovedEmployee>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT rr.id, rr.employee_name, rr.employee_code, rr.requested_role,
                    rr.decided_at, p.name AS programme_name
             FROM role_request rr
             LEFT JOIN programme p ON p.id = rr.assigned_programme_id
             WHERE rr.status = 'Approved'
             ORDER BY rr.decided_at, rr.id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String =
                    row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let employee_name: String = row
                    .try_get("employee_name")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let employee_code: String = row
                    .try_get("employee_code")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let requested_role: String = row
                    .try_get("requested_role")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let decided_at: Option<String> = row
                    .try_get("decided_at")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let programme_name: Option<String> = row
                    .try_get("programme_name")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;

                Ok(ApprovedEmployee {
                    id: RequestId(id),
                    employee_name,
                    employee_code,
                    assigned_role: parse_role(&requested_role)?,
                    assigned_programme: programme_name,
                    approved_at: decided_at.as_deref().map(parse_timestamp).unwrap_or_else(Utc::now),
                })
            })
            .collect()
    }

    async fn list_rejected(&self) -> Result<Vec<RejectedRoleRequest>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, employee_name, employee_code, requested_role, decided_at, rejection_reason
             FROM role_request WHERE status = 'Rejected'
             ORDER BY decided_at, id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                let id: String =
                    row.try_get("id").map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let employee_name: String = row
                    .try_get("employee_name")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let employee_code: String = row
                    .try_get("employee_code")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let requested_role: String = row
                    .try_get("requested_role")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let decided_at: Option<String> = row
                    .try_get("decided_at")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;
                let rejection_reason: Option<String> = row
                    .try_get("rejection_reason")
                    .map_err(|e| RepositoryError::Decode(e.to_string()))?;

                Ok(RejectedRoleRequest {
                    id: RequestId(id),
                    employee_name,
                    employee_code,
                    requested_role: parse_role(&requested_role)?,
                    rejection_reason: rejection_reason.unwrap_or_default(),
                    rejected_at: decided_at.as_deref().map(parse_timestamp).unwrap_or_else(Utc::now),
                })
            })
            .collect()
    }

    async fn find_by_id(
        &self,
        id: &RequestId,
    ) -> Result<Option<PendingRoleRequest>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, employee_name, employee_code, requested_role, status, submitted_at
             FROM role_request WHERE id = ?",
        )
        .bind(&id.0)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(ref row) => Ok(Some(row_to_request(row)?)),
            None => Ok(None),
        }
    }

    async fn mark_approved(
        &self,
        id: &RequestId,
        programme_id: Option<&ProgrammeId>,
        decided_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE role_request
             SET status = 'Approved', decided_at = ?, assigned_programme_id = ?
             WHERE id = ? AND status = 'Pending'",
        )
        .bind(decided_at.to_rfc3339())
        .bind(programme_id.map(|programme_id| programme_id.0.clone()))
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_rejected(
        &self,
        id: &RequestId,
        reason: &str,
        decided_at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE role_request
             SET status = 'Rejected', decided_at = ?, rejection_reason = ?
             WHERE id = ? AND status = 'Pending'",
        )
        .bind(decided_at.to_rfc3339())
        .bind(reason)
        .bind(&id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use portview_core::domain::role::{EmployeeRole, ProgrammeId, RequestId, RoleRequestStatus};

    use super::SqlRoleRequestRepository;
    use crate::repositories::RoleRequestRepository;
    use crate::{connect_with_settings, migrations, DbPool};

    async fn setup() -> (DbPool, SqlRoleRequestRepository) {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");

        sqlx::query("INSERT INTO programme (id, name) VALUES ('PG-1', 'GSLV')")
            .execute(&pool)
            .await
            .expect("seed programme");

        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO role_request (id, employee_name, employee_code, requested_role, status, submitted_at)
             VALUES ('RR-1', 'A. Rao', 'EMP-0042', 'Programme Director', 'Pending', ?),
                    ('RR-2', 'K. Menon', 'EMP-0107', 'Project Director', 'Pending', ?)",
        )
        .bind(&now)
        .bind(&now)
        .execute(&pool)
        .await
        .expect("seed requests");

        (pool.clone(), SqlRoleRequestRepository::new(pool))
    }

    #[tokio::test]
    async fn pending_list_contains_only_undecided_requests() {
        let (_pool, repo) = setup().await;

        let pending = repo.list_pending().await.expect("list pending");
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|request| request.status == RoleRequestStatus::Pending));
    }

    #[tokio::test]
    async fn approval_moves_request_into_the_approved_registry() {
        let (_pool, repo) = setup().await;
        let id = RequestId("RR-1".to_string());

        let applied = repo
            .mark_approved(&id, Some(&ProgrammeId("PG-1".to_string())), Utc::now())
            .await
            .expect("mark approved");
        assert!(applied);

        let pending = repo.list_pending().await.expect("list pending");
        assert_eq!(pending.len(), 1);

        let approved = repo.list_approved().await.expect("list approved");
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].assigned_role, EmployeeRole::ProgrammeDirector);
        assert_eq!(approved[0].assigned_programme.as_deref(), Some("GSLV"));
    }

    #[tokio::test]
    async fn rejection_retains_the_reason_in_the_rejected_registry() {
        let (_pool, repo) = setup().await;
        let id = RequestId("RR-2".to_string());

        let applied = repo
            .mark_rejected(&id, "Employee code could not be verified.", Utc::now())
            .await
            .expect("mark rejected");
        assert!(applied);

        let rejected = repo.list_rejected().await.expect("list rejected");
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].rejection_reason, "Employee code could not be verified.");
    }

    #[tokio::test]
    async fn decided_requests_cannot_be_decided_twice() {
        let (_pool, repo) = setup().await;
        let id = RequestId("RR-2".to_string());

        assert!(repo.mark_rejected(&id, "duplicate code", Utc::now()).await.expect("first"));
        assert!(!repo.mark_approved(&id, None, Utc::now()).await.expect("second"));
    }
}
