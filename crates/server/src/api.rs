//! Project portfolio REST API.
//!
//! Endpoints:
//! - `GET  /api/projects`      — list all projects with their milestones
//! - `POST /api/projects`      — create a project (On Track, zero spend, no milestones)
//! - `GET  /api/projects/{id}` — fetch a single project
//! - `PUT  /api/projects/{id}` — full-record replace, milestones included

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use portview_core::domain::project::{Project, ProjectCategory, ProjectId};
use portview_core::forms::NewProjectInput;
use portview_db::repositories::{ProjectRepository, RepositoryError, SqlProjectRepository};
use portview_db::DbPool;

#[derive(Clone)]
pub struct ApiState {
    db_pool: DbPool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    pub category: ProjectCategory,
    pub total_budget: Decimal,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new()
        .route("/api/projects", get(list_projects))
        .route("/api/projects", post(create_project))
        .route("/api/projects/{id}", get(get_project))
        .route("/api/projects/{id}", put(update_project))
        .with_state(ApiState { db_pool })
}

async fn list_projects(
    State(state): State<ApiState>,
) -> Result<Json<Vec<Project>>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlProjectRepository::new(state.db_pool.clone());
    let projects = repo.list().await.map_err(db_error)?;
    Ok(Json(projects))
}

async fn get_project(
    Path(id): Path<String>,
    State(state): State<ApiState>,
) -> Result<Json<Project>, (StatusCode, Json<ErrorBody>)> {
    let repo = SqlProjectRepository::new(state.db_pool.clone());
    let project = repo.find_by_id(&ProjectId(id.clone())).await.map_err(db_error)?;

    match project {
        Some(project) => Ok(Json(project)),
        None => Err(not_found(format!("project `{id}` not found"))),
    }
}

async fn create_project(
    State(state): State<ApiState>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), (StatusCode, Json<ErrorBody>)> {
    let input = NewProjectInput {
        name: body.name.trim().to_string(),
        category: body.category,
        total_budget: body.total_budget,
        description: body.description,
    };
    input.validate().map_err(|error| bad_request(error.to_string()))?;

    let project = Project::created(
        mint_project_id(),
        input.name.clone(),
        input.category,
        input.total_budget,
        input.description_or_default(),
    );

    let repo = SqlProjectRepository::new(state.db_pool.clone());
    repo.insert(&project, Utc::now()).await.map_err(db_error)?;

    info!(
        event_name = "api.project.created",
        project_id = %project.id.0,
        category = project.category.label(),
        "project created"
    );

    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    Path(id): Path<String>,
    State(state): State<ApiState>,
    Json(project): Json<Project>,
) -> Result<Json<Project>, (StatusCode, Json<ErrorBody>)> {
    if project.id.0 != id {
        return Err(bad_request(format!(
            "body project id `{}` does not match path id `{id}`",
            project.id.0
        )));
    }

    if project.name.trim().is_empty() {
        return Err(bad_request("project name must not be empty".to_string()));
    }

    let repo = SqlProjectRepository::new(state.db_pool.clone());
    let updated = repo.update(&project, Utc::now()).await.map_err(db_error)?;
    if !updated {
        return Err(not_found(format!("project `{id}` not found")));
    }

    info!(
        event_name = "api.project.updated",
        project_id = %project.id.0,
        milestone_count = project.milestones.len(),
        "project record replaced"
    );

    Ok(Json(project))
}

fn mint_project_id() -> ProjectId {
    ProjectId(format!("PRJ-{}", &Uuid::new_v4().simple().to_string()[..12]))
}

fn db_error(error: RepositoryError) -> (StatusCode, Json<ErrorBody>) {
    error!(error = %error, "project api database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody { error: "an internal error occurred".to_string() }),
    )
}

fn bad_request(message: String) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message }))
}

fn not_found(message: String) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: message }))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::{Path, State};
    use axum::http::{Request, StatusCode};
    use axum::Json;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use tower::ServiceExt;

    use portview_core::domain::project::{
        Milestone, MilestoneId, MilestoneStatus, ProjectStatus,
    };
    use portview_core::ProjectCategory;
    use portview_db::{connect_with_settings, migrations, DbPool};

    use super::*;

    async fn setup() -> DbPool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn state(pool: DbPool) -> State<ApiState> {
        State(ApiState { db_pool: pool })
    }

    fn create_request(name: &str, budget: i64) -> CreateProjectRequest {
        CreateProjectRequest {
            name: name.to_string(),
            category: ProjectCategory::SatelliteCommunication,
            total_budget: Decimal::new(budget, 0),
            description: None,
        }
    }

    #[tokio::test]
    async fn created_project_defaults_to_on_track_with_no_spend() {
        let pool = setup().await;

        let (status, Json(created)) =
            create_project(state(pool.clone()), Json(create_request("Sat-X", 1_000_000)))
                .await
                .expect("create should succeed");

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "Sat-X");
        assert_eq!(created.category, ProjectCategory::SatelliteCommunication);
        assert_eq!(created.total_budget, Decimal::new(1_000_000, 0));
        assert_eq!(created.expenditure, Decimal::ZERO);
        assert_eq!(created.status, ProjectStatus::OnTrack);
        assert!(created.milestones.is_empty());

        let Json(fetched) = get_project(Path(created.id.0.clone()), state(pool))
            .await
            .expect("created record should be readable");
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let pool = setup().await;

        let result = create_project(state(pool), Json(create_request("   ", 10))).await;

        let (status, Json(body)) = result.expect_err("blank name should be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.error.contains("name"));
    }

    #[tokio::test]
    async fn update_replaces_the_full_record_including_milestones() {
        let pool = setup().await;
        let (_, Json(mut project)) =
            create_project(state(pool.clone()), Json(create_request("Sat-X", 1_000_000)))
                .await
                .expect("create");

        project.status = ProjectStatus::Delayed;
        project.delay_remarks = Some("Launch window slipped to Q3.".to_string());
        project.milestones.push(Milestone {
            id: MilestoneId("MS-1".to_string()),
            title: "Thermal Vacuum Test".to_string(),
            due_date: NaiveDate::from_ymd_opt(2026, 10, 1).expect("valid date"),
            status: MilestoneStatus::Pending,
            completed_date: None,
        });

        let Json(updated) = update_project(
            Path(project.id.0.clone()),
            state(pool.clone()),
            Json(project.clone()),
        )
        .await
        .expect("update should succeed");
        assert_eq!(updated, project);

        let Json(fetched) =
            get_project(Path(project.id.0.clone()), state(pool)).await.expect("fetch");
        assert_eq!(fetched.status, ProjectStatus::Delayed);
        assert_eq!(fetched.milestones.len(), 1);
        assert_eq!(fetched.milestones[0].title, "Thermal Vacuum Test");
    }

    #[tokio::test]
    async fn update_with_mismatched_id_is_rejected() {
        let pool = setup().await;
        let (_, Json(project)) =
            create_project(state(pool.clone()), Json(create_request("Sat-X", 10)))
                .await
                .expect("create");

        let (status, _) =
            update_project(Path("PRJ-OTHER".to_string()), state(pool), Json(project))
                .await
                .expect_err("id mismatch should be rejected");
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn update_of_unknown_project_returns_not_found() {
        let pool = setup().await;
        let project = Project::created(
            ProjectId("PRJ-GHOST".to_string()),
            "Ghost".to_string(),
            ProjectCategory::LaunchVehicles,
            Decimal::ZERO,
            "missing".to_string(),
        );

        let (status, Json(body)) =
            update_project(Path("PRJ-GHOST".to_string()), state(pool), Json(project))
                .await
                .expect_err("unknown project should 404");
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.error.contains("not found"));
    }

    #[tokio::test]
    async fn router_serves_the_project_list() {
        let pool = setup().await;
        create_project(state(pool.clone()), Json(create_request("Sat-X", 42)))
            .await
            .expect("create");

        let response = router(pool)
            .oneshot(
                Request::builder()
                    .uri("/api/projects")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let projects: Vec<Project> = serde_json::from_slice(&bytes).expect("decode body");
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Sat-X");
    }
}
