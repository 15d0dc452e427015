//! Project queries and default-project resolution

use qcdash_common::db::models::{Project, PROJECT_DEFAULT_STATUS};
use qcdash_common::time;
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_PROJECT_NAME: &str = "Quality Compliance Project";
pub const DEFAULT_PROJECT_DESCRIPTION: &str = "Default project for quality compliance dashboard";

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: String,
    pub status: Option<String>,
}

/// Oldest first, so the first row is the owner's original project
pub async fn list_by_owner(pool: &SqlitePool, owner_id: &str) -> Result<Vec<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE owner_id = ? ORDER BY created_at ASC",
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
}

pub async fn insert(pool: &SqlitePool, new: NewProject) -> Result<Project, sqlx::Error> {
    let now = time::now();
    let project = Project {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        description: new.description,
        owner_id: new.owner_id,
        status: new.status.unwrap_or_else(|| PROJECT_DEFAULT_STATUS.to_string()),
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO projects (id, name, description, owner_id, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&project.id)
    .bind(&project.name)
    .bind(&project.description)
    .bind(&project.owner_id)
    .bind(&project.status)
    .bind(project.created_at)
    .bind(project.updated_at)
    .execute(pool)
    .await?;

    Ok(project)
}

/// The owner's first project, creating the default one if they have none
pub async fn default_project(pool: &SqlitePool, owner_id: &str) -> Result<Project, sqlx::Error> {
    let existing = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE owner_id = ? ORDER BY created_at ASC LIMIT 1",
    )
    .bind(owner_id)
    .fetch_optional(pool)
    .await?;

    if let Some(project) = existing {
        return Ok(project);
    }

    let project = insert(
        pool,
        NewProject {
            name: DEFAULT_PROJECT_NAME.to_string(),
            description: Some(DEFAULT_PROJECT_DESCRIPTION.to_string()),
            owner_id: owner_id.to_string(),
            status: None,
        },
    )
    .await?;
    info!("Created default project {} for owner {}", project.id, owner_id);
    Ok(project)
}
