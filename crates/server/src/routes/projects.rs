use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use shared::{CreateProjectRequest, CreatedProject, Envelope, Project, ProjectStatus};
use uuid::Uuid;

use super::auth::authenticate;
use crate::{
    error::AppError,
    state::{AppState, ProjectRecord},
};

const TITLE_CHARS: usize = 40;

/// POST /projects/create
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<Envelope<CreatedProject>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(AppError::BadRequest("Prompt is required".to_string()));
    }

    let project = Project {
        id: Uuid::new_v4().to_string(),
        prompt: prompt.to_string(),
        style: req.style,
        duration: req.duration,
        title: Some(title_from_prompt(prompt)),
        scene_count: None,
        status: Some(ProjectStatus::Draft),
        created_at: Some(chrono::Utc::now().to_rfc3339()),
    };
    let project_id = project.id.clone();

    state.projects.insert(
        project_id.clone(),
        ProjectRecord {
            owner_id: user_id,
            project,
        },
    );
    tracing::info!("Created project {}", project_id);

    Ok(Json(Envelope::ok(CreatedProject { project_id })))
}

/// GET /projects
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<Project>>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let mut projects: Vec<Project> = state
        .projects
        .iter()
        .filter(|record| record.owner_id == user_id)
        .map(|record| with_render_status(&state, record.project.clone()))
        .collect();
    projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));

    Ok(Json(Envelope::ok(projects)))
}

/// GET /projects/:id
pub async fn get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(project_id): Path<String>,
) -> Result<Json<Envelope<Project>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let project = state
        .owned_project(&user_id, &project_id)
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok(Json(Envelope::ok(with_render_status(&state, project))))
}

/// A project counts as completed once one of its exports has finished
fn with_render_status(state: &AppState, mut project: Project) -> Project {
    let rendered = state
        .videos
        .iter()
        .any(|job| job.project_id == project.id && state.is_render_complete(&job));
    if rendered {
        project.status = Some(ProjectStatus::Completed);
    }
    project
}

fn title_from_prompt(prompt: &str) -> String {
    let first_line = prompt.lines().next().unwrap_or(prompt).trim();
    if first_line.chars().count() <= TITLE_CHARS {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(TITLE_CHARS).collect();
    format!("{}...", cut.trim_end())
}
