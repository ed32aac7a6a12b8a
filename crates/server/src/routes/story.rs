use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use shared::{
    story, Envelope, GenerateStoryRequest, GeneratedStory, RegenerateSceneRequest,
    RegeneratedScene,
};
use uuid::Uuid;

use super::auth::authenticate;
use crate::{
    error::AppError,
    state::{AppState, SceneRecord},
};

/// POST /story/generate
pub async fn generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<GenerateStoryRequest>,
) -> Result<Json<Envelope<GeneratedStory>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    if state.owned_project(&user_id, &req.project_id).is_none() {
        return Err(AppError::NotFound("Project not found".to_string()));
    }
    if req.prompt.trim().is_empty() {
        return Err(AppError::BadRequest("Prompt is required".to_string()));
    }

    // Drafted ids are positional; give each scene a global id instead
    let scenes: Vec<_> = story::draft_scenes(&req.prompt)
        .into_iter()
        .map(|mut scene| {
            scene.id = Uuid::new_v4().to_string();
            scene
        })
        .collect();

    for scene in &scenes {
        state.scenes.insert(
            scene.id.clone(),
            SceneRecord {
                owner_id: user_id.clone(),
                project_id: req.project_id.clone(),
                scene: scene.clone(),
            },
        );
    }

    if let Some(mut record) = state.projects.get_mut(&req.project_id) {
        record.project.scene_count = Some(scenes.len() as u32);
    }

    tracing::info!(
        "Generated {} scenes for project {}",
        scenes.len(),
        req.project_id
    );

    Ok(Json(Envelope::ok(GeneratedStory { scenes })))
}

/// POST /story/regenerate/:scene_id
pub async fn regenerate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(scene_id): Path<String>,
    Json(req): Json<RegenerateSceneRequest>,
) -> Result<Json<Envelope<RegeneratedScene>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let mut record = state
        .scenes
        .get_mut(&scene_id)
        .filter(|record| record.owner_id == user_id)
        .ok_or_else(|| AppError::NotFound("Scene not found".to_string()))?;

    let mut scene = story::redraft_scene(&scene_id, req.prompt.as_deref());
    scene.title = record.scene.title.clone();
    scene.scene_number = record.scene.scene_number;
    record.scene = scene.clone();

    tracing::info!(
        "Regenerated scene {} of project {}",
        scene_id,
        record.project_id
    );

    Ok(Json(Envelope::ok(RegeneratedScene { scene })))
}
