use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use shared::{
    Envelope, ExportVideoRequest, VideoExport, VIDEO_READY_MESSAGE, VIDEO_RENDERING_MESSAGE,
    VIDEO_STATUS_COMPLETED, VIDEO_STATUS_PROCESSING,
};
use uuid::Uuid;

use super::auth::authenticate;
use crate::{
    error::AppError,
    state::{AppState, VideoJob},
};

/// POST /video/export
pub async fn export(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ExportVideoRequest>,
) -> Result<Json<Envelope<VideoExport>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    if state.owned_project(&user_id, &req.project_id).is_none() {
        return Err(AppError::NotFound("Project not found".to_string()));
    }

    let job = VideoJob {
        video_id: Uuid::new_v4().to_string(),
        owner_id: user_id,
        project_id: req.project_id,
        started_at: chrono::Utc::now(),
    };
    tracing::info!("Started export {} for project {}", job.video_id, job.project_id);

    // Report the initial state even if the configured delay is zero
    let response = VideoExport {
        video_id: job.video_id.clone(),
        status: VIDEO_STATUS_PROCESSING.to_string(),
        message: VIDEO_RENDERING_MESSAGE.to_string(),
    };
    state.videos.insert(job.video_id.clone(), job);

    Ok(Json(Envelope::ok(response)))
}

/// GET /video/status/:id
pub async fn status(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(video_id): Path<String>,
) -> Result<Json<Envelope<VideoExport>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let job = state
        .videos
        .get(&video_id)
        .filter(|job| job.owner_id == user_id)
        .map(|job| job.value().clone())
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(Json(Envelope::ok(describe(&state, &job))))
}

/// GET /video
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Envelope<Vec<VideoExport>>>, AppError> {
    let user_id = authenticate(&state, &headers)?;

    let mut jobs: Vec<VideoJob> = state
        .videos
        .iter()
        .filter(|job| job.owner_id == user_id)
        .map(|job| job.value().clone())
        .collect();
    jobs.sort_by_key(|job| job.started_at);

    let videos = jobs.iter().map(|job| describe(&state, job)).collect();
    Ok(Json(Envelope::ok(videos)))
}

fn describe(state: &AppState, job: &VideoJob) -> VideoExport {
    let (status, message) = if state.is_render_complete(job) {
        (VIDEO_STATUS_COMPLETED, VIDEO_READY_MESSAGE)
    } else {
        (VIDEO_STATUS_PROCESSING, VIDEO_RENDERING_MESSAGE)
    };
    VideoExport {
        video_id: job.video_id.clone(),
        status: status.to_string(),
        message: message.to_string(),
    }
}
