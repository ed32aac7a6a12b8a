use chrono::{DateTime, Utc};
use dashmap::DashMap;
use shared::{GeneratedScene, Project, User};
use std::sync::Arc;

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub owner_id: String,
    pub project: Project,
}

#[derive(Debug, Clone)]
pub struct SceneRecord {
    pub owner_id: String,
    pub project_id: String,
    pub scene: GeneratedScene,
}

/// A simulated render
#[derive(Debug, Clone)]
pub struct VideoJob {
    pub video_id: String,
    pub owner_id: String,
    pub project_id: String,
    pub started_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// User ID -> account
    pub users: Arc<DashMap<String, UserRecord>>,
    /// Email -> user ID
    pub emails: Arc<DashMap<String, String>>,
    pub projects: Arc<DashMap<String, ProjectRecord>>,
    pub scenes: Arc<DashMap<String, SceneRecord>>,
    pub videos: Arc<DashMap<String, VideoJob>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            users: Arc::new(DashMap::new()),
            emails: Arc::new(DashMap::new()),
            projects: Arc::new(DashMap::new()),
            scenes: Arc::new(DashMap::new()),
            videos: Arc::new(DashMap::new()),
        }
    }

    /// Project owned by `owner_id`, if any
    pub fn owned_project(&self, owner_id: &str, project_id: &str) -> Option<Project> {
        self.projects
            .get(project_id)
            .filter(|record| record.owner_id == owner_id)
            .map(|record| record.project.clone())
    }

    pub fn is_render_complete(&self, job: &VideoJob) -> bool {
        let elapsed = Utc::now().signed_duration_since(job.started_at);
        elapsed.num_milliseconds() >= self.config.render.delay_ms as i64
    }
}
