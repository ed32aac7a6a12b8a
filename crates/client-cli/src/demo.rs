//! Placeholder payloads for demo mode.
//!
//! Every value here is deterministic apart from minted identifiers, which
//! combine a millisecond timestamp with a per-gateway counter so ids minted
//! back to back never collide.

use shared::{
    story, AuthPayload, CreatedProject, GeneratedScene, GeneratedStory, Project, ProjectStatus,
    UpdateProfileRequest, User, UserProfile, UserStats, VideoExport, DEFAULT_DURATION,
    DEFAULT_STYLE, VIDEO_READY_MESSAGE, VIDEO_RENDERING_MESSAGE, VIDEO_STATUS_COMPLETED,
    VIDEO_STATUS_PROCESSING,
};
use std::sync::atomic::{AtomicU64, Ordering};

const DEMO_USER_ID: &str = "demo-user";
const DEMO_USER_NAME: &str = "VidMuse Creator";
const DEMO_USER_EMAIL: &str = "creator@vidmuse.ai";

#[derive(Debug, Default)]
pub struct DemoData {
    seq: AtomicU64,
}

impl DemoData {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::Relaxed)
    }

    fn mint_id(&self, prefix: &str) -> String {
        format!(
            "{}-{}-{}",
            prefix,
            chrono::Utc::now().timestamp_millis(),
            self.next_seq()
        )
    }

    pub fn auth(&self, email: &str, name: Option<&str>) -> AuthPayload {
        let mut user = demo_user();
        user.email = email.to_string();
        if let Some(name) = name {
            user.name = name.to_string();
        }
        AuthPayload {
            token: format!("demo-token-{}", self.next_seq()),
            user,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            user: demo_user(),
            stats: UserStats {
                videos: 12,
                scenes: 48,
                views: 9200,
            },
        }
    }

    pub fn updated_user(&self, update: &UpdateProfileRequest) -> User {
        let mut user = demo_user();
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if update.avatar.is_some() {
            user.avatar = update.avatar.clone();
        }
        user
    }

    pub fn created_project(&self) -> CreatedProject {
        CreatedProject {
            project_id: self.mint_id("demo"),
        }
    }

    pub fn library(&self) -> Vec<Project> {
        vec![
            library_entry("1", "Futuristic Time Device", 5, "60s", ProjectStatus::Completed),
            library_entry("2", "Cyberpunk City Chase", 4, "45s", ProjectStatus::Draft),
        ]
    }

    pub fn project(&self, project_id: &str) -> Project {
        self.library()
            .into_iter()
            .find(|p| p.id == project_id)
            .unwrap_or_else(|| Project {
                id: project_id.to_string(),
                prompt: String::new(),
                style: DEFAULT_STYLE.to_string(),
                duration: DEFAULT_DURATION.to_string(),
                title: Some("Untitled project".to_string()),
                scene_count: None,
                status: Some(ProjectStatus::Draft),
                created_at: None,
            })
    }

    pub fn story(&self, prompt: &str) -> GeneratedStory {
        GeneratedStory {
            scenes: story::draft_scenes(prompt),
        }
    }

    pub fn regenerated_scene(&self, scene_id: &str, prompt: Option<&str>) -> GeneratedScene {
        story::redraft_scene(scene_id, prompt)
    }

    pub fn video_export(&self) -> VideoExport {
        VideoExport {
            video_id: self.mint_id("demo-video"),
            status: VIDEO_STATUS_PROCESSING.to_string(),
            message: VIDEO_RENDERING_MESSAGE.to_string(),
        }
    }

    pub fn video_status(&self, video_id: &str) -> VideoExport {
        VideoExport {
            video_id: video_id.to_string(),
            status: VIDEO_STATUS_COMPLETED.to_string(),
            message: VIDEO_READY_MESSAGE.to_string(),
        }
    }

    pub fn videos(&self) -> Vec<VideoExport> {
        vec![self.video_status("demo-video-1")]
    }
}

fn demo_user() -> User {
    User {
        id: DEMO_USER_ID.to_string(),
        email: DEMO_USER_EMAIL.to_string(),
        name: DEMO_USER_NAME.to_string(),
        avatar: None,
        subscription: "free".to_string(),
        created_at: None,
    }
}

fn library_entry(
    id: &str,
    title: &str,
    scenes: u32,
    duration: &str,
    status: ProjectStatus,
) -> Project {
    Project {
        id: id.to_string(),
        prompt: title.to_string(),
        style: DEFAULT_STYLE.to_string(),
        duration: duration.to_string(),
        title: Some(title.to_string()),
        scene_count: Some(scenes),
        status: Some(status),
        created_at: None,
    }
}
