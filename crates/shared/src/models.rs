use serde::{Deserialize, Serialize};

// ============================================================================
// Auth
// ============================================================================

/// Body of `POST /auth/signup`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `POST /auth/signin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Payload returned by sign-up and sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// Account as the backend reports it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default = "default_subscription")]
    pub subscription: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn default_subscription() -> String {
    "free".to_string()
}

/// Usage counters shown on the profile page
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    #[serde(default)]
    pub videos: u64,
    #[serde(default)]
    pub scenes: u64,
    #[serde(default)]
    pub views: u64,
}

/// Payload of `GET /user/profile` and `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user: User,
    #[serde(default)]
    pub stats: UserStats,
}

/// Body of `PUT /user/profile`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

// ============================================================================
// Projects
// ============================================================================

pub const DEFAULT_STYLE: &str = "Cinematic Sci-Fi";
pub const DEFAULT_DURATION: &str = "60 seconds";

/// Body of `POST /projects/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub prompt: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default = "default_duration")]
    pub duration: String,
}

impl CreateProjectRequest {
    /// Fill in the default style and duration when the caller left them out
    pub fn new(prompt: impl Into<String>, style: Option<String>, duration: Option<String>) -> Self {
        Self {
            prompt: prompt.into(),
            style: style.unwrap_or_else(default_style),
            duration: duration.unwrap_or_else(default_duration),
        }
    }
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

/// Payload of `POST /projects/create`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProject {
    pub project_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Completed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

// ============================================================================
// Story
// ============================================================================

/// Body of `POST /story/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    pub project_id: String,
    pub prompt: String,
}

/// Scene exactly as the backend returns it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScene {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_number: Option<u32>,
}

/// Payload of `POST /story/generate`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneratedStory {
    #[serde(default)]
    pub scenes: Vec<GeneratedScene>,
}

/// Body of `POST /story/regenerate/{sceneId}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegenerateSceneRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

/// Payload of `POST /story/regenerate/{sceneId}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegeneratedScene {
    pub scene: GeneratedScene,
}

/// Client-side lifecycle of a scene card
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SceneStatus {
    #[default]
    Pending,
    Processing,
    Ready,
}

/// Scene as presented to the user, with local progress tracking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub body: String,
    pub status: SceneStatus,
    /// Percent, 0..=100
    pub progress: u8,
}

// ============================================================================
// Video
// ============================================================================

/// Body of `POST /video/export`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportVideoRequest {
    pub project_id: String,
}

/// Export job, returned by `POST /video/export`, `GET /video/status/{id}`
/// and listed by `GET /video`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoExport {
    pub video_id: String,
    pub status: String,
    #[serde(default)]
    pub message: String,
}

pub const VIDEO_STATUS_PROCESSING: &str = "processing";
pub const VIDEO_STATUS_COMPLETED: &str = "completed";

/// Message accompanying a `processing` export
pub const VIDEO_RENDERING_MESSAGE: &str =
    "Rendering may take a few minutes depending on video length.";
/// Message accompanying a `completed` export
pub const VIDEO_READY_MESSAGE: &str = "Your AI-generated video is ready to download.";

// ============================================================================
// Envelope
// ============================================================================

/// Error body every failing endpoint is expected to send
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Success wrapper the backend puts around payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

/// Unwrap a decoded response body: its `data` field when present and not
/// null, otherwise the whole body.
pub fn unwrap_data(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.get("data").is_some_and(|d| !d.is_null()) => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_data_passes_through_data_field() {
        let body = json!({"success": true, "data": {"projectId": "p-1"}});
        assert_eq!(unwrap_data(body), json!({"projectId": "p-1"}));

        let body = json!({"data": [1, 2, 3]});
        assert_eq!(unwrap_data(body), json!([1, 2, 3]));
    }

    #[test]
    fn test_unwrap_data_returns_whole_body_without_data() {
        let body = json!({"projectId": "p-1", "success": true});
        assert_eq!(unwrap_data(body.clone()), body);

        let body = json!([{"id": "a"}]);
        assert_eq!(unwrap_data(body.clone()), body);
    }

    #[test]
    fn test_unwrap_data_treats_null_as_absent() {
        let body = json!({"data": null, "status": "ok"});
        assert_eq!(unwrap_data(body.clone()), body);
    }

    #[test]
    fn test_create_project_defaults() {
        let req = CreateProjectRequest::new("A robot learns to paint", None, None);
        assert_eq!(req.style, DEFAULT_STYLE);
        assert_eq!(req.duration, DEFAULT_DURATION);

        let req: CreateProjectRequest = serde_json::from_str(r#"{"prompt":"x"}"#).unwrap();
        assert_eq!(req.style, "Cinematic Sci-Fi");
        assert_eq!(req.duration, "60 seconds");
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let req = SignUpRequest {
            email: "a@b.c".to_string(),
            password: "secret1".to_string(),
            name: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("name"));

        let json = serde_json::to_string(&UpdateProfileRequest::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = serde_json::to_string(&GenerateStoryRequest {
            project_id: "p-1".to_string(),
            prompt: "x".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"projectId\":\"p-1\""));

        let export: VideoExport =
            serde_json::from_str(r#"{"videoId":"v-1","status":"processing"}"#).unwrap();
        assert_eq!(export.video_id, "v-1");
        assert_eq!(export.message, "");
    }

    #[test]
    fn test_user_defaults_when_fields_missing() {
        let user: User = serde_json::from_str(r#"{"id":"u-1","email":"a@b.c"}"#).unwrap();
        assert_eq!(user.subscription, "free");
        assert_eq!(user.name, "");
        assert!(user.avatar.is_none());

        let profile: UserProfile =
            serde_json::from_str(r#"{"user":{"id":"u-1","email":"a@b.c"}}"#).unwrap();
        assert_eq!(profile.stats, UserStats::default());
    }

    #[test]
    fn test_scene_status_serialization() {
        assert_eq!(serde_json::to_string(&SceneStatus::Processing).unwrap(), "\"processing\"");
        let status: SceneStatus = serde_json::from_str("\"ready\"").unwrap();
        assert_eq!(status, SceneStatus::Ready);
        assert_eq!(SceneStatus::default(), SceneStatus::Pending);
    }

    #[test]
    fn test_project_status_serialization() {
        let project: Project =
            serde_json::from_str(r#"{"id":"1","status":"completed","sceneCount":5}"#).unwrap();
        assert_eq!(project.status, Some(ProjectStatus::Completed));
        assert_eq!(project.scene_count, Some(5));
    }
}
