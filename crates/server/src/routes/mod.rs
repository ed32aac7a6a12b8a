use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod auth;
mod health;
mod projects;
mod story;
mod user;
mod video;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Auth routes
        .route("/auth/signup", post(auth::sign_up))
        .route("/auth/signin", post(auth::sign_in))
        .route("/auth/me", get(auth::me))
        // Projects
        .route("/projects/create", post(projects::create))
        .route("/projects", get(projects::list))
        .route("/projects/:id", get(projects::get))
        // Story generation
        .route("/story/generate", post(story::generate))
        .route("/story/regenerate/:scene_id", post(story::regenerate))
        // Video export
        .route("/video/export", post(video::export))
        .route("/video/status/:id", get(video::status))
        .route("/video", get(video::list))
        // Profile
        .route(
            "/user/profile",
            get(user::profile).put(user::update_profile),
        );

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router(delay_ms: u64) -> Router {
        let mut config = Config::default();
        config.auth.jwt_secret = "router-test-secret".to_string();
        config.render.delay_ms = delay_ms;
        create_router(AppState::new(config))
    }

    async fn call(
        app: &Router,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn sign_up(app: &Router, email: &str) -> String {
        let (status, body) = call(
            app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": email, "password": "hunter22" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_router(0);
        let (status, body) = call(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_protected_routes_require_token() {
        let app = test_router(0);
        let (status, body) = call(&app, Method::GET, "/api/projects", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());

        let (status, _) = call(&app, Method::GET, "/api/auth/me", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_rejected() {
        let app = test_router(0);
        sign_up(&app, "dup@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/signup",
            None,
            Some(json!({ "email": "DUP@example.com", "password": "another1" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Email already registered");
    }

    #[tokio::test]
    async fn test_sign_in_with_wrong_password() {
        let app = test_router(0);
        sign_up(&app, "user@example.com").await;

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/auth/signin",
            None,
            Some(json!({ "email": "user@example.com", "password": "wrong-pass" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_project_story_video_flow() {
        let app = test_router(0);
        let token = sign_up(&app, "flow@example.com").await;
        let token = Some(token.as_str());

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/projects/create",
            token,
            Some(json!({
                "prompt": "A lighthouse keeper finds a map",
                "style": "Watercolor",
                "duration": "30 seconds",
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        let project_id = body["data"]["projectId"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/story/generate",
            token,
            Some(json!({ "projectId": project_id, "prompt": "A lighthouse keeper finds a map" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let scenes = body["data"]["scenes"].as_array().unwrap();
        assert_eq!(scenes.len(), 4);
        let scene_id = scenes[1]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/story/regenerate/{}", scene_id),
            token,
            Some(json!({ "prompt": "make it stormy" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["scene"]["id"], scene_id.as_str());
        assert!(body["data"]["scene"]["text"]
            .as_str()
            .unwrap()
            .contains("make it stormy"));

        let (status, body) = call(
            &app,
            Method::POST,
            "/api/video/export",
            token,
            Some(json!({ "projectId": project_id })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "processing");
        let video_id = body["data"]["videoId"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/api/video/status/{}", video_id),
            token,
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "completed");
        assert_eq!(body["data"]["message"], shared::VIDEO_READY_MESSAGE);

        let (_, body) = call(&app, Method::GET, &format!("/api/projects/{}", project_id), token, None).await;
        assert_eq!(body["data"]["sceneCount"], 4);
        assert_eq!(body["data"]["status"], "completed");

        let (_, body) = call(&app, Method::GET, "/api/user/profile", token, None).await;
        assert_eq!(body["data"]["stats"]["videos"], 1);
        assert_eq!(body["data"]["stats"]["scenes"], 4);
    }

    #[tokio::test]
    async fn test_projects_are_scoped_to_owner() {
        let app = test_router(0);
        let alice = sign_up(&app, "alice@example.com").await;
        let bob = sign_up(&app, "bob@example.com").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/projects/create",
            Some(&alice),
            Some(json!({ "prompt": "Alice's story", "style": "Noir", "duration": "60 seconds" })),
        )
        .await;
        let project_id = body["data"]["projectId"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            Method::GET,
            &format!("/api/projects/{}", project_id),
            Some(&bob),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Project not found");

        let (_, body) = call(&app, Method::GET, "/api/projects", Some(&bob), None).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_video_stays_processing_until_delay() {
        let app = test_router(60_000);
        let token = sign_up(&app, "slow@example.com").await;

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/projects/create",
            Some(&token),
            Some(json!({ "prompt": "Slow render", "style": "Noir", "duration": "60 seconds" })),
        )
        .await;
        let project_id = body["data"]["projectId"].as_str().unwrap().to_string();

        let (_, body) = call(
            &app,
            Method::POST,
            "/api/video/export",
            Some(&token),
            Some(json!({ "projectId": project_id })),
        )
        .await;
        let video_id = body["data"]["videoId"].as_str().unwrap().to_string();

        let (_, body) = call(
            &app,
            Method::GET,
            &format!("/api/video/status/{}", video_id),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(body["data"]["status"], "processing");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let app = test_router(0);
        let token = sign_up(&app, "rename@example.com").await;

        let (status, body) = call(
            &app,
            Method::PUT,
            "/api/user/profile",
            Some(&token),
            Some(json!({ "name": "Renamed" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Renamed");

        let (_, body) = call(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
        assert_eq!(body["data"]["user"]["name"], "Renamed");
    }
}
