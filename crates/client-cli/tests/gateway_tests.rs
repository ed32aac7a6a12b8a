use axum::{
    extract::Path,
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use vidmuse::{FileTokenStore, Gateway, GatewayMode, RequestError, Session, TokenStore};

/// Serve `app` on an ephemeral port and return its `/api` base URL
async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

async fn spawn_dev_backend() -> String {
    let mut config = vidmuse_server::Config::default();
    config.auth.jwt_secret = "gateway-test-secret".to_string();
    config.render.delay_ms = 0;
    spawn(vidmuse_server::create_router(vidmuse_server::AppState::new(config))).await
}

/// Base URL of a port nothing listens on
async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

fn gateway(base_url: &str) -> Gateway {
    Gateway::new(base_url, Arc::new(Session::in_memory()))
}

#[tokio::test]
async fn test_envelope_data_is_unwrapped() {
    let app = Router::new().route(
        "/api/projects",
        get(|| async {
            Json(json!({
                "success": true,
                "data": [{ "id": "p1", "prompt": "Tides", "style": "Noir", "duration": "30 seconds" }],
            }))
        }),
    );
    let base = spawn(app).await;

    let projects = gateway(&base).projects().all().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].id, "p1");
}

#[tokio::test]
async fn test_body_without_data_is_returned_whole() {
    let app = Router::new().route(
        "/api/projects/:id",
        get(|| async {
            Json(json!({ "id": "raw", "prompt": "Plain body", "style": "Noir", "duration": "60 seconds" }))
        }),
    );
    let base = spawn(app).await;

    let project = gateway(&base).projects().by_id("raw").await.unwrap();
    assert_eq!(project.id, "raw");
    assert_eq!(project.prompt, "Plain body");
}

#[tokio::test]
async fn test_primitive_returns_raw_payload() {
    let app = Router::new().route(
        "/api/ping",
        get(|| async { Json(json!({ "success": true, "data": { "pong": 1 } })) }),
    );
    let base = spawn(app).await;

    let value: Value = gateway(&base).get("/ping").await.unwrap();
    assert_eq!(value, json!({ "pong": 1 }));
}

#[tokio::test]
async fn test_delete_primitive() {
    let app = Router::new()
        .route(
            "/api/projects/:id",
            delete(|Path(id): Path<String>| async move {
                Json(json!({ "success": true, "data": { "deleted": id } }))
            }),
        )
        .route(
            "/api/video/:id",
            delete(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Video is still rendering" })),
                )
            }),
        );
    let base = spawn(app).await;
    let gateway = gateway(&base);

    let value: Value = gateway.delete("/projects/p1").await.unwrap();
    assert_eq!(value, json!({ "deleted": "p1" }));

    let err = gateway.delete::<Value>("/video/v1").await.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.to_string(), "Video is still rendering");
}

#[tokio::test]
async fn test_path_ids_stay_in_one_segment() {
    let app = Router::new().route(
        "/api/projects/:id",
        get(|Path(id): Path<String>| async move {
            Json(json!({ "success": true, "data": { "id": id, "prompt": "Echo" } }))
        }),
    );
    let base = spawn(app).await;

    let project = gateway(&base).projects().by_id("a/b?c").await.unwrap();
    assert_eq!(project.id, "a/b?c");
}

#[tokio::test]
async fn test_error_uses_server_message() {
    let app = Router::new().route(
        "/api/projects",
        get(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Prompt too long" })),
            )
        }),
    );
    let base = spawn(app).await;

    let err = gateway(&base).projects().all().await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(err.to_string(), "Prompt too long");
}

#[tokio::test]
async fn test_error_without_message_names_status() {
    let app = Router::new().route(
        "/api/projects",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let base = spawn(app).await;

    let err = gateway(&base).projects().all().await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "HTTP error! status: 500");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let app = Router::new().route("/api/projects", get(|| async { "definitely not json" }));
    let base = spawn(app).await;

    let err = gateway(&base).projects().all().await.unwrap_err();
    assert!(matches!(err, RequestError::Decode { .. }));
}

#[tokio::test]
async fn test_fallback_substitutes_when_backend_unreachable() {
    let base = unreachable_url().await;

    let live = gateway(&base);
    let err = live.projects().all().await.unwrap_err();
    assert!(err.is_unreachable());

    let fallback = gateway(&base).with_mode(GatewayMode::Fallback);
    let projects = fallback.projects().all().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].title.as_deref(), Some("Futuristic Time Device"));
}

#[tokio::test]
async fn test_fallback_keeps_real_rejections() {
    let app = Router::new().route(
        "/api/projects",
        get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Missing bearer token" }))) }),
    );
    let base = spawn(app).await;

    let err = gateway(&base)
        .with_mode(GatewayMode::Fallback)
        .projects()
        .all()
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn test_fallback_covers_unimplemented_endpoints() {
    // Router without the endpoint answers 404
    let base = spawn(Router::new()).await;

    let story = gateway(&base)
        .with_mode(GatewayMode::Fallback)
        .story()
        .generate("p1", "A quiet harbor at dawn")
        .await
        .unwrap();
    assert_eq!(story.scenes.len(), 4);
}

#[tokio::test]
async fn test_sign_in_never_falls_back() {
    let base = unreachable_url().await;
    let gateway = gateway(&base).with_mode(GatewayMode::Fallback);

    let err = gateway.auth().sign_in("a@b.c", "secret1").await.unwrap_err();
    assert!(err.is_unreachable());
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn test_demo_story_scene_count_follows_prompt_length() {
    let gateway = gateway("http://127.0.0.1:9/api").with_mode(GatewayMode::Demo);

    let long = gateway.story().generate("p1", &"x".repeat(250)).await.unwrap();
    assert_eq!(long.scenes.len(), 5);

    let short = gateway.story().generate("p1", &"x".repeat(50)).await.unwrap();
    assert_eq!(short.scenes.len(), 4);
    assert!(short.scenes[0].text.starts_with("1. "));
}

#[tokio::test]
async fn test_demo_ids_are_unique() {
    let gateway = gateway("http://127.0.0.1:9/api").with_mode(GatewayMode::Demo);

    let first = gateway.projects().create("One", None, None).await.unwrap();
    let second = gateway.projects().create("Two", None, None).await.unwrap();
    assert_ne!(first.project_id, second.project_id);

    let export = gateway.video().export(&first.project_id).await.unwrap();
    assert_eq!(export.status, "processing");
}

#[tokio::test]
async fn test_demo_sign_in_starts_session() {
    let gateway = gateway("http://127.0.0.1:9/api").with_mode(GatewayMode::Demo);

    let payload = gateway.auth().sign_in("me@example.com", "pw").await.unwrap();
    assert_eq!(payload.user.email, "me@example.com");
    assert_eq!(gateway.session().token(), Some(payload.token));

    gateway.auth().sign_out();
    assert!(!gateway.session().is_authenticated());
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_call() {
    let app = Router::new().route(
        "/api/projects",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Json(json!([]))
        }),
    );
    let base = spawn(app).await;

    let cancel = CancellationToken::new();
    let gateway = gateway(&base).with_cancellation(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let err = tokio::time::timeout(Duration::from_secs(5), gateway.projects().all())
        .await
        .expect("cancellation should end the call promptly")
        .unwrap_err();
    assert!(err.is_cancelled());
}

#[tokio::test]
async fn test_token_persists_across_sessions() {
    let base = spawn_dev_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.toml");

    let session = Arc::new(Session::persistent(Arc::new(FileTokenStore::new(&path))));
    let gateway = Gateway::new(&base, session);
    let payload = gateway
        .auth()
        .sign_up("persist@example.com", "hunter22", Some("Persist"))
        .await
        .unwrap();
    assert_eq!(payload.user.name, "Persist");

    // A fresh session over the same file picks the token up
    let restored = Arc::new(Session::persistent(Arc::new(FileTokenStore::new(&path))));
    assert_eq!(restored.token(), Some(payload.token.clone()));
    let profile = Gateway::new(&base, restored.clone())
        .auth()
        .current_user()
        .await
        .unwrap();
    assert_eq!(profile.user.email, "persist@example.com");

    gateway.auth().sign_out();
    assert!(!gateway.session().is_authenticated());
    assert_eq!(FileTokenStore::new(&path).get().unwrap(), None);
}

#[tokio::test]
async fn test_full_flow_against_dev_backend() {
    let base = spawn_dev_backend().await;
    let gateway = gateway(&base);

    let err = gateway.projects().all().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    gateway
        .auth()
        .sign_up("flow@example.com", "hunter22", None)
        .await
        .unwrap();

    let prompt = "A retired astronaut teaches her grandson to read the stars";
    let created = gateway.projects().create(prompt, None, None).await.unwrap();

    let project = gateway.projects().by_id(&created.project_id).await.unwrap();
    assert_eq!(project.style, "Cinematic Sci-Fi");
    assert_eq!(project.duration, "60 seconds");

    let story = gateway
        .story()
        .generate(&created.project_id, prompt)
        .await
        .unwrap();
    assert_eq!(story.scenes.len(), 4);

    let mut board = vidmuse::Storyboard::from_story(&story);
    let target = story.scenes[2].id.clone();
    assert!(board.begin_regeneration(&target));
    let scene = gateway
        .story()
        .regenerate_scene(&target, Some("under a meteor shower"))
        .await
        .unwrap();
    assert!(board.apply_regenerated(&scene));
    assert_eq!(board.overall_progress(), 100);

    let export = gateway.video().export(&created.project_id).await.unwrap();
    let status = gateway.video().status(&export.video_id).await.unwrap();
    assert_eq!(status.status, "completed");
    assert_eq!(gateway.video().all().await.unwrap().len(), 1);

    let updated = gateway
        .user()
        .update_profile(Some("Star Reader"), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Star Reader");

    let profile = gateway.user().profile().await.unwrap();
    assert_eq!(profile.stats.videos, 1);
    assert_eq!(profile.stats.scenes, 4);
}
