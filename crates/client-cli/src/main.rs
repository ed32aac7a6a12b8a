use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vidmuse::config::Config;
use vidmuse::storyboard::REGENERATION_STEP;
use vidmuse::{FileTokenStore, Gateway, GatewayMode, Session, Storyboard};

const REGENERATION_TICK: Duration = Duration::from_millis(300);

#[derive(Parser)]
#[command(name = "vidmuse")]
#[command(about = "Turn a story prompt into scenes and a video via the VidMuse backend")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides config)
    #[arg(long, global = true)]
    server: Option<String>,

    /// Gateway mode (overrides config)
    #[arg(long, value_enum, global = true)]
    mode: Option<GatewayMode>,

    /// Auth token for this invocation only (not persisted)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Sign in to the VidMuse backend
    Signin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the stored token
    Signout,
    /// Show the signed-in account
    Whoami,
    /// Create a project from a prompt and generate its scenes
    Create {
        /// Story prompt
        prompt: String,
        #[arg(long)]
        style: Option<String>,
        #[arg(long)]
        duration: Option<String>,
    },
    /// Generate scenes for an existing project
    Generate {
        #[arg(long)]
        project: String,
        /// Story prompt
        prompt: String,
    },
    /// Regenerate a single scene
    Regenerate {
        scene_id: String,
        /// New direction for the scene
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Export a project as a video
    Export { project_id: String },
    /// Show the status of a video export
    Status { video_id: String },
    /// List video exports
    Videos,
    /// List projects
    Projects,
    /// Show a single project
    Project { project_id: String },
    /// Show profile and usage stats
    Profile,
    /// Update profile fields
    UpdateProfile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        avatar: Option<String>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (server, mode, timeout)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Get the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidmuse=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Commands::Config { action } = cli.command {
        return handle_config_command(action);
    }

    let config = Config::load().unwrap_or_default();
    let gateway = build_gateway(&cli, &config)?;

    // Ctrl-C aborts whatever call is in flight
    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    let gateway = gateway.with_cancellation(cancel);

    tracing::debug!("Using {} backend at {}", gateway.mode(), gateway.base_url());

    match cli.command {
        Commands::Signup {
            email,
            password,
            name,
        } => {
            let payload = gateway
                .auth()
                .sign_up(&email, &password, name.as_deref())
                .await?;
            println!("\x1b[32m✓ Account created for {}\x1b[0m", payload.user.email);
        }
        Commands::Signin { email, password } => {
            let payload = gateway.auth().sign_in(&email, &password).await?;
            println!("\x1b[32m✓ Signed in as {}\x1b[0m", payload.user.email);
        }
        Commands::Signout => {
            gateway.auth().sign_out();
            println!("\x1b[32m✓ Signed out\x1b[0m");
        }
        Commands::Whoami => {
            if !gateway.session().is_authenticated() && gateway.mode() != GatewayMode::Demo {
                println!("\x1b[33m✗ Not signed in\x1b[0m");
                println!("Run '\x1b[1mvidmuse signin\x1b[0m' to authenticate");
                return Ok(());
            }
            let profile = gateway.auth().current_user().await?;
            println!("\x1b[32m✓ Signed in\x1b[0m");
            println!("{} <{}> ({})", profile.user.name, profile.user.email, profile.user.subscription);
            println!("Server: {}", gateway.base_url());
        }
        Commands::Create {
            prompt,
            style,
            duration,
        } => {
            // Explicit chaining: the scenes need the project id
            let project = gateway
                .projects()
                .create(&prompt, style.as_deref(), duration.as_deref())
                .await?;
            println!("Project: {}", project.project_id);

            let story = gateway.story().generate(&project.project_id, &prompt).await?;
            print_storyboard(&Storyboard::from_story(&story));
        }
        Commands::Generate { project, prompt } => {
            let story = gateway.story().generate(&project, &prompt).await?;
            print_storyboard(&Storyboard::from_story(&story));
        }
        Commands::Regenerate { scene_id, prompt } => {
            regenerate_with_progress(&gateway, &scene_id, prompt.as_deref()).await?;
        }
        Commands::Export { project_id } => {
            let export = gateway.video().export(&project_id).await?;
            println!("Video {}: {}", export.video_id, export.status);
            if !export.message.is_empty() {
                println!("\x1b[90m{}\x1b[0m", export.message);
            }
        }
        Commands::Status { video_id } => {
            let status = gateway.video().status(&video_id).await?;
            println!("Video {}: {}", status.video_id, status.status);
            if !status.message.is_empty() {
                println!("\x1b[90m{}\x1b[0m", status.message);
            }
        }
        Commands::Videos => {
            let videos = gateway.video().all().await?;
            if videos.is_empty() {
                println!("No videos yet");
            }
            for video in videos {
                println!("{}  {}", video.video_id, video.status);
            }
        }
        Commands::Projects => {
            let projects = gateway.projects().all().await?;
            if projects.is_empty() {
                println!("No projects yet. Create one with 'vidmuse create <prompt>'");
            }
            for project in projects {
                let title = project.title.as_deref().unwrap_or(&project.prompt);
                let scenes = project
                    .scene_count
                    .map(|n| format!("{} scenes", n))
                    .unwrap_or_default();
                println!("{}  {}  {}  {}", project.id, title, scenes, project.duration);
            }
        }
        Commands::Project { project_id } => {
            let project = gateway.projects().by_id(&project_id).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        Commands::Profile => {
            let profile = gateway.user().profile().await?;
            println!("{} <{}>", profile.user.name, profile.user.email);
            println!(
                "Videos: {}  Scenes: {}  Views: {}",
                profile.stats.videos, profile.stats.scenes, profile.stats.views
            );
        }
        Commands::UpdateProfile { name, avatar } => {
            if name.is_none() && avatar.is_none() {
                anyhow::bail!("Nothing to update: pass --name and/or --avatar");
            }
            let user = gateway
                .user()
                .update_profile(name.as_deref(), avatar.as_deref())
                .await?;
            println!("\x1b[32m✓ Profile updated: {}\x1b[0m", user.name);
        }
        Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}

fn build_gateway(cli: &Cli, config: &Config) -> Result<Gateway> {
    let server = cli
        .server
        .clone()
        .unwrap_or_else(|| config.gateway.server_url().to_string());
    let mode = cli.mode.unwrap_or(config.gateway.mode);
    let timeout = Duration::from_secs(cli.timeout.unwrap_or(config.gateway.timeout_secs));

    let session = match &cli.token {
        Some(token) => Session::in_memory().with_token(token.clone()),
        None => match FileTokenStore::open_default() {
            Ok(store) => Session::persistent(Arc::new(store)),
            Err(e) => {
                tracing::warn!("No durable token storage ({}), session is in-memory only", e);
                Session::in_memory()
            }
        },
    };

    Ok(Gateway::with_timeout(server, Arc::new(session), timeout)?.with_mode(mode))
}

/// Animate the scene card while the rewrite is in flight
async fn regenerate_with_progress(
    gateway: &Gateway,
    scene_id: &str,
    prompt: Option<&str>,
) -> Result<()> {
    let mut board = Storyboard::from_story(&shared::GeneratedStory {
        scenes: vec![shared::GeneratedScene {
            id: scene_id.to_string(),
            text: String::new(),
            title: None,
            scene_number: None,
        }],
    });
    board.begin_regeneration(scene_id);

    let story = gateway.story();
    let request = story.regenerate_scene(scene_id, prompt);
    tokio::pin!(request);
    let mut ticker = tokio::time::interval(REGENERATION_TICK);

    let scene = loop {
        tokio::select! {
            result = &mut request => break result?,
            _ = ticker.tick() => {
                // Hold at 80% until the backend answers
                let progress = board.get(scene_id).map(|s| s.progress).unwrap_or(0);
                if progress < 100 - REGENERATION_STEP {
                    board.advance(scene_id, REGENERATION_STEP);
                }
                eprint!("\rRegenerating scene {}... {}%", scene_id, board.overall_progress());
            }
        }
    };

    board.apply_regenerated(&scene);
    eprintln!("\rRegenerating scene {}... {}%", scene_id, board.overall_progress());
    print_storyboard(&board);
    Ok(())
}

fn print_storyboard(board: &Storyboard) {
    if board.is_empty() {
        println!("\x1b[33mNo scenes were generated\x1b[0m");
        return;
    }
    for scene in board.scenes() {
        println!("\x1b[1;36m{}\x1b[0m  \x1b[90m[{}]\x1b[0m", scene.title, scene.id);
        println!("  {}", scene.body);
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = Config::load().unwrap_or_default();
            config.set(&key, &value)?;
            config.save()?;
            println!("Configuration saved");
        }
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("server: {}", config.gateway.server_url());
            println!("mode: {}", config.gateway.mode);
            println!("timeout: {}s", config.gateway.timeout_secs);
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
