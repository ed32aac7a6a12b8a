//! Deterministic placeholder storyboards.
//!
//! Used wherever a scene list has to be produced without a real
//! generation model: the client's demo mode and the development backend.

use crate::models::GeneratedScene;

/// Prompts longer than this many characters get an extra scene
pub const LONG_PROMPT_CHARS: usize = 200;

const EXCERPT_CHARS: usize = 60;

const SHORT_ARC: [&str; 4] = [
    "Story introduction",
    "Plot development",
    "Climax",
    "Resolution",
];

const LONG_ARC: [&str; 5] = [
    "Story introduction",
    "Inciting incident",
    "Plot development",
    "Climax",
    "Resolution",
];

/// Number of scenes a prompt is split into: 4, or 5 for long prompts
pub fn scene_count(prompt: &str) -> usize {
    if prompt.chars().count() <= LONG_PROMPT_CHARS {
        SHORT_ARC.len()
    } else {
        LONG_ARC.len()
    }
}

/// Draft a placeholder storyboard for `prompt`.
///
/// Scene ids are the 1-based scene numbers and every scene text starts
/// with that number, e.g. `"1. Story introduction: ..."`.
pub fn draft_scenes(prompt: &str) -> Vec<GeneratedScene> {
    let arc: &[&str] = if scene_count(prompt) == LONG_ARC.len() {
        &LONG_ARC
    } else {
        &SHORT_ARC
    };
    let excerpt = excerpt(prompt);

    arc.iter()
        .enumerate()
        .map(|(index, beat)| {
            let number = index as u32 + 1;
            GeneratedScene {
                id: number.to_string(),
                text: format!("{}. {}: {}", number, beat, excerpt),
                title: Some(format!("Scene {}", number)),
                scene_number: Some(number),
            }
        })
        .collect()
}

/// Rewrite a single scene, optionally steered by a new direction
pub fn redraft_scene(scene_id: &str, direction: Option<&str>) -> GeneratedScene {
    let direction = direction
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or("a fresh take on the same moment");

    GeneratedScene {
        id: scene_id.to_string(),
        text: format!("Reimagined: {}", excerpt(direction)),
        title: None,
        scene_number: scene_id.parse().ok(),
    }
}

fn excerpt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return "Untitled story".to_string();
    }
    if trimmed.chars().count() <= EXCERPT_CHARS {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(EXCERPT_CHARS).collect();
    format!("{}...", cut.trim_end())
}
