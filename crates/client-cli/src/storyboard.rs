//! Presentation state for a generated story.
//!
//! Status and progress here are local to the client; the backend never
//! sees them.

use shared::{GeneratedScene, GeneratedStory, Scene, SceneStatus};

/// Progress step used while a regeneration is in flight
pub const REGENERATION_STEP: u8 = 20;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Storyboard {
    scenes: Vec<Scene>,
}

impl Storyboard {
    /// Cards for every generated scene, all ready
    pub fn from_story(story: &GeneratedStory) -> Self {
        let scenes = story
            .scenes
            .iter()
            .enumerate()
            .map(|(index, scene)| Scene {
                id: if scene.id.is_empty() {
                    (index + 1).to_string()
                } else {
                    scene.id.clone()
                },
                title: format!("Scene {}", index + 1),
                body: scene.text.clone(),
                status: SceneStatus::Ready,
                progress: 100,
            })
            .collect();
        Self { scenes }
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.id == scene_id)
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Mark a scene as being regenerated. Returns false for unknown ids.
    pub fn begin_regeneration(&mut self, scene_id: &str) -> bool {
        match self.get_mut(scene_id) {
            Some(scene) => {
                scene.status = SceneStatus::Processing;
                scene.progress = 0;
                true
            }
            None => false,
        }
    }

    /// Move a processing scene forward by `step` percent. Reaching 100
    /// makes the scene ready. Returns the new progress.
    pub fn advance(&mut self, scene_id: &str, step: u8) -> Option<u8> {
        let scene = self.get_mut(scene_id)?;
        if scene.status != SceneStatus::Processing {
            return Some(scene.progress);
        }
        scene.progress = scene.progress.saturating_add(step).min(100);
        if scene.progress == 100 {
            scene.status = SceneStatus::Ready;
        }
        Some(scene.progress)
    }

    /// Swap in the backend's rewrite of a scene and mark it ready
    pub fn apply_regenerated(&mut self, regenerated: &GeneratedScene) -> bool {
        match self.get_mut(&regenerated.id) {
            Some(scene) => {
                scene.body = regenerated.text.clone();
                scene.status = SceneStatus::Ready;
                scene.progress = 100;
                true
            }
            None => false,
        }
    }

    /// Mean progress across all scenes, 0 when there are none
    pub fn overall_progress(&self) -> u8 {
        if self.scenes.is_empty() {
            return 0;
        }
        let total: u32 = self.scenes.iter().map(|s| u32::from(s.progress)).sum();
        (total / self.scenes.len() as u32) as u8
    }

    fn get_mut(&mut self, scene_id: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.id == scene_id)
    }
}
