use shared::{
    GenerateStoryRequest, GeneratedScene, GeneratedStory, RegenerateSceneRequest, RegeneratedScene,
};

use crate::error::RequestError;
use crate::gateway::{segment, Gateway};

pub struct Story<'a> {
    gateway: &'a Gateway,
}

impl Gateway {
    pub fn story(&self) -> Story<'_> {
        Story { gateway: self }
    }
}

impl Story<'_> {
    /// Split `prompt` into scenes for a project
    /// POST /story/generate
    pub async fn generate(
        &self,
        project_id: &str,
        prompt: &str,
    ) -> Result<GeneratedStory, RequestError> {
        let request = GenerateStoryRequest {
            project_id: project_id.to_string(),
            prompt: prompt.to_string(),
        };

        self.gateway
            .dispatch(
                "story.generate",
                || self.gateway.post("/story/generate", &request),
                |demo| demo.story(prompt),
            )
            .await
    }

    /// Rewrite one scene, optionally steered by a new prompt
    /// POST /story/regenerate/{sceneId}
    pub async fn regenerate_scene(
        &self,
        scene_id: &str,
        prompt: Option<&str>,
    ) -> Result<GeneratedScene, RequestError> {
        let path = format!("/story/regenerate/{}", segment(scene_id));
        let request = RegenerateSceneRequest {
            prompt: prompt.map(str::to_string),
        };

        self.gateway
            .dispatch(
                "story.regenerate_scene",
                || async {
                    let regenerated: RegeneratedScene = self.gateway.post(&path, &request).await?;
                    Ok::<_, RequestError>(regenerated.scene)
                },
                |demo| demo.regenerated_scene(scene_id, prompt),
            )
            .await
    }
}
