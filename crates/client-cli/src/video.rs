use shared::{ExportVideoRequest, VideoExport};

use crate::error::RequestError;
use crate::gateway::{segment, Gateway};

pub struct Video<'a> {
    gateway: &'a Gateway,
}

impl Gateway {
    pub fn video(&self) -> Video<'_> {
        Video { gateway: self }
    }
}

impl Video<'_> {
    /// Start rendering a project
    /// POST /video/export
    pub async fn export(&self, project_id: &str) -> Result<VideoExport, RequestError> {
        let request = ExportVideoRequest {
            project_id: project_id.to_string(),
        };

        self.gateway
            .dispatch(
                "video.export",
                || self.gateway.post("/video/export", &request),
                |demo| demo.video_export(),
            )
            .await
    }

    /// GET /video/status/{id}
    pub async fn status(&self, video_id: &str) -> Result<VideoExport, RequestError> {
        let path = format!("/video/status/{}", segment(video_id));
        self.gateway
            .dispatch(
                "video.status",
                || self.gateway.get(&path),
                |demo| demo.video_status(video_id),
            )
            .await
    }

    /// GET /video
    pub async fn all(&self) -> Result<Vec<VideoExport>, RequestError> {
        self.gateway
            .dispatch("video.all", || self.gateway.get("/video"), |demo| demo.videos())
            .await
    }
}
