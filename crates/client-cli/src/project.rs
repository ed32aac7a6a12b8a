use shared::{CreateProjectRequest, CreatedProject, Project};

use crate::error::RequestError;
use crate::gateway::{segment, Gateway};

pub struct Projects<'a> {
    gateway: &'a Gateway,
}

impl Gateway {
    pub fn projects(&self) -> Projects<'_> {
        Projects { gateway: self }
    }
}

impl Projects<'_> {
    /// Create a project for `prompt`. Style and duration default to
    /// "Cinematic Sci-Fi" and "60 seconds".
    /// POST /projects/create
    pub async fn create(
        &self,
        prompt: &str,
        style: Option<&str>,
        duration: Option<&str>,
    ) -> Result<CreatedProject, RequestError> {
        let request = CreateProjectRequest::new(
            prompt,
            style.map(str::to_string),
            duration.map(str::to_string),
        );

        self.gateway
            .dispatch(
                "projects.create",
                || self.gateway.post("/projects/create", &request),
                |demo| demo.created_project(),
            )
            .await
    }

    /// GET /projects
    pub async fn all(&self) -> Result<Vec<Project>, RequestError> {
        self.gateway
            .dispatch(
                "projects.all",
                || self.gateway.get("/projects"),
                |demo| demo.library(),
            )
            .await
    }

    /// GET /projects/{id}
    pub async fn by_id(&self, project_id: &str) -> Result<Project, RequestError> {
        let path = format!("/projects/{}", segment(project_id));
        self.gateway
            .dispatch(
                "projects.by_id",
                || self.gateway.get(&path),
                |demo| demo.project(project_id),
            )
            .await
    }
}
