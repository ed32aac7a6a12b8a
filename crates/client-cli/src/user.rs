use shared::{UpdateProfileRequest, User, UserProfile};

use crate::error::RequestError;
use crate::gateway::Gateway;

pub struct Users<'a> {
    gateway: &'a Gateway,
}

impl Gateway {
    pub fn user(&self) -> Users<'_> {
        Users { gateway: self }
    }
}

impl Users<'_> {
    /// GET /user/profile
    pub async fn profile(&self) -> Result<UserProfile, RequestError> {
        self.gateway
            .dispatch(
                "user.profile",
                || self.gateway.get("/user/profile"),
                |demo| demo.profile(),
            )
            .await
    }

    /// PUT /user/profile
    pub async fn update_profile(
        &self,
        name: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<User, RequestError> {
        let request = UpdateProfileRequest {
            name: name.map(str::to_string),
            avatar: avatar.map(str::to_string),
        };

        self.gateway
            .dispatch(
                "user.update_profile",
                || self.gateway.put("/user/profile", &request),
                |demo| demo.updated_user(&request),
            )
            .await
    }
}
