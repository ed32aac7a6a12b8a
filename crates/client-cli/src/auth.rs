//! Account operations: sign-up, sign-in, sign-out and the current user.

use shared::{AuthPayload, SignInRequest, SignUpRequest, UserProfile};

use crate::error::RequestError;
use crate::gateway::Gateway;

pub struct Auth<'a> {
    gateway: &'a Gateway,
}

impl Gateway {
    pub fn auth(&self) -> Auth<'_> {
        Auth { gateway: self }
    }
}

impl Auth<'_> {
    /// Create an account and start a session with the returned token
    /// POST /auth/signup
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<AuthPayload, RequestError> {
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            name: name.map(str::to_string),
        };

        let payload: AuthPayload = self
            .gateway
            .dispatch_strict(
                || self.gateway.post("/auth/signup", &request),
                |demo| demo.auth(email, name),
            )
            .await?;

        self.store_token(&payload);
        Ok(payload)
    }

    /// Sign in and start a session with the returned token
    /// POST /auth/signin
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthPayload, RequestError> {
        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let payload: AuthPayload = self
            .gateway
            .dispatch_strict(
                || self.gateway.post("/auth/signin", &request),
                |demo| demo.auth(email, None),
            )
            .await?;

        self.store_token(&payload);
        Ok(payload)
    }

    /// Forget the session token. No request is made.
    pub fn sign_out(&self) {
        self.gateway.session().clear();
        tracing::info!("Signed out");
    }

    /// GET /auth/me
    pub async fn current_user(&self) -> Result<UserProfile, RequestError> {
        self.gateway
            .dispatch_strict(|| self.gateway.get("/auth/me"), |demo| demo.profile())
            .await
    }

    fn store_token(&self, payload: &AuthPayload) {
        if payload.token.is_empty() {
            tracing::warn!("Backend returned an empty token, session unchanged");
            return;
        }
        self.gateway.session().set_token(Some(&payload.token));
        tracing::info!("Signed in as {}", payload.user.email);
    }
}
