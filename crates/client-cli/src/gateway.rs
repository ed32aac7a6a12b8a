//! HTTP gateway to the VidMuse backend.
//!
//! [`Gateway`] owns the four request primitives (`get`, `post`, `put`,
//! `delete`); they are the only place network semantics are decided. The
//! domain groups (`auth()`, `projects()`, `story()`, `video()`, `user()`)
//! each wrap one primitive with a fixed path and payload.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::demo::DemoData;
use crate::error::RequestError;
use crate::session::Session;

/// How the gateway treats the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum GatewayMode {
    /// Every failure surfaces to the caller
    #[default]
    Live,
    /// No network at all; every operation returns placeholder data
    Demo,
    /// Live, but an unreachable backend or unimplemented endpoint is
    /// answered with placeholder data
    Fallback,
}

impl std::fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Live => "live",
            Self::Demo => "demo",
            Self::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for GatewayMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "demo" => Ok(Self::Demo),
            "fallback" => Ok(Self::Fallback),
            other => anyhow::bail!("Unknown mode: {}. Valid modes: live, demo, fallback", other),
        }
    }
}

#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    mode: GatewayMode,
    session: Arc<Session>,
    demo: Arc<DemoData>,
    cancel: CancellationToken,
}

impl Gateway {
    /// Create a live gateway for `base_url`, e.g. `http://localhost:5000/api`.
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a gateway reusing an existing [`reqwest::Client`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<Session>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            mode: GatewayMode::Live,
            session,
            demo: Arc::new(DemoData::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Create a gateway whose requests time out after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        session: Arc<Session>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, session))
    }

    pub fn with_mode(mut self, mode: GatewayMode) -> Self {
        self.mode = mode;
        self
    }

    /// A handle whose calls abort as soon as `cancel` fires.
    ///
    /// Shares the session, HTTP pool and demo counters with `self`.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn mode(&self) -> GatewayMode {
        self.mode
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Headers sent with every request: JSON content type, plus the bearer
    /// token when the session has one.
    pub fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.session.token() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => tracing::warn!("Session token is not a valid header value: {}", e),
            }
        }

        headers
    }

    // ---- primitives ----

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        self.request(Method::DELETE, path, None::<&()>).await
    }

    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, RequestError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .headers(self.auth_headers());
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!("API {} {}", method, url);

        // Dropping the in-flight future on cancellation aborts the request.
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(RequestError::Cancelled {
                path: path.to_string(),
            }),
            result = exchange(builder, path) => result,
        };

        let payload = match result {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!("API {} error [{}]: {}", method, path, e);
                return Err(e);
            }
        };

        serde_json::from_value(payload).map_err(|source| RequestError::Decode {
            path: path.to_string(),
            source,
        })
    }

    // ---- mode policy ----

    /// Run `call` according to the gateway mode, substituting `placeholder`
    /// in demo mode, and in fallback mode when the backend is unreachable or
    /// the endpoint unimplemented.
    pub(crate) async fn dispatch<T, F, Fut>(
        &self,
        operation: &str,
        call: F,
        placeholder: impl FnOnce(&DemoData) -> T,
    ) -> Result<T, RequestError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        match self.mode {
            GatewayMode::Demo => Ok(placeholder(&self.demo)),
            GatewayMode::Live => call().await,
            GatewayMode::Fallback => match call().await {
                Err(e) if e.is_unreachable() || e.is_unimplemented() => {
                    tracing::warn!("{} unavailable ({}), using demo data", operation, e);
                    Ok(placeholder(&self.demo))
                }
                other => other,
            },
        }
    }

    /// Like [`dispatch`](Self::dispatch) but never falls back: only demo mode
    /// fabricates a result.
    pub(crate) async fn dispatch_strict<T, F, Fut>(
        &self,
        call: F,
        placeholder: impl FnOnce(&DemoData) -> T,
    ) -> Result<T, RequestError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, RequestError>>,
    {
        match self.mode {
            GatewayMode::Demo => Ok(placeholder(&self.demo)),
            GatewayMode::Live | GatewayMode::Fallback => call().await,
        }
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.base_url)
            .field("mode", &self.mode)
            .field("session", &self.session)
            .finish()
    }
}

/// Bytes escaped when an id is interpolated into a path
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'~');

/// Percent-encode `id` so it always lands in exactly one path segment
pub(crate) fn segment(id: &str) -> String {
    utf8_percent_encode(id, SEGMENT).to_string()
}

/// Send the request and normalize the response to its payload.
async fn exchange(builder: RequestBuilder, path: &str) -> Result<serde_json::Value, RequestError> {
    let transport = |source| RequestError::Transport {
        path: path.to_string(),
        source,
    };

    let response = builder.send().await.map_err(transport)?;
    let status = response.status();
    let bytes = response.bytes().await.map_err(transport)?;

    if !status.is_success() {
        let server_message = serde_json::from_slice::<shared::ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.error);
        return Err(RequestError::from_status(status.as_u16(), server_message));
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }

    let body: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|source| RequestError::Decode {
            path: path.to_string(),
            source,
        })?;

    Ok(shared::unwrap_data(body))
}
