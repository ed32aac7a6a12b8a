/// Failure of a single gateway call.
///
/// The `Display` output is the human-readable message meant for the user;
/// the variants only exist so the demo fallback can tell an unreachable
/// backend apart from a real rejection.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Network request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("Malformed response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The caller cancelled the call before it completed.
    #[error("Request to {path} was cancelled")]
    Cancelled { path: String },
}

impl RequestError {
    /// Build a status error from the server's `error` field, or a generic
    /// message naming the status code when the body carries none.
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = server_message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP error! status: {}", status));
        Self::Status { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend could not be reached at all
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// The backend does not implement the endpoint
    pub fn is_unimplemented(&self) -> bool {
        matches!(self.status(), Some(404 | 405 | 501))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
