use thiserror::Error;

/// Shown for every failure that has no structured message from the
/// generation service. Wording matches the product copy.
pub const CONNECTIVITY_MESSAGE: &str = "Something went wrong. Ensure your backend is running.";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to acquire session credential: {0}")]
    Credential(anyhow::Error),
    #[error("generation request failed: {0}")]
    Network(reqwest::Error),
    #[error("generation request timed out")]
    Timeout,
    #[error("generation service returned status {status}")]
    Service { status: u16, detail: Option<String> },
    #[error("generation service returned an unusable response: {0}")]
    MalformedResponse(String),
}

/// Payload-free view of [`GenerationError`] carried in the `Failed` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Credential,
    Network,
    Timeout,
    Service,
    MalformedResponse,
}

impl GenerationError {
    pub fn kind(&self) -> FailureKind {
        match self {
            GenerationError::Credential(_) => FailureKind::Credential,
            GenerationError::Network(_) => FailureKind::Network,
            GenerationError::Timeout => FailureKind::Timeout,
            GenerationError::Service { .. } => FailureKind::Service,
            GenerationError::MalformedResponse(_) => FailureKind::MalformedResponse,
        }
    }

    /// Message surfaced to the user: the service `detail` verbatim when the
    /// service supplied one, the generic connectivity line otherwise.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => CONNECTIVITY_MESSAGE.to_string(),
        }
    }
}
