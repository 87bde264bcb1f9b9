use std::{fmt, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::IdentitySnapshot,
    error::ErrorBody,
    protocol::{GenerateCvRequest, GenerateCvResponse},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use url::Url;
use zeroize::Zeroize;

pub mod error;

pub use error::{FailureKind, GenerationError, CONNECTIVITY_MESSAGE};

pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(15);
pub const COPY_ACK_RESET_DELAY: Duration = Duration::from_secs(2);
/// Substituted into the request when the identity provider has no name/email
/// for the session.
pub const FALLBACK_FULL_NAME: &str = "Hustle User";
pub const FALLBACK_EMAIL: &str = "guest@hustle.com";

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Short-lived bearer token for the current session. Redacted in debug
/// output and wiped on drop.
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

impl Drop for Credential {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fresh bearer credential for the current session.
    async fn credential(&self) -> Result<Credential>;

    /// Identity fields as currently known; either field may be absent.
    fn current_identity(&self) -> IdentitySnapshot;
}

/// Fixed profile and token, for the headless CLI and tests.
pub struct StaticIdentity {
    token: String,
    identity: IdentitySnapshot,
}

impl StaticIdentity {
    pub fn new(token: impl Into<String>, identity: IdentitySnapshot) -> Self {
        Self {
            token: token.into(),
            identity,
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn credential(&self) -> Result<Credential> {
        Ok(Credential::new(self.token.clone()))
    }

    fn current_identity(&self) -> IdentitySnapshot {
        self.identity.clone()
    }
}

pub struct SignedOutIdentity;

#[async_trait]
impl IdentityProvider for SignedOutIdentity {
    async fn credential(&self) -> Result<Credential> {
        Err(anyhow!("no signed-in session"))
    }

    fn current_identity(&self) -> IdentitySnapshot {
        IdentitySnapshot::default()
    }
}

pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
}

/// Discards writes. Copy stays best-effort where no clipboard exists
/// (headless runs, tests).
pub struct NullClipboard;

impl ClipboardSink for NullClipboard {
    fn set_text(&self, _text: &str) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCv {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Lifecycle of one generation attempt. Exactly one variant holds at any
/// time; a new attempt may start from any variant except `InFlight`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    InFlight,
    Succeeded(GeneratedCv),
    Failed(GenerationFailure),
}

impl RequestState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, RequestState::InFlight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardAck {
    Idle,
    Copied,
}

#[derive(Debug, Clone)]
pub enum ControllerEvent {
    RequestStateChanged(RequestState),
    ClipboardAckChanged(ClipboardAck),
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub service_url: String,
    pub request_timeout: Duration,
    pub copy_ack_reset: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            service_url: DEFAULT_SERVICE_URL.to_string(),
            request_timeout: GENERATE_TIMEOUT,
            copy_ack_reset: COPY_ACK_RESET_DELAY,
        }
    }
}

impl GenerationConfig {
    pub fn for_service(service_url: impl Into<String>) -> Result<Self> {
        let service_url = service_url.into();
        Url::parse(&service_url)
            .with_context(|| format!("invalid generation service url '{service_url}'"))?;
        Ok(Self {
            service_url,
            ..Self::default()
        })
    }

    fn generate_endpoint(&self) -> String {
        format!("{}/generate", self.service_url.trim_end_matches('/'))
    }
}

/// Owns the generation-request lifecycle: input capture, submission guards,
/// credential acquisition, the `/generate` call, and the transient
/// copied-to-clipboard acknowledgement.
pub struct GenerationController {
    http: Client,
    config: GenerationConfig,
    identity: Arc<dyn IdentityProvider>,
    clipboard: Arc<dyn ClipboardSink>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<ControllerEvent>,
}

struct ControllerState {
    raw_experience: String,
    request_state: RequestState,
    clipboard_ack: ClipboardAck,
    ack_timer: Option<JoinHandle<()>>,
    copy_epoch: u64,
    attempt: u64,
}

impl GenerationController {
    pub fn new(
        config: GenerationConfig,
        identity: Arc<dyn IdentityProvider>,
        clipboard: Arc<dyn ClipboardSink>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            http: Client::new(),
            config,
            identity,
            clipboard,
            inner: Mutex::new(ControllerState {
                raw_experience: String::new(),
                request_state: RequestState::Idle,
                clipboard_ack: ClipboardAck::Idle,
                ack_timer: None,
                copy_epoch: 0,
                attempt: 0,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Replaces the raw-experience buffer verbatim. Never touches the
    /// request state; an in-flight attempt keeps the snapshot it captured
    /// at dispatch.
    pub async fn update_input(&self, text: impl Into<String>) {
        let mut inner = self.inner.lock().await;
        inner.raw_experience = text.into();
    }

    pub async fn input(&self) -> String {
        self.inner.lock().await.raw_experience.clone()
    }

    pub async fn request_state(&self) -> RequestState {
        self.inner.lock().await.request_state.clone()
    }

    pub async fn clipboard_ack(&self) -> ClipboardAck {
        self.inner.lock().await.clipboard_ack
    }

    /// Runs one generation attempt to completion. Suppressed without any
    /// state change or network activity when the buffer is blank or an
    /// attempt is already in flight.
    pub async fn submit(&self) {
        let (attempt, request) = {
            let mut inner = self.inner.lock().await;
            if inner.request_state.is_in_flight() {
                debug!("generation already in flight; submit ignored");
                return;
            }
            if inner.raw_experience.trim().is_empty() {
                debug!("experience buffer is blank; submit ignored");
                return;
            }
            inner.attempt += 1;
            inner.request_state = RequestState::InFlight;
            let request = build_request(&inner.raw_experience, self.identity.current_identity());
            (inner.attempt, request)
        };
        let _ = self
            .events
            .send(ControllerEvent::RequestStateChanged(RequestState::InFlight));
        info!(attempt, "dispatching CV generation request");

        let next = match self.send_generate(&request).await {
            Ok(cv) => {
                info!(attempt, chars = cv.len(), "generation succeeded");
                RequestState::Succeeded(GeneratedCv { text: cv })
            }
            Err(err) => {
                warn!(attempt, "generation failed: {err}");
                RequestState::Failed(GenerationFailure {
                    kind: err.kind(),
                    message: err.user_message(),
                })
            }
        };

        {
            let mut inner = self.inner.lock().await;
            inner.request_state = next.clone();
        }
        let _ = self.events.send(ControllerEvent::RequestStateChanged(next));
    }

    async fn send_generate(&self, request: &GenerateCvRequest) -> Result<String, GenerationError> {
        let credential = self
            .identity
            .credential()
            .await
            .map_err(GenerationError::Credential)?;

        let response = self
            .http
            .post(self.config.generate_endpoint())
            .timeout(self.config.request_timeout)
            .bearer_auth(credential.secret())
            .json(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = match response.text().await {
                Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .map(|body| body.detail),
                Err(_) => None,
            };
            return Err(GenerationError::Service {
                status: status.as_u16(),
                detail,
            });
        }

        let body = response.text().await.map_err(map_transport_error)?;
        let parsed: GenerateCvResponse = serde_json::from_str(&body)
            .map_err(|err| GenerationError::MalformedResponse(err.to_string()))?;
        Ok(parsed.cv)
    }

    /// Copies the generated CV to the clipboard and raises the transient
    /// acknowledgement. No-op unless an attempt has succeeded. Repeat calls
    /// restart the revert timer; at most one revert is ever pending.
    pub async fn copy_result(self: &Arc<Self>) {
        let text = {
            let inner = self.inner.lock().await;
            match &inner.request_state {
                RequestState::Succeeded(cv) => cv.text.clone(),
                _ => {
                    debug!("no generated CV to copy; copy ignored");
                    return;
                }
            }
        };

        if let Err(err) = self.clipboard.set_text(&text) {
            warn!("clipboard write failed: {err}");
        }

        {
            let mut inner = self.inner.lock().await;
            inner.copy_epoch += 1;
            inner.clipboard_ack = ClipboardAck::Copied;
            if let Some(timer) = inner.ack_timer.take() {
                timer.abort();
            }
            let epoch = inner.copy_epoch;
            let delay = self.config.copy_ack_reset;
            let controller = Arc::clone(self);
            inner.ack_timer = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                controller.expire_copy_ack(epoch).await;
            }));
        }
        let _ = self
            .events
            .send(ControllerEvent::ClipboardAckChanged(ClipboardAck::Copied));
    }

    async fn expire_copy_ack(&self, epoch: u64) {
        {
            let mut inner = self.inner.lock().await;
            // A newer copy restarted the timer; this revert is stale.
            if inner.copy_epoch != epoch {
                return;
            }
            inner.clipboard_ack = ClipboardAck::Idle;
            inner.ack_timer = None;
        }
        let _ = self
            .events
            .send(ControllerEvent::ClipboardAckChanged(ClipboardAck::Idle));
    }
}

fn build_request(raw_experience: &str, identity: IdentitySnapshot) -> GenerateCvRequest {
    GenerateCvRequest {
        full_name: identity
            .full_name
            .unwrap_or_else(|| FALLBACK_FULL_NAME.to_string()),
        email: identity
            .email
            .unwrap_or_else(|| FALLBACK_EMAIL.to_string()),
        raw_experience: raw_experience.to_string(),
    }
}

fn map_transport_error(err: reqwest::Error) -> GenerationError {
    if err.is_timeout() {
        GenerationError::Timeout
    } else {
        GenerationError::Network(err)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
