//! Session-scoped identity provider backed by the sign-in form.

use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use client_core::{Credential, IdentityProvider};
use shared::domain::IdentitySnapshot;

struct SessionProfile {
    identity: IdentitySnapshot,
    token: String,
}

/// Holds the signed-in profile, if any. Injected into the controller at
/// construction; sign-in/sign-out mutate it without rebuilding the
/// controller.
#[derive(Default)]
pub struct SessionIdentity {
    inner: RwLock<Option<SessionProfile>>,
}

impl SessionIdentity {
    pub fn sign_in(&self, identity: IdentitySnapshot, token: String) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = Some(SessionProfile { identity, token });
        }
    }

    pub fn sign_out(&self) {
        if let Ok(mut guard) = self.inner.write() {
            *guard = None;
        }
    }
}

#[async_trait]
impl IdentityProvider for SessionIdentity {
    async fn credential(&self) -> Result<Credential> {
        let guard = self
            .inner
            .read()
            .map_err(|_| anyhow!("session state lock poisoned"))?;
        guard
            .as_ref()
            .map(|profile| Credential::new(profile.token.clone()))
            .ok_or_else(|| anyhow!("no signed-in session"))
    }

    fn current_identity(&self) -> IdentitySnapshot {
        self.inner
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|profile| profile.identity.clone()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn credential_fails_until_signed_in() {
        let session = SessionIdentity::default();
        assert!(session.credential().await.is_err());

        session.sign_in(
            IdentitySnapshot::signed_in("Amara", "amara@example.com"),
            "session-token".to_string(),
        );
        let credential = session.credential().await.expect("credential");
        assert_eq!(credential.secret(), "session-token");

        session.sign_out();
        assert!(session.credential().await.is_err());
        assert_eq!(session.current_identity(), IdentitySnapshot::default());
    }
}
