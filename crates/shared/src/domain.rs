use serde::{Deserialize, Serialize};

/// Identity fields of the current session as reported by the identity
/// provider. Both fields may be absent (guest session).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySnapshot {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl IdentitySnapshot {
    pub fn signed_in(full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            full_name: Some(full_name.into()),
            email: Some(email.into()),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.full_name.is_some() || self.email.is_some()
    }

    /// First whitespace-separated component of the full name, for greetings.
    pub fn first_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_name_takes_leading_component() {
        let identity = IdentitySnapshot::signed_in("Amara Okafor", "amara@example.com");
        assert_eq!(identity.first_name(), Some("Amara"));
    }

    #[test]
    fn first_name_absent_for_guest() {
        assert_eq!(IdentitySnapshot::default().first_name(), None);
    }

    #[test]
    fn first_name_absent_for_whitespace_only_name() {
        let identity = IdentitySnapshot {
            full_name: Some("   ".to_string()),
            email: None,
        };
        assert_eq!(identity.first_name(), None);
    }
}
