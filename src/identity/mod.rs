//! Synthetic external identities
//!
//! An [`ExternalIdentity`] is created by the test when it wants to emulate
//! "this external user logs in". It is never persisted; it only lives inside
//! one authorization code for the duration of a single round-trip.

use serde::{Deserialize, Serialize};

/// Which mock provider an identity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OAuth2,
    OpenId,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OAuth2 => "oauth2",
            Provider::OpenId => "openid",
        }
    }

    pub fn from_name(value: &str) -> Option<Self> {
        match value {
            "oauth2" => Some(Provider::OAuth2),
            "openid" => Some(Provider::OpenId),
            _ => None,
        }
    }
}

/// A synthetic external user, as the third-party provider would report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIdentity {
    pub provider: Provider,
    /// Subject identifier at the external provider
    pub id: String,
    /// Display name; surfaces in tokens as the `nickname` claim
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ExternalIdentity {
    pub fn new(provider: Provider, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider,
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_names_round_trip() {
        for provider in [Provider::OAuth2, Provider::OpenId] {
            assert_eq!(Provider::from_name(provider.as_str()), Some(provider));
        }
        assert_eq!(Provider::from_name("saml"), None);
    }

    #[test]
    fn test_identity_serializes_without_missing_email() {
        let identity = ExternalIdentity::new(Provider::OpenId, "u1", "Ann");
        let json = serde_json::to_string(&identity).unwrap();
        assert!(!json.contains("email"));
    }
}
