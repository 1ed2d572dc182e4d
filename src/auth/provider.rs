//! Credential capability. The surrounding app owns token storage and
//! renewal; this crate only asks for an opaque bearer string right
//! before each request and treats a missing one as `Unauthenticated`.

use async_trait::async_trait;

use crate::error::MarkerError;

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current bearer token, or `Unauthenticated` when none can be
    /// supplied (expired session, logged out).
    async fn token(&self) -> Result<String, MarkerError>;
}

/// Fixed token obtained elsewhere.
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn token(&self) -> Result<String, MarkerError> {
        Ok(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call; absent
/// or blank means the operator has not logged in.
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredential {
    async fn token(&self) -> Result<String, MarkerError> {
        match std::env::var(&self.var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(MarkerError::Unauthenticated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token_returns_value() {
        let provider = StaticToken::new("opaque-blob");
        assert_eq!(provider.token().await.unwrap(), "opaque-blob");
    }

    #[tokio::test]
    async fn env_credential_missing_is_unauthenticated() {
        let provider = EnvCredential::new("ATTENDANCE_MARKER_NO_SUCH_VAR");
        assert!(matches!(
            provider.token().await,
            Err(MarkerError::Unauthenticated)
        ));
    }
}
