//! Main token service implementation

use std::time::Duration;

use crate::domain::entities::{Token, TokenOptions, User};
use crate::errors::{TokenError, TokenResult};
use crate::repositories::CredentialRepository;

use super::codec::TokenCodec;
use super::config::TokenServiceConfig;

pub use hc_shared::config::MAX_TOKEN_LEN;

/// Shortest lifetime the cache accepts
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// Longest lifetime handed to the cache; longer requests are clamped
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 3600);

/// Service for issuing, verifying and revoking bearer tokens
pub struct TokenService<R: CredentialRepository> {
    pub(crate) repository: R,
    config: TokenServiceConfig,
}

impl<R: CredentialRepository> TokenService<R> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Credential repository for persistence
    /// * `config` - Token service configuration
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues a new token for `user`
    ///
    /// This is the only operation that discloses a raw token.
    ///
    /// # Panics
    ///
    /// Panics if `user` has the nil id. Callers must only pass persisted users.
    pub async fn issue(&self, user: &User, options: TokenOptions) -> TokenResult<Token> {
        assert!(!user.is_zero(), "cannot issue a token for a user with a nil id");

        let ttl = options.ttl_or(self.config.default_ttl).clamp(MIN_TTL, MAX_TTL);
        let token = TokenCodec::generate(&user.id, self.config.entropy_bytes)?;

        self.repository
            .put(&token, user, ttl)
            .await
            .map_err(|e| log_failure("issue", e))?;

        tracing::info!(owner = %user.id, ttl_ms = ttl.as_millis() as u64, "Token issued");
        Ok(token)
    }

    /// Resolves a presented token to its owner
    ///
    /// # Returns
    ///
    /// * `Ok(User)` - The token is live
    /// * `Err(TokenError::NotFound)` - Unknown, expired, revoked, or inconsistent
    /// * `Err(TokenError::Infrastructure)` - The cache could not be consulted
    pub async fn verify(&self, raw: &str) -> TokenResult<User> {
        if raw.is_empty() || raw.len() > MAX_TOKEN_LEN {
            tracing::debug!(len = raw.len(), "Token rejected without lookup");
            return Err(TokenError::NotFound);
        }

        let user = match self.repository.get(raw).await {
            Ok(user) => user,
            Err(TokenError::NotFound) => {
                tracing::debug!("Token not found");
                return Err(TokenError::NotFound);
            }
            Err(e) => return Err(log_failure("verify", e)),
        };

        match TokenCodec::decode_owner(raw) {
            Ok(owner) if owner == user.id => Ok(user),
            _ => {
                tracing::debug!(owner = %user.id, "Token owner does not match record");
                Err(TokenError::NotFound)
            }
        }
    }

    /// Revokes one token of `user`; succeeds if it is already gone
    ///
    /// A well-formed token embedding another owner is left untouched.
    pub async fn revoke(&self, user: &User, token: &str) -> TokenResult<()> {
        if let Ok(owner) = TokenCodec::decode_owner(token) {
            if owner != user.id {
                tracing::debug!(owner = %user.id, "Revocation of foreign token ignored");
                return Ok(());
            }
        }

        self.repository
            .delete_one(&user.id, token)
            .await
            .map_err(|e| log_failure("revoke", e))?;

        tracing::info!(owner = %user.id, "Token revoked");
        Ok(())
    }

    /// Revokes every token of `user`, returning how many index entries were processed
    pub async fn revoke_all(&self, user: &User) -> TokenResult<usize> {
        let count = self
            .repository
            .delete_all(&user.id)
            .await
            .map_err(|e| log_failure("revoke_all", e))?;

        tracing::info!(owner = %user.id, count, "All tokens revoked");
        Ok(count)
    }

    /// Exchanges a live token for a new one and revokes the presented token
    ///
    /// If the presented token cannot be revoked, the new token is deleted
    /// again (best effort) and the error is returned; the presented token
    /// stays valid.
    pub async fn refresh(&self, raw: &str, options: TokenOptions) -> TokenResult<Token> {
        let user = self.verify(raw).await?;
        let token = self.issue(&user, options).await?;

        if let Err(e) = self.revoke(&user, raw).await {
            if let Err(cleanup) = self.repository.delete_one(&user.id, token.as_str()).await {
                tracing::warn!(
                    owner = %user.id,
                    error = %cleanup,
                    "Replacement token left behind after failed refresh"
                );
            }
            return Err(e);
        }

        tracing::debug!(owner = %user.id, "Token refreshed");
        Ok(token)
    }

    /// Number of live tokens held by `user`
    pub async fn active_token_count(&self, user: &User) -> TokenResult<usize> {
        self.repository
            .live_count(&user.id)
            .await
            .map_err(|e| log_failure("active_token_count", e))
    }
}

fn log_failure(operation: &'static str, err: TokenError) -> TokenError {
    if err.is_infrastructure() {
        tracing::warn!(operation, error = %err, "Credential store unavailable");
    }
    err
}
