//! Unit tests for token service

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hc_shared::config::MAX_ENTROPY_BYTES;

use crate::domain::entities::{Token, TokenOptions, User, UserId};
use crate::errors::{TokenError, TokenResult};
use crate::repositories::{CredentialRepository, CredentialStore, FailingCache, MemoryCache};
use crate::services::token::{
    TokenCodec, TokenService, TokenServiceConfig, MAX_TOKEN_LEN, MAX_TTL, MIN_TTL,
};

fn service() -> TokenService<CredentialStore<MemoryCache>> {
    TokenService::new(
        CredentialStore::new(MemoryCache::new()),
        TokenServiceConfig::default(),
    )
}

#[tokio::test]
async fn test_issue_then_verify() {
    let service = service();
    let user = User::new("alice@example.com");

    let token = service.issue(&user, TokenOptions::default()).await.unwrap();
    let found = service.verify(token.as_str()).await.unwrap();

    assert_eq!(found, user);
    assert!(found.same_user(&user));
    assert_eq!(TokenCodec::decode_owner(token.as_str()).unwrap(), user.id);
}

#[tokio::test]
async fn test_issue_uses_configured_entropy() {
    let config = TokenServiceConfig::new(Duration::from_secs(60), 32).unwrap();
    let service = TokenService::new(CredentialStore::new(MemoryCache::new()), config);
    let user = User::new("bob@example.com");

    let token = service.issue(&user, TokenOptions::default()).await.unwrap();
    assert_eq!(TokenCodec::decoded_len(token.as_str()), Some(32 + 1 + 32));
}

#[tokio::test]
async fn test_largest_entropy_still_verifies() {
    let config = TokenServiceConfig::new(Duration::from_secs(60), MAX_ENTROPY_BYTES).unwrap();
    let service = TokenService::new(CredentialStore::new(MemoryCache::new()), config);
    let user = User::new("ivan@example.com");

    let token = service.issue(&user, TokenOptions::default()).await.unwrap();

    assert_eq!(token.len(), MAX_TOKEN_LEN);
    assert_eq!(service.verify(token.as_str()).await.unwrap(), user);
}

#[tokio::test]
#[should_panic(expected = "nil id")]
async fn test_issue_nil_user_panics() {
    let service = service();
    let user = User::with_id(UserId::nil(), "ghost@example.com");

    let _ = service.issue(&user, TokenOptions::default()).await;
}

#[tokio::test]
async fn test_verify_unknown_token() {
    let service = service();
    let user = User::new("carol@example.com");
    let token = TokenCodec::generate(&user.id, 24).unwrap();

    assert_eq!(service.verify(token.as_str()).await, Err(TokenError::NotFound));
    assert_eq!(service.verify("not-a-token").await, Err(TokenError::NotFound));
}

#[tokio::test]
async fn test_verify_rejects_empty_and_oversized_without_lookup() {
    let cache = FailingCache::new();
    let service = TokenService::new(CredentialStore::new(cache.clone()), TokenServiceConfig::default());

    assert_eq!(service.verify("").await, Err(TokenError::NotFound));
    let oversized = "a".repeat(MAX_TOKEN_LEN + 1);
    assert_eq!(service.verify(&oversized).await, Err(TokenError::NotFound));
    assert_eq!(cache.calls(), 0);
}

#[tokio::test]
async fn test_verify_owner_mismatch_is_not_found() {
    let service = service();
    let alice = User::new("alice@example.com");
    let mallory = User::new("mallory@example.com");

    // Token embeds alice's id but the record belongs to mallory
    let token = TokenCodec::generate(&alice.id, 24).unwrap();
    service
        .repository
        .put(&token, &mallory, Duration::from_secs(60))
        .await
        .unwrap();

    assert_eq!(service.verify(token.as_str()).await, Err(TokenError::NotFound));
}

#[tokio::test]
async fn test_cache_failure_is_not_reported_as_not_found() {
    let service = TokenService::new(
        CredentialStore::new(FailingCache::new()),
        TokenServiceConfig::default(),
    );
    let user = User::new("dave@example.com");
    let token = TokenCodec::generate(&user.id, 24).unwrap();

    let err = service.verify(token.as_str()).await.unwrap_err();
    assert!(err.is_infrastructure());

    let err = service.issue(&user, TokenOptions::default()).await.unwrap_err();
    assert!(err.is_infrastructure());

    assert!(service.revoke_all(&user).await.unwrap_err().is_infrastructure());
}

#[tokio::test]
async fn test_revoke() {
    let service = service();
    let user = User::new("erin@example.com");
    let keep = service.issue(&user, TokenOptions::default()).await.unwrap();
    let drop = service.issue(&user, TokenOptions::default()).await.unwrap();

    service.revoke(&user, drop.as_str()).await.unwrap();

    assert_eq!(service.verify(drop.as_str()).await, Err(TokenError::NotFound));
    assert_eq!(service.verify(keep.as_str()).await.unwrap(), user);

    // Already gone
    service.revoke(&user, drop.as_str()).await.unwrap();
}

#[tokio::test]
async fn test_revoke_ignores_foreign_token() {
    let service = service();
    let alice = User::new("alice@example.com");
    let bob = User::new("bob@example.com");
    let token = service.issue(&alice, TokenOptions::default()).await.unwrap();

    service.revoke(&bob, token.as_str()).await.unwrap();

    assert_eq!(service.verify(token.as_str()).await.unwrap(), alice);
}

#[tokio::test]
async fn test_refresh() {
    let service = service();
    let user = User::new("frank@example.com");
    let old = service.issue(&user, TokenOptions::default()).await.unwrap();

    let new = service.refresh(old.as_str(), TokenOptions::default()).await.unwrap();

    assert_ne!(old, new);
    assert_eq!(service.verify(new.as_str()).await.unwrap(), user);
    assert_eq!(service.verify(old.as_str()).await, Err(TokenError::NotFound));
    assert_eq!(service.active_token_count(&user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_refresh_of_unknown_token_fails() {
    let service = service();
    let user = User::new("grace@example.com");
    let token = TokenCodec::generate(&user.id, 24).unwrap();

    let result = service.refresh(token.as_str(), TokenOptions::default()).await;
    assert_eq!(result, Err(TokenError::NotFound));
    assert_eq!(service.active_token_count(&user).await.unwrap(), 0);
}

#[tokio::test]
async fn test_active_token_count() {
    let service = service();
    let user = User::new("heidi@example.com");

    for _ in 0..3 {
        service.issue(&user, TokenOptions::default()).await.unwrap();
    }

    assert_eq!(service.active_token_count(&user).await.unwrap(), 3);
    assert_eq!(service.revoke_all(&user).await.unwrap(), 3);
    assert_eq!(service.active_token_count(&user).await.unwrap(), 0);
}

/// Memory-backed repository that records `put` lifetimes and can be told
/// to fail `delete_one` for a single token.
struct ScriptedRepository {
    inner: CredentialStore<MemoryCache>,
    ttls: Mutex<Vec<Duration>>,
    fail_delete: Mutex<Option<String>>,
}

impl ScriptedRepository {
    fn new() -> Self {
        Self {
            inner: CredentialStore::new(MemoryCache::new()),
            ttls: Mutex::new(Vec::new()),
            fail_delete: Mutex::new(None),
        }
    }

    fn fail_delete_of(&self, token: &str) {
        *self.fail_delete.lock().unwrap() = Some(token.to_string());
    }

    fn recorded_ttls(&self) -> Vec<Duration> {
        self.ttls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialRepository for ScriptedRepository {
    async fn put(&self, token: &Token, user: &User, ttl: Duration) -> TokenResult<()> {
        self.ttls.lock().unwrap().push(ttl);
        self.inner.put(token, user, ttl).await
    }

    async fn get(&self, token: &str) -> TokenResult<User> {
        self.inner.get(token).await
    }

    async fn delete_one(&self, owner: &UserId, token: &str) -> TokenResult<()> {
        let fail = self.fail_delete.lock().unwrap().as_deref() == Some(token);
        if fail {
            return Err(TokenError::infrastructure("connection reset"));
        }
        self.inner.delete_one(owner, token).await
    }

    async fn delete_all(&self, owner: &UserId) -> TokenResult<usize> {
        self.inner.delete_all(owner).await
    }

    async fn live_count(&self, owner: &UserId) -> TokenResult<usize> {
        self.inner.live_count(owner).await
    }
}

fn scripted_service() -> TokenService<ScriptedRepository> {
    TokenService::new(ScriptedRepository::new(), TokenServiceConfig::default())
}

#[tokio::test]
async fn test_issue_clamps_ttl() {
    let service = scripted_service();
    let user = User::new("judy@example.com");

    service
        .issue(&user, TokenOptions::with_duration(Duration::MAX))
        .await
        .unwrap();
    service
        .issue(&user, TokenOptions::with_duration(Duration::ZERO))
        .await
        .unwrap();
    service
        .issue(&user, TokenOptions::with_duration(Duration::from_secs(90)))
        .await
        .unwrap();

    assert_eq!(
        service.repository.recorded_ttls(),
        vec![MAX_TTL, MIN_TTL, Duration::from_secs(90)]
    );
}

#[tokio::test]
async fn test_refresh_failed_revoke_drops_replacement() {
    let service = scripted_service();
    let user = User::new("kim@example.com");
    let old = service.issue(&user, TokenOptions::default()).await.unwrap();
    service.repository.fail_delete_of(old.as_str());

    let err = service
        .refresh(old.as_str(), TokenOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_infrastructure());
    assert_eq!(service.verify(old.as_str()).await.unwrap(), user);
    assert_eq!(service.active_token_count(&user).await.unwrap(), 1);
}
