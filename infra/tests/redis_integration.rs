//! Integration tests for the Redis-backed credential store
//!
//! These tests require a running Redis instance to execute.
//! Run with: cargo test -p hc_infra --test redis_integration -- --ignored

use std::time::Duration;

use hc_core::domain::{TokenOptions, User};
use hc_core::errors::TokenError;
use hc_core::repositories::{CredentialStore, KeyValueCache};
use hc_core::services::{TokenService, TokenServiceConfig};
use hc_infra::cache::{CacheConfig, RedisClient};

fn redis_config() -> CacheConfig {
    CacheConfig::new(
        std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
    )
    .with_prefix(format!("hc-test-{}", uuid::Uuid::new_v4().simple()))
}

async fn token_service() -> TokenService<CredentialStore<RedisClient>> {
    let config = redis_config();
    let client = RedisClient::new(config.clone()).await.unwrap();
    TokenService::new(
        CredentialStore::with_config(client, &config),
        TokenServiceConfig::default(),
    )
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_redis_connection() {
    let client = RedisClient::new(redis_config()).await;
    assert!(client.is_ok(), "Failed to connect to Redis");
    assert!(client.unwrap().health_check().await.unwrap());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_set_members_round_trip() {
    let config = redis_config();
    let client = RedisClient::new(config.clone()).await.unwrap();
    let key = config.make_key("set");

    assert!(KeyValueCache::set_add(&client, &key, "a").await.unwrap());
    assert!(KeyValueCache::set_add(&client, &key, "b").await.unwrap());

    let mut members = KeyValueCache::set_members(&client, &key).await.unwrap();
    members.sort();
    assert_eq!(members, vec!["a".to_string(), "b".to_string()]);

    let removed = KeyValueCache::set_remove(&client, &key, &members).await.unwrap();
    assert_eq!(removed, 2);
    assert!(KeyValueCache::set_members(&client, &key).await.unwrap().is_empty());
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_millisecond_expiry() {
    let config = redis_config();
    let client = RedisClient::new(config.clone()).await.unwrap();
    let key = config.make_key("short");

    client
        .set_with_expiry(&key, "v", Duration::from_millis(100))
        .await
        .unwrap();
    assert_eq!(client.get(&key).await.unwrap(), Some("v".to_string()));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(client.get(&key).await.unwrap(), None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_issue_verify_expire() {
    let service = token_service().await;
    let user = User::new("alice@example.com");
    let duration = Duration::from_millis(200);

    let token = service
        .issue(&user, TokenOptions::with_duration(duration))
        .await
        .unwrap();

    tokio::time::sleep(duration / 2).await;
    assert_eq!(service.verify(token.as_str()).await.unwrap(), user);

    tokio::time::sleep(duration).await;
    assert_eq!(service.verify(token.as_str()).await, Err(TokenError::NotFound));
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_revoke_all() {
    let service = token_service().await;
    let users: Vec<User> = (0..4)
        .map(|i| User::new(format!("user{}@example.com", i)))
        .collect();

    let mut issued = Vec::new();
    for user in &users {
        let mut tokens = Vec::new();
        for _ in 0..8 {
            tokens.push(service.issue(user, TokenOptions::default()).await.unwrap());
        }
        issued.push(tokens);
    }

    assert_eq!(service.revoke_all(&users[0]).await.unwrap(), 8);

    for token in &issued[0] {
        assert_eq!(service.verify(token.as_str()).await, Err(TokenError::NotFound));
    }
    for (user, tokens) in users.iter().zip(&issued).skip(1) {
        for token in tokens {
            assert_eq!(&service.verify(token.as_str()).await.unwrap(), user);
        }
        service.revoke_all(user).await.unwrap();
    }
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_refresh_and_count() {
    let service = token_service().await;
    let user = User::new("bob@example.com");

    let first = service.issue(&user, TokenOptions::default()).await.unwrap();
    let second = service.refresh(first.as_str(), TokenOptions::default()).await.unwrap();

    assert_eq!(service.verify(first.as_str()).await, Err(TokenError::NotFound));
    assert_eq!(service.verify(second.as_str()).await.unwrap(), user);
    assert_eq!(service.active_token_count(&user).await.unwrap(), 1);

    service.revoke(&user, second.as_str()).await.unwrap();
    assert_eq!(service.active_token_count(&user).await.unwrap(), 0);
}
