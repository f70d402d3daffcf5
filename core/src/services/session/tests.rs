use std::sync::Arc;
use std::time::Duration;

use super::*;
use crate::errors::StorageError;
use crate::repositories::MockKeyValueStore;

const ALICE: &str = "estudiante@udea.edu.co";
const BOB: &str = "profesor@udea.edu.co";

fn registry() -> (Arc<MockKeyValueStore>, SessionRegistry<MockKeyValueStore>) {
    let store = Arc::new(MockKeyValueStore::new());
    let registry = SessionRegistry::new(store.clone(), 3600);
    (store, registry)
}

#[tokio::test]
async fn test_register_and_count_sessions() {
    let (store, registry) = registry();

    assert!(!registry.has_active_sessions(ALICE).await.unwrap());
    assert!(registry.register_session(ALICE, "token-1").await);
    assert!(registry.register_session(ALICE, "token-2").await);

    assert!(registry.has_active_sessions(ALICE).await.unwrap());
    assert_eq!(registry.active_session_count(ALICE).await.unwrap(), 2);
    assert_eq!(store.last_ttl_millis(), Some(3_600_000));
}

#[tokio::test]
async fn test_same_token_registers_once() {
    let (_, registry) = registry();

    registry.register_session(ALICE, "token-1").await;
    registry.register_session(ALICE, "token-1").await;

    assert_eq!(registry.active_session_count(ALICE).await.unwrap(), 1);
}

#[tokio::test]
async fn test_invalidate_all_returns_count_and_isolates_identities() {
    let (_, registry) = registry();

    registry.register_session(ALICE, "token-1").await;
    registry.register_session(ALICE, "token-2").await;
    registry.register_session(ALICE, "token-3").await;
    registry.register_session(BOB, "token-4").await;

    assert_eq!(registry.invalidate_all_user_sessions(ALICE).await.unwrap(), 3);
    assert!(!registry.has_active_sessions(ALICE).await.unwrap());
    assert!(registry.has_active_sessions(BOB).await.unwrap());
}

#[tokio::test]
async fn test_invalidate_unknown_identity_returns_zero() {
    let (_, registry) = registry();
    assert_eq!(registry.invalidate_all_user_sessions("nobody@udea.edu.co").await.unwrap(), 0);
}

#[tokio::test]
async fn test_identity_prefix_does_not_leak_into_longer_identities() {
    let (_, registry) = registry();

    registry.register_session("ana@udea.edu.co.extra", "token-1").await;

    assert!(!registry.has_active_sessions("ana@udea.edu.co").await.unwrap());
}

#[tokio::test]
async fn test_register_reports_storage_failure() {
    let store = Arc::new(MockKeyValueStore::failing());
    let registry = SessionRegistry::new(store, 3600);

    assert!(!registry.register_session(ALICE, "token-1").await);
    assert!(matches!(
        registry.has_active_sessions(ALICE).await,
        Err(StorageError::Unavailable { .. })
    ));
    assert!(registry.invalidate_all_user_sessions(ALICE).await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_sessions_expire_with_ttl() {
    let store = Arc::new(MockKeyValueStore::new());
    let registry = SessionRegistry::new(store, 10);

    registry.register_session(ALICE, "token-1").await;
    tokio::time::advance(Duration::from_secs(11)).await;

    assert!(!registry.has_active_sessions(ALICE).await.unwrap());
}

#[tokio::test]
async fn test_non_positive_ttl_still_writes_a_ttl() {
    let store = Arc::new(MockKeyValueStore::new());
    let registry = SessionRegistry::new(store.clone(), 0);

    assert!(registry.register_session(ALICE, "access-token").await);
    assert_eq!(store.last_ttl_millis(), Some(1));

    let registry = SessionRegistry::new(store.clone(), -30);
    assert!(registry.register_session(BOB, "access-token").await);
    assert_eq!(store.last_ttl_millis(), Some(1));
}
