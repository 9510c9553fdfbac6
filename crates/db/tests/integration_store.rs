//! Integration tests for the integration repository and encrypted store,
//! exercised against a real database:
//! - upsert semantics keyed by (hotel_id, provider)
//! - encrypt/decrypt round-trip through the store
//! - sync-status updates leaving settings untouched
//! - deletion and safe listing

use std::sync::Arc;

use hotelhub_core::catalog::{
    CatalogCategory, CatalogItem, IntegrationSettings, ProviderCredentials,
};
use hotelhub_core::vault::Vault;
use hotelhub_db::models::integration::{Provider, SyncStatus};
use hotelhub_db::repositories::IntegrationRepo;
use hotelhub_db::store::IntegrationStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_store(pool: PgPool) -> IntegrationStore {
    let vault = Vault::from_secrets("db-test-secret", "db-test-salt").unwrap();
    IntegrationStore::new(pool, Arc::new(vault))
}

fn pms_settings(api_key: &str) -> IntegrationSettings {
    IntegrationSettings {
        credentials: Some(ProviderCredentials::Pms {
            username: "frontdesk".to_string(),
            password: "hunter2".to_string(),
            api_key: api_key.to_string(),
            region: "eu".to_string(),
        }),
        categories_sort: vec![CatalogCategory {
            id: Some("1".to_string()),
            name: "Deluxe".to_string(),
            order: 0,
            excluded: false,
            sites: vec![CatalogItem {
                site_id: "s1".to_string(),
                site_name: "Room 1".to_string(),
                order: 0,
                excluded: true,
            }],
        }],
        task_types: vec![],
        note_types: vec![],
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn upsert_inserts_then_updates_in_place(pool: PgPool) {
    let first = IntegrationRepo::upsert(&pool, 1, Provider::Pms, "blob-a", true)
        .await
        .unwrap();
    let second = IntegrationRepo::upsert(&pool, 1, Provider::Pms, "blob-b", false)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.settings, "blob-b");
    assert!(!second.is_active);

    // A different provider for the same hotel gets its own row.
    let other = IntegrationRepo::upsert(&pool, 1, Provider::Reservations, "blob-c", true)
        .await
        .unwrap();
    assert_ne!(other.id, first.id);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_sync_status_owns_only_its_fields(pool: PgPool) {
    IntegrationRepo::upsert(&pool, 7, Provider::Pms, "ciphertext", true)
        .await
        .unwrap();

    let updated = IntegrationRepo::update_sync_status(
        &pool,
        7,
        Provider::Pms,
        SyncStatus::Error,
        "provider timeout",
    )
    .await
    .unwrap();
    assert!(updated);

    let record = IntegrationRepo::find_by_hotel_provider(&pool, 7, Provider::Pms)
        .await
        .unwrap()
        .unwrap();

    // Sync fields changed; settings and active flag did not.
    assert_eq!(record.sync_status(), Some(SyncStatus::Error));
    assert_eq!(record.last_sync_message.as_deref(), Some("provider timeout"));
    assert!(record.last_synced.is_some());
    assert_eq!(record.settings, "ciphertext");
    assert!(record.is_active);
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_sync_status_for_missing_record_is_false(pool: PgPool) {
    let updated =
        IntegrationRepo::update_sync_status(&pool, 99, Provider::Pos, SyncStatus::Pending, "")
            .await
            .unwrap();
    assert!(!updated);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_by_hotel_returns_safe_info(pool: PgPool) {
    IntegrationRepo::upsert(&pool, 3, Provider::Pms, "secret-blob", true)
        .await
        .unwrap();
    IntegrationRepo::upsert(&pool, 3, Provider::Reservations, "other-blob", false)
        .await
        .unwrap();
    IntegrationRepo::upsert(&pool, 4, Provider::Pms, "unrelated", true)
        .await
        .unwrap();

    let infos = IntegrationRepo::list_by_hotel(&pool, 3).await.unwrap();
    assert_eq!(infos.len(), 2);
    // Ordered by provider name: pms before reservations.
    assert_eq!(infos[0].provider, Provider::Pms);
    assert_eq!(infos[1].provider, Provider::Reservations);
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_removes_only_the_targeted_pair(pool: PgPool) {
    IntegrationRepo::upsert(&pool, 5, Provider::Pms, "a", true)
        .await
        .unwrap();
    IntegrationRepo::upsert(&pool, 5, Provider::Pos, "b", true)
        .await
        .unwrap();

    assert!(IntegrationRepo::delete(&pool, 5, Provider::Pms).await.unwrap());
    assert!(!IntegrationRepo::delete(&pool, 5, Provider::Pms).await.unwrap());

    let remaining = IntegrationRepo::find_by_hotel_provider(&pool, 5, Provider::Pos)
        .await
        .unwrap();
    assert!(remaining.is_some());
}

// ---------------------------------------------------------------------------
// Encrypted store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn store_round_trips_settings_through_the_vault(pool: PgPool) {
    let store = test_store(pool.clone());
    let settings = pms_settings("key-123");

    store.save(10, Provider::Pms, &settings, true).await.unwrap();

    // The persisted blob is ciphertext, not JSON.
    let record = IntegrationRepo::find_by_hotel_provider(&pool, 10, Provider::Pms)
        .await
        .unwrap()
        .unwrap();
    assert!(!record.settings.contains("key-123"));
    assert!(!record.settings.contains("categories_sort"));

    let loaded = store.get_settings(10, Provider::Pms).await.unwrap().unwrap();
    assert_eq!(loaded, settings);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_settings_is_none_for_missing_integration(pool: PgPool) {
    let store = test_store(pool);
    let loaded = store.get_settings(11, Provider::Pms).await.unwrap();
    assert!(loaded.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_settings_surfaces_decryption_failure(pool: PgPool) {
    let store = test_store(pool.clone());

    // Simulate a blob written under different secrets.
    IntegrationRepo::upsert(&pool, 12, Provider::Pms, "bm90IHJlYWwgY2lwaGVydGV4dA==", true)
        .await
        .unwrap();

    let result = store.get_settings(12, Provider::Pms).await;
    assert!(matches!(
        result,
        Err(hotelhub_db::store::StoreError::Vault(_))
    ));
}

#[sqlx::test(migrations = "../../migrations")]
async fn is_active_reflects_flag_and_existence(pool: PgPool) {
    let store = test_store(pool);
    assert!(!store.is_active(13, Provider::Pms).await.unwrap());

    let settings = pms_settings("k");
    store.save(13, Provider::Pms, &settings, true).await.unwrap();
    assert!(store.is_active(13, Provider::Pms).await.unwrap());

    store.save(13, Provider::Pms, &settings, false).await.unwrap();
    assert!(!store.is_active(13, Provider::Pms).await.unwrap());
}
