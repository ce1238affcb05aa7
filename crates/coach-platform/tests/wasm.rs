//! WASM-target tests for coach-platform (Node.js runtime).
//!
//! Covers MemoryStorage, the timer and the device identity on top of it
//! under wasm32-unknown-unknown via `wasm-pack test --node`.
//! IndexedDB needs a browser; under Node only its missing-window path runs.

#![cfg(target_arch = "wasm32")]

use std::rc::Rc;
use wasm_bindgen_test::*;

use coach_core::homework::HomeworkStore;
use coach_core::identity::DeviceIdentity;
use coach_core::ports::{StoragePort, TimerPort};
use coach_platform::storage::{auto_detect_storage, open_storage, IndexedDbStorage, MemoryStorage};
use coach_platform::BrowserTimer;
use coach_types::config::StorageBackendType;
use coach_types::turn::Homework;
use coach_types::CoachError;

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
    assert!(storage.is_empty());
}

#[wasm_bindgen_test]
async fn memory_storage_set_get_overwrite() {
    let storage = MemoryStorage::new();
    assert!(storage.get("coach:device_id").await.unwrap().is_none());

    storage.set("key", b"v1").await.unwrap();
    storage.set("key", b"v2").await.unwrap();
    assert_eq!(storage.get("key").await.unwrap(), Some(b"v2".to_vec()));
    assert_eq!(storage.len(), 1);
}

#[wasm_bindgen_test]
async fn memory_storage_delete_and_exists() {
    let storage = MemoryStorage::new();
    storage.set("key", b"val").await.unwrap();
    assert!(storage.exists("key").await.unwrap());

    storage.delete("key").await.unwrap();
    storage.delete("never-set").await.unwrap();
    assert!(!storage.exists("key").await.unwrap());
}

#[wasm_bindgen_test]
async fn configured_memory_backend() {
    let storage = open_storage(StorageBackendType::Memory).await.unwrap();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
async fn indexeddb_without_window_is_interop_error() {
    let err = IndexedDbStorage::open().await.err().unwrap();
    assert!(matches!(err, CoachError::JsInterop(_)));
}

#[wasm_bindgen_test]
async fn auto_backend_falls_back_to_memory_under_node() {
    let storage = auto_detect_storage().await;
    assert_eq!(storage.backend_name(), "memory");
}

// ─── Identity / homework over MemoryStorage ──────────────

#[wasm_bindgen_test]
async fn device_id_survives_new_identity_instance() {
    let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());
    let first = DeviceIdentity::new(storage.clone()).id().await.unwrap();
    let second = DeviceIdentity::new(storage.clone()).id().await.unwrap();
    assert_eq!(first, second);
}

#[wasm_bindgen_test]
async fn homework_saved_today() {
    let storage: Rc<dyn StoragePort> = Rc::new(MemoryStorage::new());
    let store = HomeworkStore::new(storage);
    store
        .save(&Homework {
            description: "Urge log".to_string(),
            examples: Vec::new(),
        })
        .await
        .unwrap();

    let stored = store.load().await.unwrap().unwrap();
    assert!(store.saved_on(stored.saved_at.date_naive()).await.unwrap());
}

// ─── Timer ───────────────────────────────────────────────

#[wasm_bindgen_test]
async fn browser_timer_resolves() {
    BrowserTimer::new().sleep(5).await;
}
