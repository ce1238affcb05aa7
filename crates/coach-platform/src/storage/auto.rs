//! Backend selection.
//!
//! `Auto` prefers IndexedDB (the device id survives reloads) and falls back
//! to memory.

use std::rc::Rc;
use coach_core::ports::StoragePort;
use coach_types::{config::StorageBackendType, Result};
use super::{IndexedDbStorage, MemoryStorage};

/// Open the configured backend as a trait object.
pub async fn open_storage(backend: StorageBackendType) -> Result<Rc<dyn StoragePort>> {
    match backend {
        StorageBackendType::Memory => {
            log::info!("Storage backend: memory (configured)");
            Ok(Rc::new(MemoryStorage::new()))
        }
        StorageBackendType::IndexedDb => {
            let idb = IndexedDbStorage::open().await?;
            log::info!("Storage backend: IndexedDB (configured)");
            Ok(Rc::new(idb))
        }
        StorageBackendType::Auto => Ok(auto_detect_storage().await),
    }
}

/// Best available backend; never fails.
pub async fn auto_detect_storage() -> Rc<dyn StoragePort> {
    match IndexedDbStorage::open().await {
        Ok(idb) => {
            log::info!("Storage backend: IndexedDB");
            Rc::new(idb)
        }
        Err(e) => {
            log::warn!("IndexedDB unavailable ({}), falling back to memory", e);
            Rc::new(MemoryStorage::new())
        }
    }
}
