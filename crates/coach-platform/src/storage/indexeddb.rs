//! IndexedDB storage backend.
//! Persistent across page reloads; holds the device id and homework.

use async_trait::async_trait;
use js_sys::Uint8Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{IdbDatabase, IdbObjectStore, IdbRequest, IdbTransactionMode};

use coach_core::ports::StoragePort;
use coach_types::{CoachError, Result};

const DB_NAME: &str = "coach_storage";
const STORE_NAME: &str = "kv";
const DB_VERSION: u32 = 1;

pub struct IndexedDbStorage {
    db: IdbDatabase,
}

fn storage_err(e: JsValue) -> CoachError {
    CoachError::Storage(format!("{:?}", e))
}

/// A JS value that is not the type the binding expected
fn js_err(e: JsValue) -> CoachError {
    CoachError::JsInterop(format!("{:?}", e))
}

impl IndexedDbStorage {
    /// Open (or create) the database.
    pub async fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| CoachError::JsInterop("No window object".to_string()))?;

        let factory = window
            .indexed_db()
            .map_err(storage_err)?
            .ok_or_else(|| CoachError::Storage("IndexedDB not available".to_string()))?;

        let open_req = factory
            .open_with_u32(DB_NAME, DB_VERSION)
            .map_err(storage_err)?;

        let upgrade_req = open_req.clone();
        let onupgrade = Closure::once(move |_event: web_sys::Event| {
            let db = upgrade_req
                .result()
                .ok()
                .and_then(|result| result.dyn_into::<IdbDatabase>().ok());
            if let Some(db) = db {
                if !db.object_store_names().contains(STORE_NAME) {
                    let _ = db.create_object_store(STORE_NAME);
                }
            }
        });
        open_req.set_onupgradeneeded(Some(onupgrade.as_ref().unchecked_ref()));
        onupgrade.forget();

        let db: IdbDatabase = JsFuture::from(request_promise(&open_req))
            .await
            .map_err(storage_err)?
            .dyn_into()
            .map_err(js_err)?;

        Ok(Self { db })
    }

    fn store(&self, mode: IdbTransactionMode) -> Result<IdbObjectStore> {
        let tx = self
            .db
            .transaction_with_str_and_mode(STORE_NAME, mode)
            .map_err(storage_err)?;
        tx.object_store(STORE_NAME).map_err(storage_err)
    }
}

#[async_trait(?Send)]
impl StoragePort for IndexedDbStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let store = self.store(IdbTransactionMode::Readonly)?;
        let req = store.get(&JsValue::from_str(key)).map_err(storage_err)?;

        let result = JsFuture::from(request_promise(&req))
            .await
            .map_err(storage_err)?;

        if result.is_undefined() || result.is_null() {
            return Ok(None);
        }
        Ok(Some(Uint8Array::new(&result).to_vec()))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let store = self.store(IdbTransactionMode::Readwrite)?;
        let req = store
            .put_with_key(&Uint8Array::from(value), &JsValue::from_str(key))
            .map_err(storage_err)?;
        JsFuture::from(request_promise(&req))
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let store = self.store(IdbTransactionMode::Readwrite)?;
        let req = store.delete(&JsValue::from_str(key)).map_err(storage_err)?;
        JsFuture::from(request_promise(&req))
            .await
            .map_err(storage_err)?;
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "indexeddb"
    }
}

/// Wrap the callback-based IdbRequest in a Promise for `JsFuture`.
fn request_promise(req: &IdbRequest) -> js_sys::Promise {
    let req = req.clone();
    js_sys::Promise::new(&mut move |resolve, reject| {
        let success_req = req.clone();
        let onsuccess = Closure::once(move |_: web_sys::Event| {
            let _ = resolve.call1(
                &JsValue::NULL,
                &success_req.result().unwrap_or(JsValue::UNDEFINED),
            );
        });
        let onerror = Closure::once(move |_: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("IDB request failed"));
        });
        req.set_onsuccess(Some(onsuccess.as_ref().unchecked_ref()));
        req.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onsuccess.forget();
        onerror.forget();
    })
}
