//! Stable anonymous device identifier.
//!
//! Generated once (UUID v4), persisted through the storage port, and
//! returned unchanged on every later call, including after a restart.
//! Concurrent first calls share one load-or-generate step.

use std::rc::Rc;
use futures::lock::Mutex;
use coach_types::{CoachError, Result};
use crate::ports::StoragePort;

const DEVICE_ID_KEY: &str = "coach:device_id";

pub struct DeviceIdentity {
    storage: Rc<dyn StoragePort>,
    cached: Mutex<Option<String>>,
}

impl DeviceIdentity {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self {
            storage,
            cached: Mutex::new(None),
        }
    }

    pub async fn id(&self) -> Result<String> {
        // Held across the storage round-trip so a second caller waits for
        // the first instead of minting its own id
        let mut cached = self.cached.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let stored = self
            .storage
            .get(DEVICE_ID_KEY)
            .await
            .map_err(|e| CoachError::Identity(e.to_string()))?
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .filter(|id| !id.trim().is_empty());

        let id = match stored {
            Some(id) => id,
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                self.storage
                    .set(DEVICE_ID_KEY, id.as_bytes())
                    .await
                    .map_err(|e| CoachError::Identity(e.to_string()))?;
                log::info!("Generated device id ({})", self.storage.backend_name());
                id
            }
        };

        *cached = Some(id.clone());
        Ok(id)
    }
}
