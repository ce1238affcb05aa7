//! Homework hand-off for the daily reminder job.
//!
//! The coordinator only forwards homework it receives; the reminder reads
//! it back through [`HomeworkStore::load`].

use std::rc::Rc;
use chrono::NaiveDate;
use coach_types::{
    Result,
    turn::{Homework, StoredHomework},
};
use crate::ports::StoragePort;

const HOMEWORK_KEY: &str = "coach:homework";

pub struct HomeworkStore {
    storage: Rc<dyn StoragePort>,
}

impl HomeworkStore {
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self { storage }
    }

    pub async fn save(&self, homework: &Homework) -> Result<()> {
        let json = serde_json::to_vec(&StoredHomework::new(homework.clone()))?;
        self.storage.set(HOMEWORK_KEY, &json).await
    }

    /// Stored homework, or `None` when nothing (readable) is stored
    pub async fn load(&self) -> Result<Option<StoredHomework>> {
        let Some(data) = self.storage.get(HOMEWORK_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_slice::<StoredHomework>(&data) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                log::warn!("Discarding unreadable homework blob: {}", e);
                Ok(None)
            }
        }
    }

    /// Whether the stored homework was handed out on `date`
    pub async fn saved_on(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.load().await?.is_some_and(|stored| stored.saved_on(date)))
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.delete(HOMEWORK_KEY).await
    }
}
