use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::notification::{IncomingNotification, NotificationRecord, NotificationTarget};
use crate::services::storage::{get_json, set_json, SharedStore, BADGE_KEY, NOTIFICATIONS_KEY};

/// Local mirror of received notifications, newest first.
///
/// Every operation reads the whole list, changes it and writes it back.
/// Storage failures are logged and leave the stored list untouched.
#[derive(Clone)]
pub struct NotificationStore {
    store: SharedStore,
    write_lock: Arc<Mutex<()>>,
}

impl NotificationStore {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn append(&self, incoming: IncomingNotification) -> Option<NotificationRecord> {
        let record = incoming.into_record();
        log::info!("Notification received: {} ({:?})", record.id, record.kind);

        let inserted = record.clone();
        match self.mutate(move |records| records.insert(0, record)).await {
            Ok(()) => Some(inserted),
            Err(e) => {
                log::error!("Error saving notification: {:#}", e);
                None
            }
        }
    }

    pub async fn list(&self) -> Vec<NotificationRecord> {
        self.read().unwrap_or_else(|e| {
            log::error!("Error getting notifications: {:#}", e);
            Vec::new()
        })
    }

    pub async fn mark_read(&self, id: &str) {
        let result = self
            .mutate(|records| {
                if let Some(record) = records.iter_mut().find(|r| r.id == id) {
                    record.read = true;
                }
            })
            .await;
        if let Err(e) = result {
            log::error!("Error marking notification as read: {:#}", e);
        }
    }

    pub async fn mark_all_read(&self) {
        let result = self
            .mutate(|records| records.iter_mut().for_each(|r| r.read = true))
            .await;
        if let Err(e) = result {
            log::error!("Error marking all as read: {:#}", e);
        }
    }

    pub async fn delete(&self, id: &str) {
        if let Err(e) = self.mutate(|records| records.retain(|r| r.id != id)).await {
            log::error!("Error deleting notification: {:#}", e);
        }
    }

    pub async fn clear_all(&self) {
        let _guard = self.write_lock.lock().await;
        let result = set_json(self.store.as_ref(), NOTIFICATIONS_KEY, &Vec::<NotificationRecord>::new())
            .and_then(|_| self.store.set(BADGE_KEY, "0"));
        if let Err(e) = result {
            log::error!("Error clearing notifications: {:#}", e);
        }
    }

    pub async fn unread_count(&self) -> usize {
        match self.read() {
            Ok(records) => count_unread(&records),
            Err(e) => {
                log::error!("Error getting unread count: {:#}", e);
                0
            }
        }
    }

    /// Badge value last written alongside the list.
    pub fn badge_count(&self) -> usize {
        match self.store.get(BADGE_KEY) {
            Ok(value) => value.and_then(|v| v.parse().ok()).unwrap_or(0),
            Err(e) => {
                log::error!("Error reading badge count: {:#}", e);
                0
            }
        }
    }

    pub fn tap_target(&self, data: &Value) -> NotificationTarget {
        let target = NotificationTarget::from_data(data);
        log::debug!("Notification tapped, routing to {:?}", target);
        target
    }

    fn read(&self) -> Result<Vec<NotificationRecord>> {
        Ok(get_json(self.store.as_ref(), NOTIFICATIONS_KEY)?.unwrap_or_default())
    }

    async fn mutate<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<NotificationRecord>),
    {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read()?;
        change(&mut records);
        set_json(self.store.as_ref(), NOTIFICATIONS_KEY, &records)?;
        self.update_badge(&records);
        Ok(())
    }

    fn update_badge(&self, records: &[NotificationRecord]) {
        let count = count_unread(records);
        if let Err(e) = self.store.set(BADGE_KEY, &count.to_string()) {
            log::error!("Error updating badge count: {:#}", e);
        }
    }
}

fn count_unread(records: &[NotificationRecord]) -> usize {
    records.iter().filter(|r| !r.read).count()
}
