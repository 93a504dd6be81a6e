use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use courier_core::{DeliveryRecord, DeliveryStatus, DeliveryUpdate};

/// Default capacity ceiling for the delivery registry.
pub const DEFAULT_REGISTRY_CAPACITY: usize = 1000;

/// Bounded store of the latest known delivery status per message.
///
/// Upserts merge field-by-field (see [`DeliveryRecord::apply`]); a later
/// webhook carrying only a status never erases a previously recorded cost.
///
/// Eviction is by insertion order: once the registry exceeds its capacity,
/// the oldest-inserted records are dropped. This is an approximate LRU
/// (oldest insertion, not oldest access) -- webhook updates do not refresh a
/// record's position.
#[derive(Debug)]
pub struct DeliveryRegistry {
    capacity: usize,
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    records: HashMap<String, DeliveryRecord>,
    /// Message ids in insertion order, oldest first.
    order: VecDeque<String>,
}

impl DeliveryRegistry {
    /// Create a registry bounded at `capacity` records.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(RegistryInner::default()),
        }
    }

    /// Upsert the record for `message_id`.
    ///
    /// Creates the record when the id is new, otherwise merges `update` onto
    /// the existing record with last-write-wins per field.
    pub fn record(&self, message_id: &str, status: DeliveryStatus, update: DeliveryUpdate) {
        let mut inner = self.inner.lock().expect("delivery registry lock poisoned");

        if let Some(existing) = inner.records.get_mut(message_id) {
            existing.apply(status, update);
            return;
        }

        let mut record = DeliveryRecord::new(message_id, status);
        record.apply(status, update);
        inner.records.insert(message_id.to_owned(), record);
        inner.order.push_back(message_id.to_owned());

        while inner.records.len() > self.capacity {
            if let Some(oldest) = inner.order.pop_front() {
                inner.records.remove(&oldest);
            } else {
                break;
            }
        }
    }

    /// Look up the record for `message_id`. Pure lookup; does not refresh
    /// the record's eviction position.
    pub fn get(&self, message_id: &str) -> Option<DeliveryRecord> {
        let inner = self.inner.lock().expect("delivery registry lock poisoned");
        inner.records.get(message_id).cloned()
    }

    /// Return the number of tracked records.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .expect("delivery registry lock poisoned")
            .records
            .len()
    }

    /// Return `true` when no records are tracked.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DeliveryRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REGISTRY_CAPACITY)
    }
}
