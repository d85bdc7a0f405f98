//! On-disk copy of the last good payload per query.
//!
//! When the backend is unreachable right after start-up, the HTTP client has
//! nothing in memory yet; this store lets it serve the previous session's
//! rows as stale instead of an empty table.

use std::{
    collections::HashMap,
    fs,
    io,
    path::PathBuf,
    sync::{Arc, Mutex},
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::domain::RecordSet;

const SNAPSHOT_FILENAME: &str = "snapshots.json";

/// Snapshots older than this are ignored.
pub const SNAPSHOT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Unix timestamp (seconds) of the original fetch.
    pub cached_at: u64,
    pub records: RecordSet,
}

impl Snapshot {
    pub fn new(records: RecordSet, fetched_at: SystemTime) -> Self {
        let cached_at = fetched_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self { cached_at, records }
    }

    pub fn fetched_at(&self) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(self.cached_at)
    }

    pub fn age(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Duration::from_secs(now.saturating_sub(self.cached_at))
    }

    pub fn is_expired(&self) -> bool {
        self.age() > SNAPSHOT_TTL
    }

    /// Human-readable age string.
    pub fn age_string(&self) -> String {
        let secs = self.age().as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m", secs / 60)
        } else if secs < 86400 {
            format!("{}h", secs / 3600)
        } else {
            format!("{}d", secs / 86400)
        }
    }
}

/// All snapshots share one file; clones share the lock guarding its
/// read-modify-write cycle.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl SnapshotStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// `<local data dir>/parcel-desk/snapshots.json`, if the platform has one.
    pub fn default_location() -> Option<Self> {
        dirs::data_local_dir().map(|base| Self::at(base.join("parcel-desk").join(SNAPSHOT_FILENAME)))
    }

    pub fn load(&self, key: &str) -> Option<Snapshot> {
        let snapshot = self.read_all().remove(key)?;
        if snapshot.is_expired() {
            tracing::debug!(key, age = %snapshot.age_string(), "snapshot expired");
            return None;
        }
        tracing::debug!(key, age = %snapshot.age_string(), "loaded snapshot");
        Some(snapshot)
    }

    pub fn save(&self, key: &str, snapshot: Snapshot) -> Result<(), io::Error> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut all = self.read_all();
        all.insert(key.to_string(), snapshot);
        all.retain(|_, entry| !entry.is_expired());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&all)?;
        // Readers never see a half-written file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(key, path = %self.path.display(), entries = all.len(), "saved snapshot");
        Ok(())
    }

    fn read_all(&self) -> HashMap<String, Snapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return HashMap::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read snapshots");
                return HashMap::new();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|err| {
            tracing::warn!(path = %self.path.display(), error = %err, "failed to parse snapshots");
            HashMap::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderStatus, PaymentType};

    fn orders() -> RecordSet {
        RecordSet::Orders(vec![Order {
            order_id: "ORD-1".into(),
            seller_id: "SLR-1".into(),
            customer_name: "Asha".into(),
            order_date: "2024-03-02".into(),
            status: OrderStatus::Shipped,
            payment_type: PaymentType::Cod,
            items: 2,
            order_amount: "₹1,499".into(),
        }])
    }

    #[test]
    fn snapshots_survive_a_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::at(dir.path().join("nested").join(SNAPSHOT_FILENAME));

        store
            .save("orders", Snapshot::new(orders(), SystemTime::now()))
            .expect("save");

        let reopened = SnapshotStore::at(dir.path().join("nested").join(SNAPSHOT_FILENAME));
        let snapshot = reopened.load("orders").expect("snapshot");
        assert_eq!(snapshot.records, orders());
        assert!(reopened.load("shipments").is_none());
    }

    #[test]
    fn concurrent_saves_keep_every_table() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SnapshotStore::at(dir.path().join(SNAPSHOT_FILENAME));
        let keys: Vec<String> = (0..8).map(|n| format!("table-{n}")).collect();

        std::thread::scope(|scope| {
            for key in &keys {
                let store = store.clone();
                scope.spawn(move || {
                    store
                        .save(key, Snapshot::new(orders(), SystemTime::now()))
                        .expect("save");
                });
            }
        });

        for key in &keys {
            assert!(store.load(key).is_some(), "{key} was lost");
        }
        assert!(!dir.path().join("snapshots.json.tmp").exists());
    }

    #[test]
    fn expired_and_corrupt_snapshots_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(SNAPSHOT_FILENAME);
        let store = SnapshotStore::at(&path);

        let old = SystemTime::now() - SNAPSHOT_TTL - Duration::from_secs(60);
        let mut all = HashMap::new();
        all.insert("orders".to_string(), Snapshot::new(orders(), old));
        fs::write(&path, serde_json::to_string(&all).expect("json")).expect("write");
        assert!(store.load("orders").is_none());

        fs::write(&path, "{not json").expect("write");
        assert!(store.load("orders").is_none());
    }
}
