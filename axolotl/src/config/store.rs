//! Shared, serialized access to the configuration file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tracing::{info, warn};

use super::{AxolotlConfig, ConfigResult, PackReference};

/// Ordering token for a publish.
///
/// Tickets are issued when an upload starts. A completion only updates the
/// pack reference if its ticket is newer than the last one applied, so
/// uploads finishing out of order cannot roll the reference back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublishTicket(u64);

impl PublishTicket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct StoreState {
    config: AxolotlConfig,
    applied: u64,
}

/// The loaded configuration plus the file it persists to.
///
/// Every pack reference update holds the lock across modify and save.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    state: Mutex<StoreState>,
    next_ticket: AtomicU64,
}

impl ConfigStore {
    /// Load the configuration at `path`.
    pub fn open(path: impl Into<PathBuf>) -> ConfigResult<Self> {
        let path = path.into();
        let config = AxolotlConfig::load(&path)?;
        Ok(Self::new(path, config))
    }

    /// Wrap an already loaded configuration.
    pub fn new(path: impl Into<PathBuf>, config: AxolotlConfig) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(StoreState { config, applied: 0 }),
            next_ticket: AtomicU64::new(1),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current configuration.
    pub fn snapshot(&self) -> AxolotlConfig {
        self.state.lock().config.clone()
    }

    /// Reserve the ordering slot for a new publish.
    pub fn issue_ticket(&self) -> PublishTicket {
        PublishTicket(self.next_ticket.fetch_add(1, Ordering::SeqCst))
    }

    /// Persist `reference` if `ticket` is newer than the last applied one.
    ///
    /// Returns `Ok(false)` when the update was stale and skipped. On a write
    /// failure the in-memory configuration is left unchanged.
    pub fn apply_pack_reference(
        &self,
        ticket: PublishTicket,
        reference: &PackReference,
    ) -> ConfigResult<bool> {
        let mut state = self.state.lock();
        if ticket.0 <= state.applied {
            warn!(
                ticket = ticket.0,
                applied = state.applied,
                "Discarding pack reference from an older publish"
            );
            return Ok(false);
        }

        let mut updated = state.config.clone();
        updated.set_pack_reference(reference);
        updated.save(&self.path)?;

        state.config = updated;
        state.applied = ticket.0;
        info!(url = %reference.url, hash = %reference.hash, "Pack reference updated");
        Ok(true)
    }

    /// Persist `reference` unconditionally as the newest update.
    pub fn update_pack_reference(&self, reference: &PackReference) -> ConfigResult<()> {
        let ticket = self.issue_ticket();
        self.apply_pack_reference(ticket, reference).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use tempfile::TempDir;

    fn reference(hash: &str) -> PackReference {
        PackReference {
            url: format!("https://bucket.example/api/pack?hash={}", hash),
            hash: hash.to_string(),
        }
    }

    fn store(temp: &TempDir) -> ConfigStore {
        let path = temp.path().join("config.json");
        AxolotlConfig::default().save(&path).unwrap();
        ConfigStore::open(path).unwrap()
    }

    #[test]
    fn test_update_persists_to_disk() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        store.update_pack_reference(&reference("abc123")).unwrap();

        let on_disk = AxolotlConfig::load(store.path()).unwrap();
        assert_eq!(on_disk.hash.as_deref(), Some("abc123"));
        assert_eq!(store.snapshot().pack_reference(), Some(reference("abc123")));
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);

        let older = store.issue_ticket();
        let newer = store.issue_ticket();
        assert!(older < newer);

        assert!(store.apply_pack_reference(newer, &reference("new")).unwrap());
        assert!(!store.apply_pack_reference(older, &reference("old")).unwrap());

        assert_eq!(store.snapshot().hash.as_deref(), Some("new"));
        let on_disk = AxolotlConfig::load(store.path()).unwrap();
        assert_eq!(on_disk.hash.as_deref(), Some("new"));
    }

    #[test]
    fn test_write_failure_leaves_memory_unchanged() {
        let temp = TempDir::new().unwrap();
        let store = ConfigStore::new(
            temp.path().join("missing").join("config.json"),
            AxolotlConfig::default(),
        );

        let err = store.update_pack_reference(&reference("abc")).unwrap_err();
        assert!(matches!(err, ConfigError::WriteFailed { .. }));
        assert!(store.snapshot().hash.is_none());
    }
}
