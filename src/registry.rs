// src/registry.rs

//! Installation registry.
//!
//! An explicit store handed to the publish step, holding an immutable
//! snapshot of the configured installations. Writers publish a whole new
//! snapshot; readers keep whatever snapshot they already hold.

use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::config::{ConfigFile, PublisherInstallation};

#[derive(Debug, Default)]
pub struct InstallationRegistry {
    snapshot: RwLock<Arc<[PublisherInstallation]>>,
}

impl InstallationRegistry {
    pub fn new(installations: Vec<PublisherInstallation>) -> Self {
        Self {
            snapshot: RwLock::new(installations.into()),
        }
    }

    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::new(cfg.installations().to_vec())
    }

    /// Current snapshot, in configuration order.
    pub fn installations(&self) -> Arc<[PublisherInstallation]> {
        match self.snapshot.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Replace the registry contents with a new snapshot.
    ///
    /// Name uniqueness is the caller's responsibility; configuration loading
    /// already rejects duplicates.
    pub fn set_installations(&self, installations: Vec<PublisherInstallation>) {
        let next: Arc<[PublisherInstallation]> = installations.into();
        debug!(count = next.len(), "publishing new installation snapshot");
        match self.snapshot.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// First installation whose name equals `name` exactly.
    pub fn find(&self, name: &str) -> Option<PublisherInstallation> {
        self.installations()
            .iter()
            .find(|inst| inst.name == name)
            .cloned()
    }
}
