//! Save/load persistence
//!
//! Features:
//! - Whole-state JSON blob under one key, replaced on every save
//! - Seeding on first run
//! - Corruption detection and recovery (reseed)
//! - Two scalar slots: remembered identity token and pending verification
//!
//! Durability is best effort. Write failures are logged and swallowed; the
//! in-memory state stays authoritative for the rest of the session.

use chrono::Utc;

use crate::config::Config;
use crate::error::StorageError;
use crate::model::Database;
use crate::platform::KeyValueStore;

/// Persistence over a key/value backend
#[derive(Debug)]
pub struct Store<S> {
    backend: S,
    state_key: String,
    token_key: String,
    pending_key: String,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S, config: &Config) -> Self {
        Self {
            backend,
            state_key: config.storage_key.clone(),
            token_key: config.auth_token_key.clone(),
            pending_key: config.pending_verification_key.clone(),
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Load the application state, seeding (and persisting the seed) when the
    /// blob is missing, unreadable or corrupt.
    pub fn load(&mut self) -> Database {
        match self.backend.get_item(&self.state_key) {
            Ok(Some(json)) => match serde_json::from_str::<Database>(&json) {
                Ok(db) => {
                    log::info!(
                        "Data loaded from storage ({} accounts, {} departments)",
                        db.accounts.len(),
                        db.departments.len()
                    );
                    return db;
                }
                Err(e) => log::warn!("Stored data is corrupt, reseeding: {}", e),
            },
            Ok(None) => log::info!("No stored data, seeding"),
            Err(e) => log::warn!("Failed to read stored data, reseeding: {}", e),
        }

        let db = Database::seed(Utc::now());
        self.save(&db);
        log::info!("Initial data seeded");
        db
    }

    /// Overwrite the stored blob with `db`.
    pub fn save(&mut self, db: &Database) {
        let json = match serde_json::to_string(db) {
            Ok(json) => json,
            Err(e) => {
                log::error!("Failed to encode data: {}", e);
                return;
            }
        };
        match self.backend.set_item(&self.state_key, &json) {
            Ok(()) => log::debug!("Data saved to storage ({} bytes)", json.len()),
            Err(e) => log::error!("Failed to save data: {}", e),
        }
    }

    /// Email of the account to restore at startup, if any.
    pub fn remembered_identity(&self) -> Option<String> {
        self.read_scalar(&self.token_key)
    }

    pub fn remember_identity(&mut self, email: &str) {
        let key = self.token_key.clone();
        self.write_scalar(&key, Some(email));
    }

    pub fn forget_identity(&mut self) {
        let key = self.token_key.clone();
        self.write_scalar(&key, None);
    }

    /// Email awaiting verification, if any.
    pub fn pending_verification(&self) -> Option<String> {
        self.read_scalar(&self.pending_key)
    }

    pub fn set_pending_verification(&mut self, email: &str) {
        let key = self.pending_key.clone();
        self.write_scalar(&key, Some(email));
    }

    pub fn clear_pending_verification(&mut self) {
        let key = self.pending_key.clone();
        self.write_scalar(&key, None);
    }

    fn read_scalar(&self, key: &str) -> Option<String> {
        match self.backend.get_item(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("Failed to read {}: {}", key, e);
                None
            }
        }
    }

    fn write_scalar(&mut self, key: &str, value: Option<&str>) {
        let result: Result<(), StorageError> = match value {
            Some(value) => self.backend.set_item(key, value),
            None => self.backend.remove_item(key),
        };
        if let Err(e) = result {
            log::error!("Failed to write {}: {}", key, e);
        }
    }
}
