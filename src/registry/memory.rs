//! In-process binding registry with optional JSON persistence.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::registry::types::{now_millis, WalletBinding};
use crate::registry::{RegistryError, RegistryResult, WalletBindingRegistry};

/// A thread-safe registry keyed by owner address, with a secondary index on
/// the deposit address.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    by_user: Arc<DashMap<Address, WalletBinding>>,
    by_deposit: Arc<DashMap<Address, Address>>,
    persistence_path: Option<PathBuf>,
    /// Serializes snapshot writes so each one sees every committed change.
    write_lock: Arc<Mutex<()>>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new(persistence_path: Option<PathBuf>) -> Self {
        Self {
            by_user: Arc::new(DashMap::new()),
            by_deposit: Arc::new(DashMap::new()),
            persistence_path,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Load from file if it exists; later mutations are written back to it.
    pub fn load_from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let path = path.as_ref();
        let registry = Self::new(Some(path.to_path_buf()));
        if path.exists() {
            let reader = BufReader::new(File::open(path)?);
            let map: HashMap<Address, WalletBinding> = serde_json::from_reader(reader)?;
            for (user, binding) in map {
                registry.by_deposit.insert(binding.flow_edu_address, user);
                registry.by_user.insert(user, binding);
            }
            tracing::info!(count = registry.by_user.len(), "Loaded wallet bindings from file");
        }
        Ok(registry)
    }

    /// Write every binding to the persistence file, if one is configured.
    ///
    /// Writes a sibling temp file and renames it over the target. The file
    /// IO runs on the blocking pool.
    pub async fn save_to_file(&self) -> RegistryResult<()> {
        let Some(path) = self.persistence_path.clone() else {
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        let map: HashMap<_, _> = self
            .by_user
            .iter()
            .map(|r| (*r.key(), r.value().clone()))
            .collect();
        let count = map.len();

        tokio::task::spawn_blocking(move || write_snapshot(&path, &map))
            .await
            .map_err(std::io::Error::other)??;
        tracing::debug!(count, "Saved wallet bindings to file");
        Ok(())
    }

    /// Persist after a mutation that is already visible in memory.
    ///
    /// A failed write is logged, not returned: the change stands and is
    /// picked up by the next successful save.
    async fn persist(&self) {
        if let Err(e) = self.save_to_file().await {
            tracing::error!(error = %e, "Failed to persist wallet bindings");
        }
    }

    /// Number of stored bindings.
    pub fn count(&self) -> usize {
        self.by_user.len()
    }
}

fn write_snapshot(path: &Path, map: &HashMap<Address, WalletBinding>) -> RegistryResult<()> {
    let tmp = path.with_extension("tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, map)?;
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[async_trait]
impl WalletBindingRegistry for InMemoryRegistry {
    async fn create(&self, binding: WalletBinding) -> RegistryResult<()> {
        let user = binding.user_address;
        let deposit = binding.flow_edu_address;

        match self.by_deposit.entry(deposit) {
            Entry::Occupied(_) => return Err(RegistryError::DepositAddressTaken(deposit)),
            Entry::Vacant(slot) => match self.by_user.entry(user) {
                Entry::Occupied(_) => return Err(RegistryError::AlreadyExists(user)),
                Entry::Vacant(user_slot) => {
                    user_slot.insert(binding);
                    slot.insert(user);
                }
            },
        }

        self.persist().await;
        Ok(())
    }

    async fn find_by_user(&self, user: Address) -> RegistryResult<Option<WalletBinding>> {
        Ok(self.by_user.get(&user).map(|r| r.value().clone()))
    }

    async fn find_by_deposit(&self, deposit: Address) -> RegistryResult<Option<WalletBinding>> {
        let Some(user) = self.by_deposit.get(&deposit).map(|r| *r.value()) else {
            return Ok(None);
        };
        self.find_by_user(user).await
    }

    async fn record_signature(
        &self,
        user: Address,
        message: String,
        signature: Bytes,
    ) -> RegistryResult<bool> {
        let updated = match self.by_user.get_mut(&user) {
            Some(mut binding) => {
                binding.message = message;
                binding.signature = Some(signature);
                binding.timestamp = binding.timestamp.max(now_millis());
                true
            }
            None => false,
        };

        if updated {
            self.persist().await;
        }
        Ok(updated)
    }
}
