//! Cached name resolution on top of a [`LedgerView`]

use crate::errors::*;
use crate::ledger::LedgerView;
use domains_types::AccountId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Default lifetime of a cached owner lookup.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Resolves labels and fully-qualified names to owners.
///
/// Owners never change after registration, so cached owners stay correct
/// for as long as the entry lives. Text records are always read through.
#[derive(Clone)]
pub struct DomainResolver {
    ledger: Arc<dyn LedgerView>,
    cache: Arc<RwLock<HashMap<String, (AccountId, Instant)>>>,
    cache_ttl: Duration,
}

impl DomainResolver {
    pub fn new(ledger: Arc<dyn LedgerView>) -> Self {
        Self::with_ttl(ledger, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(ledger: Arc<dyn LedgerView>, cache_ttl: Duration) -> Self {
        Self {
            ledger,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl,
        }
    }

    /// Resolve a label to its owner, consulting the cache first
    pub async fn resolve(&self, label: &str) -> Result<AccountId> {
        if let Some(owner) = self.get_from_cache(label) {
            debug!(target: "resolver", %label, "Cache hit");
            return Ok(owner);
        }

        let owner = self.ledger.get_owner(label)?;
        self.store_in_cache(label, owner);
        Ok(owner)
    }

    /// Resolve `label.namespace`; the namespace must match the ledger's.
    pub async fn resolve_name(&self, name: &str) -> Result<AccountId> {
        let label = self.split_name(name)?;
        self.resolve(label).await
    }

    /// Resolve several labels concurrently
    pub async fn resolve_batch(&self, labels: &[String]) -> HashMap<String, Result<AccountId>> {
        let lookups = labels.iter().map(|label| async move {
            let result = self.resolve(label).await;
            (label.clone(), result)
        });

        futures::future::join_all(lookups).await.into_iter().collect()
    }

    /// Text record of a label, never cached
    pub async fn get_record(&self, label: &str) -> Result<String> {
        self.ledger.get_record(label)
    }

    pub fn clear_cache(&self) {
        self.cache.write().clear();
    }

    /// Number of cached entries and their lifetime
    pub fn cache_stats(&self) -> (usize, Duration) {
        (self.cache.read().len(), self.cache_ttl)
    }

    fn split_name<'a>(&self, name: &'a str) -> Result<&'a str> {
        let namespace = self.ledger.namespace();
        name.strip_suffix(namespace)
            .and_then(|rest| rest.strip_suffix('.'))
            .filter(|label| !label.is_empty())
            .ok_or_else(|| RegistryError::InvalidLabel {
                label: name.to_string(),
                reason: format!("name is not under namespace '{}'", namespace),
            })
    }

    fn get_from_cache(&self, label: &str) -> Option<AccountId> {
        let cache = self.cache.read();
        cache
            .get(label)
            .filter(|(_, stored_at)| stored_at.elapsed() < self.cache_ttl)
            .map(|(owner, _)| *owner)
    }

    fn store_in_cache(&self, label: &str, owner: AccountId) {
        self.cache
            .write()
            .insert(label.to_string(), (owner, Instant::now()));
    }
}

impl std::fmt::Debug for DomainResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainResolver")
            .field("namespace", &self.ledger.namespace())
            .field("cache_ttl", &self.cache_ttl)
            .finish_non_exhaustive()
    }
}
