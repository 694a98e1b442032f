//! Read-only ledger accessor
//!
//! External callers that only need balances and ownership get a
//! [`ReadOnlyLedger`], which cannot reach the mutating operations.

use crate::errors::*;
use crate::registry::DomainRegistry;
use crate::types::DomainRecord;
use domains_types::{AccountId, Amount};
use std::sync::Arc;

/// Query surface of the registry. Nothing here mutates state.
pub trait LedgerView: Send + Sync {
    fn namespace(&self) -> &str;

    fn get_record(&self, label: &str) -> Result<String>;

    fn get_owner(&self, label: &str) -> Result<AccountId>;

    fn get_domain(&self, label: &str) -> Result<DomainRecord>;

    fn get_balance(&self) -> Amount;

    fn is_available(&self, label: &str) -> bool;

    fn all_labels(&self) -> Vec<String>;
}

impl LedgerView for DomainRegistry {
    fn namespace(&self) -> &str {
        DomainRegistry::namespace(self)
    }

    fn get_record(&self, label: &str) -> Result<String> {
        DomainRegistry::get_record(self, label)
    }

    fn get_owner(&self, label: &str) -> Result<AccountId> {
        DomainRegistry::get_owner(self, label)
    }

    fn get_domain(&self, label: &str) -> Result<DomainRecord> {
        DomainRegistry::get_domain(self, label)
    }

    fn get_balance(&self) -> Amount {
        DomainRegistry::get_balance(self)
    }

    fn is_available(&self, label: &str) -> bool {
        DomainRegistry::is_available(self, label)
    }

    fn all_labels(&self) -> Vec<String> {
        DomainRegistry::all_labels(self)
    }
}

/// Shared, read-only handle onto a registry.
#[derive(Debug, Clone)]
pub struct ReadOnlyLedger {
    registry: Arc<DomainRegistry>,
}

impl ReadOnlyLedger {
    pub fn new(registry: Arc<DomainRegistry>) -> Self {
        Self { registry }
    }
}

impl LedgerView for ReadOnlyLedger {
    fn namespace(&self) -> &str {
        self.registry.namespace()
    }

    fn get_record(&self, label: &str) -> Result<String> {
        self.registry.get_record(label)
    }

    fn get_owner(&self, label: &str) -> Result<AccountId> {
        self.registry.get_owner(label)
    }

    fn get_domain(&self, label: &str) -> Result<DomainRecord> {
        self.registry.get_domain(label)
    }

    fn get_balance(&self) -> Amount {
        self.registry.get_balance()
    }

    fn is_available(&self, label: &str) -> bool {
        self.registry.is_available(label)
    }

    fn all_labels(&self) -> Vec<String> {
        self.registry.all_labels()
    }
}
