//! Domain registry implementation
//!
//! Maps labels under a fixed namespace (e.g. `smart.mango`) to their owning
//! account and a free-form text record. Registration is fee-gated; the
//! accumulated fees stay in the registry until the administrator withdraws
//! them.

use crate::config::{ConfigError, RegistryConfig};
use crate::errors::*;
use crate::events::{EventSink, NoopEventSink, RegistryEvent};
use crate::types::*;
use domains_types::{AccountId, Amount};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Mutable registry state. Every operation holds the lock for its whole
/// check-then-write sequence, so no caller can observe a half-applied
/// transition.
#[derive(Debug, Default)]
struct RegistryState {
    /// Label → record
    records: HashMap<String, DomainRecord>,
    /// Labels in registration order
    order: Vec<String>,
    /// Owner → labels they registered
    owner_to_labels: HashMap<AccountId, Vec<String>>,
    /// Accepted payments minus withdrawals
    balance: Amount,
}

/// Fee-gated name registry
pub struct DomainRegistry {
    namespace: String,
    min_price: Amount,
    administrator: AccountId,
    rules: LabelRules,
    state: RwLock<RegistryState>,
    events: Arc<dyn EventSink>,
}

impl DomainRegistry {
    /// Create a registry that discards events
    pub fn new(config: RegistryConfig) -> std::result::Result<Self, ConfigError> {
        Self::with_event_sink(config, Arc::new(NoopEventSink))
    }

    /// Create a registry publishing events to `events`
    pub fn with_event_sink(
        config: RegistryConfig,
        events: Arc<dyn EventSink>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let rules = config.label_rules();

        info!(
            target: "registry",
            namespace = %config.namespace,
            min_price = %config.min_price,
            administrator = %config.administrator,
            "Domain registry initialised"
        );

        Ok(Self {
            namespace: config.namespace,
            min_price: config.min_price,
            administrator: config.administrator,
            rules,
            state: RwLock::new(RegistryState::default()),
            events,
        })
    }

    /// Register `label` for `caller`, paying `payment`.
    pub fn register(
        &self,
        caller: &AccountId,
        label: &str,
        payment: Amount,
    ) -> Result<DomainRecord> {
        if let Err(err) = self.rules.validate(label) {
            debug!(target: "registry", %label, error = %err, "Rejected registration");
            return Err(err);
        }

        let mut state = self.state.write();

        if state.records.contains_key(label) {
            debug!(target: "registry", %label, "Rejected registration: label taken");
            return Err(RegistryError::AlreadyRegistered {
                label: label.to_string(),
            });
        }

        if payment < self.min_price {
            debug!(
                target: "registry",
                %label,
                %payment,
                min_price = %self.min_price,
                "Rejected registration: payment below floor"
            );
            return Err(RegistryError::InsufficientPayment {
                required: self.min_price,
                offered: payment,
            });
        }

        let balance = state
            .balance
            .checked_add(payment)
            .ok_or(RegistryError::BalanceOverflow { payment })?;

        let record = DomainRecord {
            label: label.to_string(),
            owner: *caller,
            data: String::new(),
            registered_at: state.order.len() as u64,
        };

        state.records.insert(record.label.clone(), record.clone());
        state.order.push(record.label.clone());
        state
            .owner_to_labels
            .entry(*caller)
            .or_default()
            .push(record.label.clone());
        state.balance = balance;

        info!(
            target: "registry",
            name = %record.full_name(&self.namespace),
            owner = %caller,
            %payment,
            %balance,
            "Registered domain"
        );

        self.events.emit(&RegistryEvent::Registered {
            label: record.label.clone(),
            owner: *caller,
            payment,
        });

        Ok(record)
    }

    /// Replace the text record of `label`. Only its owner may do this.
    pub fn set_record(&self, caller: &AccountId, label: &str, data: impl Into<String>) -> Result<()> {
        let mut state = self.state.write();

        let record = state
            .records
            .get_mut(label)
            .ok_or_else(|| RegistryError::NotRegistered {
                label: label.to_string(),
            })?;

        if record.owner != *caller {
            debug!(target: "registry", %label, %caller, "Rejected record update: not owner");
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                action: format!("set the record of {}", label),
            });
        }

        record.data = data.into();

        info!(target: "registry", %label, bytes = record.data.len(), "Updated record");

        self.events.emit(&RegistryEvent::RecordUpdated {
            label: label.to_string(),
        });

        Ok(())
    }

    /// Withdraw `amount` from the accumulated balance. Administrator only.
    pub fn withdraw(&self, caller: &AccountId, amount: Amount) -> Result<Amount> {
        let mut state = self.state.write();
        self.withdraw_locked(&mut state, caller, amount)
    }

    /// Withdraw the entire accumulated balance. Administrator only.
    pub fn withdraw_all(&self, caller: &AccountId) -> Result<Amount> {
        let mut state = self.state.write();
        let amount = state.balance;
        self.withdraw_locked(&mut state, caller, amount)
    }

    fn withdraw_locked(
        &self,
        state: &mut RegistryState,
        caller: &AccountId,
        amount: Amount,
    ) -> Result<Amount> {
        if *caller != self.administrator {
            debug!(target: "registry", %caller, "Rejected withdrawal: not administrator");
            return Err(RegistryError::Unauthorized {
                caller: *caller,
                action: "withdraw registry funds".into(),
            });
        }

        let remaining =
            state
                .balance
                .checked_sub(amount)
                .ok_or(RegistryError::InsufficientBalance {
                    requested: amount,
                    available: state.balance,
                })?;
        state.balance = remaining;

        info!(target: "registry", %amount, %remaining, "Withdrew registry funds");

        self.events.emit(&RegistryEvent::Withdrawn {
            to: *caller,
            amount,
        });

        Ok(amount)
    }

    /// Text record of `label`
    pub fn get_record(&self, label: &str) -> Result<String> {
        self.with_record(label, |record| record.data.clone())
    }

    /// Owner of `label`
    pub fn get_owner(&self, label: &str) -> Result<AccountId> {
        self.with_record(label, |record| record.owner)
    }

    /// Full record of `label`
    pub fn get_domain(&self, label: &str) -> Result<DomainRecord> {
        self.with_record(label, DomainRecord::clone)
    }

    /// Funds currently held by the registry
    pub fn get_balance(&self) -> Amount {
        self.state.read().balance
    }

    /// Whether `label` is well-formed and not yet taken
    pub fn is_available(&self, label: &str) -> bool {
        self.rules.is_valid(label) && !self.state.read().records.contains_key(label)
    }

    /// All registered labels in registration order
    pub fn all_labels(&self) -> Vec<String> {
        self.state.read().order.clone()
    }

    /// Labels registered by `owner`
    pub fn labels_of(&self, owner: &AccountId) -> Vec<String> {
        self.state
            .read()
            .owner_to_labels
            .get(owner)
            .cloned()
            .unwrap_or_default()
    }

    pub fn total_registered(&self) -> u64 {
        self.state.read().order.len() as u64
    }

    /// `label.namespace`
    pub fn full_name(&self, label: &str) -> String {
        format!("{}.{}", label, self.namespace)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn min_price(&self) -> Amount {
        self.min_price
    }

    pub fn administrator(&self) -> &AccountId {
        &self.administrator
    }

    pub fn label_rules(&self) -> LabelRules {
        self.rules
    }

    /// Consistent copy of the full state
    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.state.read();
        let records = state
            .order
            .iter()
            .filter_map(|label| state.records.get(label).cloned())
            .collect();

        RegistrySnapshot {
            namespace: self.namespace.clone(),
            min_price: self.min_price,
            administrator: self.administrator,
            balance: state.balance,
            total_registered: state.order.len() as u64,
            records,
        }
    }

    fn with_record<T>(&self, label: &str, f: impl FnOnce(&DomainRecord) -> T) -> Result<T> {
        let state = self.state.read();
        state
            .records
            .get(label)
            .map(f)
            .ok_or_else(|| RegistryError::NotRegistered {
                label: label.to_string(),
            })
    }
}

impl fmt::Debug for DomainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainRegistry")
            .field("namespace", &self.namespace)
            .field("min_price", &self.min_price)
            .field("administrator", &self.administrator)
            .field("rules", &self.rules)
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}
