//! Domain name registry
//!
//! Callers register labels under a fixed namespace (e.g. `smart.mango`) by
//! paying at least the configured minimum price, become the label's owner,
//! and may attach a free-form text record to it. Anyone may resolve a label
//! to its owner or read its record. Registration fees accumulate in the
//! registry until the administrator withdraws them.

pub mod config;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod registry;
pub mod resolution;
pub mod types;

pub use self::config::{ConfigError, RegistryConfig};
pub use errors::*;
pub use events::*;
pub use ledger::{LedgerView, ReadOnlyLedger};
pub use registry::DomainRegistry;
pub use resolution::DomainResolver;
pub use types::*;

pub use domains_types::{AccountId, Amount};
