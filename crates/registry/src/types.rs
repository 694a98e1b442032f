//! Types for the domain registry

use crate::errors::*;
use domains_types::{AccountId, Amount};
use serde::{Deserialize, Serialize};

/// Default shortest accepted label.
pub const DEFAULT_MIN_LABEL_LEN: usize = 3;
/// Default longest accepted label.
pub const DEFAULT_MAX_LABEL_LEN: usize = 10;

/// Naming rules applied to labels before registration.
///
/// A label is lowercase ASCII letters, digits and `-`, never starts or ends
/// with `-`, and its length lies in `min_len..=max_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRules {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            min_len: DEFAULT_MIN_LABEL_LEN,
            max_len: DEFAULT_MAX_LABEL_LEN,
        }
    }
}

impl LabelRules {
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// Validate label format
    pub fn validate(&self, label: &str) -> Result<()> {
        let invalid = |reason: String| RegistryError::InvalidLabel {
            label: label.to_string(),
            reason,
        };

        if label.is_empty() {
            return Err(invalid("label is empty".into()));
        }

        let len = label.chars().count();
        if len < self.min_len || len > self.max_len {
            return Err(invalid(format!(
                "length {} outside {}..={}",
                len, self.min_len, self.max_len
            )));
        }

        if let Some(c) = label
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(invalid(format!("character '{}' is not allowed", c)));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("label may not start or end with '-'".into()));
        }

        Ok(())
    }

    pub fn is_valid(&self, label: &str) -> bool {
        self.validate(label).is_ok()
    }
}

/// One registered label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// Label under the registry namespace
    pub label: String,
    /// Account that registered the label
    pub owner: AccountId,
    /// Free-form text record, empty until the owner sets one
    pub data: String,
    /// Registration sequence number, starting at 0
    pub registered_at: u64,
}

impl DomainRecord {
    /// Fully-qualified name, e.g. `smart.mango`
    pub fn full_name(&self, namespace: &str) -> String {
        format!("{}.{}", self.label, namespace)
    }
}

/// Point-in-time copy of the whole registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub namespace: String,
    pub min_price: Amount,
    pub administrator: AccountId,
    pub balance: Amount,
    pub total_registered: u64,
    /// Records in registration order
    pub records: Vec<DomainRecord>,
}
