//! Error types for the domain registry

use domains_types::{AccountId, Amount};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: String },

    #[error("Label already registered: {label}")]
    AlreadyRegistered { label: String },

    #[error("Insufficient payment: {offered} offered, {required} required")]
    InsufficientPayment { required: Amount, offered: Amount },

    #[error("Label not registered: {label}")]
    NotRegistered { label: String },

    #[error("Unauthorized: {caller} may not {action}")]
    Unauthorized { caller: AccountId, action: String },

    #[error("Insufficient balance: {requested} requested, {available} available")]
    InsufficientBalance { requested: Amount, available: Amount },

    #[error("Balance overflow while crediting {payment}")]
    BalanceOverflow { payment: Amount },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
