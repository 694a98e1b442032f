//! Batch call scripts
//!
//! A script is a JSON document listing registry calls in the order they are
//! applied:
//!
//! ```json
//! { "calls": [
//!     { "caller": "alice", "op": "register", "label": "smart", "payment": "0.1" },
//!     { "caller": "alice", "op": "set_record", "label": "smart", "data": "A very studious fruit" },
//!     { "caller": "bob", "op": "get_owner", "label": "smart" }
//! ] }
//! ```
//!
//! `caller` is either an `i`-prefixed account id or a seed name that is
//! hashed into one.

use domains_registry::{AccountId, Amount, DomainRegistry, RegistryError};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    pub calls: Vec<ScriptCall>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScriptCall {
    pub caller: String,
    #[serde(flatten)]
    pub op: Operation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Register { label: String, payment: Amount },
    SetRecord { label: String, data: String },
    GetRecord { label: String },
    GetOwner { label: String },
    GetBalance,
    Withdraw { amount: Amount },
    WithdrawAll,
}

/// Result of one applied call.
#[derive(Debug, Clone, Serialize)]
pub struct CallOutcome {
    pub index: usize,
    pub caller: AccountId,
    #[serde(flatten)]
    pub op: Operation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CallOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Map a script caller to an account id.
pub fn resolve_caller(caller: &str) -> AccountId {
    caller
        .parse()
        .unwrap_or_else(|_| AccountId::derive(caller))
}

/// Apply every call in order. Rejected calls are reported, not fatal.
pub fn run_script(registry: &DomainRegistry, script: &Script) -> Vec<CallOutcome> {
    script
        .calls
        .iter()
        .enumerate()
        .map(|(index, call)| {
            let caller = resolve_caller(&call.caller);
            let result = apply(registry, &caller, &call.op);
            if let Err(err) = &result {
                debug!(target: "script", index, error = %err, "Call rejected");
            }

            let (ok, error) = match result {
                Ok(value) => (Some(value), None),
                Err(err) => (None, Some(err.to_string())),
            };

            CallOutcome {
                index,
                caller,
                op: call.op.clone(),
                ok,
                error,
            }
        })
        .collect()
}

fn apply(
    registry: &DomainRegistry,
    caller: &AccountId,
    op: &Operation,
) -> Result<Value, RegistryError> {
    let value = match op {
        Operation::Register { label, payment } => {
            json!(registry.register(caller, label, *payment)?)
        }
        Operation::SetRecord { label, data } => {
            registry.set_record(caller, label, data.as_str())?;
            Value::Null
        }
        Operation::GetRecord { label } => json!(registry.get_record(label)?),
        Operation::GetOwner { label } => json!(registry.get_owner(label)?),
        Operation::GetBalance => json!(registry.get_balance()),
        Operation::Withdraw { amount } => json!(registry.withdraw(caller, *amount)?),
        Operation::WithdrawAll => json!(registry.withdraw_all(caller)?),
    };
    Ok(value)
}
