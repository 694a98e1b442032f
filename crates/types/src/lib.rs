//! Shared primitive types for the domain name registry.

pub mod account;
pub mod amount;

pub use account::*;
pub use amount::*;
