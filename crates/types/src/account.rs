use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when parsing an account identifier string.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccountIdError {
    #[error("account id must start with 'i'")]
    InvalidPrefix,
    #[error("account id must be {expected} characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("account id payload is not valid hexadecimal")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Number of raw bytes contained in an account identifier.
pub const ACCOUNT_ID_BYTES: usize = 32;
/// Expected string length of an encoded account id (prefix + 64 hex chars).
pub const ACCOUNT_ID_STRING_LENGTH: usize = 1 + ACCOUNT_ID_BYTES * 2;

/// Stable identifier of a caller.
///
/// The registry treats it as opaque and unforgeable; whoever hosts the
/// registry is responsible for authenticating callers before handing one in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(pub [u8; ACCOUNT_ID_BYTES]);

impl AccountId {
    pub fn new(bytes: [u8; ACCOUNT_ID_BYTES]) -> Self {
        Self(bytes)
    }

    /// Deterministically derive an account id from a seed string.
    pub fn derive(seed: &str) -> Self {
        Self(*blake3::hash(seed.as_bytes()).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_BYTES] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = AccountIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(payload) = s.strip_prefix('i') else {
            return Err(AccountIdError::InvalidPrefix);
        };

        if s.len() != ACCOUNT_ID_STRING_LENGTH {
            return Err(AccountIdError::InvalidLength {
                expected: ACCOUNT_ID_STRING_LENGTH,
                actual: s.len(),
            });
        }

        let mut bytes = [0u8; ACCOUNT_ID_BYTES];
        hex::decode_to_slice(payload, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl From<[u8; ACCOUNT_ID_BYTES]> for AccountId {
    fn from(value: [u8; ACCOUNT_ID_BYTES]) -> Self {
        AccountId(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        let id = AccountId::new([0xAB; ACCOUNT_ID_BYTES]);
        let encoded = id.to_string();
        assert!(encoded.starts_with('i'));
        assert_eq!(encoded.len(), ACCOUNT_ID_STRING_LENGTH);
        assert_eq!(encoded.parse::<AccountId>().unwrap(), id);
    }

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(AccountId::derive("alice"), AccountId::derive("alice"));
        assert_ne!(AccountId::derive("alice"), AccountId::derive("bob"));
    }

    #[test]
    fn invalid_prefix_rejected() {
        let bad = "x".to_string() + &"00".repeat(ACCOUNT_ID_BYTES);
        assert_eq!(bad.parse::<AccountId>(), Err(AccountIdError::InvalidPrefix));
    }

    #[test]
    fn invalid_length_rejected() {
        let bad = "i".to_string() + &"00".repeat(ACCOUNT_ID_BYTES - 1);
        let err = bad.parse::<AccountId>().unwrap_err();
        assert!(matches!(err, AccountIdError::InvalidLength { .. }));
    }

    #[test]
    fn invalid_hex_rejected() {
        let bad = format!("i{}", "gg".repeat(ACCOUNT_ID_BYTES));
        let err = bad.parse::<AccountId>().unwrap_err();
        assert!(matches!(err, AccountIdError::InvalidHex(_)));
    }
}
