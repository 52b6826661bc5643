//! Identifiers used throughout zionex.
//!
//! Accounts and token contracts are both named by a 20-byte [`Address`].
//! Orders use a sequential [`OrderId`] allocated by the order book.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ExchangeError;

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account or contract address.
///
/// Displayed and parsed as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Address whose every byte is `byte`. Handy for fixed test accounts.
    #[must_use]
    pub const fn repeat_byte(byte: u8) -> Self {
        Self([byte; 20])
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// First four bytes as hex, for compact log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits)
            .map_err(|e| ExchangeError::Serialization(format!("invalid address {s}: {e}")))?;
        let bytes: [u8; 20] = bytes.try_into().map_err(|v: Vec<u8>| {
            ExchangeError::Serialization(format!(
                "invalid address {s}: expected 20 bytes, got {}",
                v.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    /// Random non-zero address.
    pub fn random() -> Self {
        loop {
            let bytes: [u8; 20] = rand::random();
            if bytes != [0u8; 20] {
                return Self(bytes);
            }
        }
    }
}

/// An account holding balances on the exchange.
pub type AccountId = Address;

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Identifies an asset custodied by the ledger.
///
/// [`AssetId::NATIVE`] (the zero address) denotes the native asset. Every
/// other value is the address of a fungible-token collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub Address);

impl AssetId {
    /// Reserved sentinel for the native asset.
    pub const NATIVE: Self = Self(Address::ZERO);

    #[must_use]
    pub const fn token(address: Address) -> Self {
        Self(address)
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        self.0.is_zero()
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "native")
        } else {
            write!(f, "token:{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Sequential order identifier. The first order ever created is `1`;
/// ids are never reused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub u64);

impl OrderId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_display_is_prefixed_hex() {
        let addr = Address::repeat_byte(0xab);
        let s = addr.to_string();
        assert!(s.starts_with("0xabab"));
        assert_eq!(s.len(), 42);
    }

    #[test]
    fn address_parse_accepts_with_and_without_prefix() {
        let addr = Address::repeat_byte(0x11);
        let with: Address = addr.to_string().parse().unwrap();
        let without: Address = hex::encode(addr.0).parse().unwrap();
        assert_eq!(with, addr);
        assert_eq!(without, addr);
    }

    #[test]
    fn address_parse_rejects_wrong_length() {
        let err = "0x1234".parse::<Address>().unwrap_err();
        assert!(matches!(err, ExchangeError::Serialization(_)));
        assert!(err.to_string().contains("expected 20 bytes"));
    }

    #[test]
    fn native_asset_is_zero_address() {
        assert!(AssetId::NATIVE.is_native());
        assert_eq!(AssetId::NATIVE.address(), Address::ZERO);
        assert!(!AssetId::token(Address::random()).is_native());
        assert_eq!(AssetId::NATIVE.to_string(), "native");
    }

    #[test]
    fn order_id_next() {
        assert_eq!(OrderId(5).next(), OrderId(6));
        assert_eq!(OrderId(1).to_string(), "order:1");
    }

    #[test]
    fn asset_id_serializes_as_plain_address() {
        let asset = AssetId::token(Address::repeat_byte(0x01));
        let json = serde_json::to_string(&asset).unwrap();
        assert_eq!(json, format!("\"{}\"", Address::repeat_byte(0x01)));
        let back: AssetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, asset);
    }
}
