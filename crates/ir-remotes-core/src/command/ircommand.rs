//! Opaque infra-red control codes and their canonical hex form.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DecodeError;

/// A captured infra-red control code.
///
/// The byte content is opaque: nothing in this crate interprets the
/// waveform data. The canonical external representation is lowercase hex,
/// two digits per byte, which is also the serde form used for
/// persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IrCommand(Vec<u8>);

impl IrCommand {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Canonical lowercase hex encoding. Total: never fails, including
    /// for the empty code.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Decode the canonical hex form. Odd-length strings and non-hex
    /// digits are rejected.
    pub fn from_hex(s: &str) -> Result<Self, DecodeError> {
        Ok(Self(hex::decode(s)?))
    }
}

impl fmt::Display for IrCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Vec<u8>> for IrCommand {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for IrCommand {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl Serialize for IrCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for IrCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        IrCommand::from_hex(&s).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase_hex() {
        let ir = IrCommand::new(vec![1, 10, 16, 32, 42]);
        assert_eq!(ir.to_hex(), "010a10202a");
    }

    #[test]
    fn round_trips_through_hex() {
        let ir = IrCommand::new(vec![0, 1, 0x7f, 0x80, 0xff]);
        assert_eq!(IrCommand::from_hex(&ir.to_hex()).unwrap(), ir);

        let empty = IrCommand::default();
        assert_eq!(empty.to_hex(), "");
        assert_eq!(IrCommand::from_hex("").unwrap(), empty);
    }

    #[test]
    fn rejects_odd_length() {
        assert!(IrCommand::from_hex("12320").is_err());
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(IrCommand::from_hex("01zz").is_err());
        assert!(IrCommand::from_hex("0102 ").is_err());
    }

    #[test]
    fn serde_uses_hex_string() {
        let ir = IrCommand::new(vec![1, 10, 16, 32, 42]);
        let raw = serde_json::to_string(&ir).unwrap();
        assert_eq!(raw, r#""010a10202a""#);

        let back: IrCommand = serde_json::from_str(&raw).unwrap();
        assert_eq!(back, ir);

        assert!(serde_json::from_str::<IrCommand>(r#""12320""#).is_err());
    }
}
