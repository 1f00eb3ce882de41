//! Fixed-size byte arrays that serialize as lowercase hex strings.
//!
//! The wire format (spec section 6.1) requires every hash, key, and
//! signature to travel as lowercase hex JSON strings rather than byte
//! arrays, so these newtypes carry their own `Serialize`/`Deserialize`
//! instead of deriving the default array behavior.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error decoding a fixed-size hex field.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HexFieldError {
    #[error("expected {expected} hex characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("not valid hex: {0}")]
    InvalidHex(String),
}

macro_rules! hex_array {
    ($name:ident, $len:expr, $hexlen:expr) => {
        #[doc = concat!("A ", stringify!($len), "-byte value, hex-encoded on the wire.")]
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            pub const LEN: usize = $len;
            pub const HEX_LEN: usize = $hexlen;

            pub fn zero() -> Self {
                Self([0u8; $len])
            }

            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; $len]
            }

            pub fn as_bytes(&self) -> &[u8; $len] {
                &self.0
            }

            pub fn from_hex(s: &str) -> Result<Self, HexFieldError> {
                if s.len() != $hexlen {
                    return Err(HexFieldError::WrongLength {
                        expected: $hexlen,
                        actual: s.len(),
                    });
                }
                let bytes =
                    hex::decode(s).map_err(|e| HexFieldError::InvalidHex(e.to_string()))?;
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.to_hex())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = HexFieldError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Self::from_hex(&s).map_err(DeError::custom)
            }
        }
    };
}

hex_array!(Hash32, 32, 64);
hex_array!(PubKey32, 32, 64);
hex_array!(Sig64, 64, 128);
