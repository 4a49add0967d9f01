//! Owed token amounts
//!
//! Amounts are arbitrary precision so that summing many partial distributions
//! never overflows. The 256-bit bound only applies when an amount is packed
//! into a merkle leaf.

use crate::{Error, Result};
use alloy_primitives::U256;
use num_bigint::{BigInt, Sign};
use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{self, Serialize, Serializer};
use serde_json::value::RawValue;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

/// Quantity of a token owed to an account
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigInt);

impl Amount {
    /// Width of the big-endian leaf encoding
    pub const ENCODED_LEN: usize = 32;

    pub fn zero() -> Self {
        Amount(BigInt::default())
    }

    /// Parse a base-10 integer, optionally signed.
    ///
    /// Only ASCII digits are accepted after the sign; separators, exponents
    /// and fractions are rejected.
    pub fn parse(text: &str) -> Result<Self> {
        let digits = text.strip_prefix('-').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::MalformedInput(format!(
                "not a valid big integer: {text}"
            )));
        }
        BigInt::from_str(text)
            .map(Amount)
            .map_err(|e| Error::MalformedInput(format!("not a valid big integer: {text}: {e}")))
    }

    /// Parse the raw text of a serialized amount: a bare integer, an integer
    /// in double quotes, or `null`.
    ///
    /// `null` is no value, never zero. Callers that want the zero default
    /// apply it at lookup time.
    pub fn parse_nullable(text: &str) -> Result<Option<Self>> {
        if text == "null" {
            return Ok(None);
        }
        let unquoted = text
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .unwrap_or(text);
        Self::parse(unquoted).map(Some)
    }

    pub fn is_zero(&self) -> bool {
        self.0.sign() == Sign::NoSign
    }

    pub fn is_negative(&self) -> bool {
        self.0.sign() == Sign::Minus
    }

    /// Canonical 32-byte big-endian encoding used in token leaves
    pub fn to_be_bytes32(&self) -> Result<[u8; 32]> {
        if self.is_negative() {
            return Err(Error::Encoding(format!(
                "amount {self} is negative and has no 256-bit encoding"
            )));
        }
        let (_, bytes) = self.0.to_bytes_be();
        if bytes.len() > Self::ENCODED_LEN {
            return Err(Error::Encoding(format!(
                "amount {self} does not fit in 256 bits"
            )));
        }
        let mut out = [0u8; 32];
        out[Self::ENCODED_LEN - bytes.len()..].copy_from_slice(&bytes);
        Ok(out)
    }

    pub fn to_u256(&self) -> Result<U256> {
        self.to_be_bytes32().map(U256::from_be_bytes)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({})", self.0)
    }
}

impl FromStr for Amount {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Amount::parse(s)
    }
}

impl From<BigInt> for Amount {
    fn from(value: BigInt) -> Self {
        Amount(value)
    }
}

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(BigInt::from_bytes_be(
            Sign::Plus,
            &value.to_be_bytes::<32>(),
        ))
    }
}

macro_rules! impl_from_primitive {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Amount {
                fn from(value: $t) -> Self {
                    Amount(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_primitive!(u8, u16, u32, u64, u128, i32, i64, i128);

impl Add<&Amount> for Amount {
    type Output = Amount;

    fn add(self, rhs: &Amount) -> Amount {
        Amount(self.0 + &rhs.0)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        Amount(self.0 + rhs.0)
    }
}

impl AddAssign<&Amount> for Amount {
    fn add_assign(&mut self, rhs: &Amount) {
        self.0 += &rhs.0;
    }
}

// Amounts are written as bare JSON numbers carrying every digit, so the
// document never routes them through a float.
impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let number = serde_json::Number::from_str(&self.to_string()).map_err(ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        match Amount::parse_nullable(raw.get()).map_err(de::Error::custom)? {
            Some(amount) => Ok(amount),
            None => Err(de::Error::custom("amount is null")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Amount::parse("1000").unwrap(), Amount::from(1000u64));
        assert_eq!(Amount::parse("-7").unwrap(), Amount::from(-7i64));
        assert!(Amount::parse("0").unwrap().is_zero());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for bad in ["", "-", "1.5", "1e3", "0x10", "1_000", " 12", "+5", "abc"] {
            assert!(
                matches!(Amount::parse(bad), Err(Error::MalformedInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_null_is_absent_not_zero() {
        assert_eq!(Amount::parse_nullable("null").unwrap(), None);
        assert_eq!(
            Amount::parse_nullable("0").unwrap(),
            Some(Amount::zero())
        );
        assert_eq!(
            Amount::parse_nullable("\"17\"").unwrap(),
            Some(Amount::from(17u8))
        );
        for bad in [" null", " 12", "\"null\"", "\"12", "true"] {
            assert!(Amount::parse_nullable(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_addition_does_not_overflow_256_bits() {
        let max = Amount::from(U256::MAX);
        let sum = max.clone() + &Amount::from(1u8);
        assert_eq!(
            sum.to_string(),
            "115792089237316195423570985008687907853269984665640564039457584007913129639936"
        );
        assert!(matches!(sum.to_be_bytes32(), Err(Error::Encoding(_))));
        assert_eq!(max.to_be_bytes32().unwrap(), [0xff; 32]);
    }

    #[test]
    fn test_be_encoding() {
        let bytes = Amount::from(1000u64).to_be_bytes32().unwrap();
        assert_eq!(&bytes[..30], &[0u8; 30]);
        assert_eq!(&bytes[30..], &[0x03, 0xe8]);
        assert_eq!(Amount::zero().to_be_bytes32().unwrap(), [0u8; 32]);
        assert_eq!(Amount::from(1000u64).to_u256().unwrap(), U256::from(1000u64));
    }

    #[test]
    fn test_negative_cannot_be_encoded() {
        assert!(Amount::from(-1i32).is_negative());
        assert!(!Amount::zero().is_negative());
        assert!(matches!(
            Amount::from(-1i32).to_be_bytes32(),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_json_number_roundtrip_keeps_precision() {
        let text = "123456789012345678901234567890123456789";
        let amount = Amount::parse(text).unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, text);
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_json_accepts_decimal_string_and_null() {
        let a: Amount = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, Amount::from(42u8));

        let none: Option<Amount> = serde_json::from_str("null").unwrap();
        assert!(none.is_none());

        assert!(serde_json::from_str::<Amount>("1.5").is_err());
        assert!(serde_json::from_str::<Amount>("null").is_err());
        assert!(serde_json::from_str::<Amount>("true").is_err());
    }
}
