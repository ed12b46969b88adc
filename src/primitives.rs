use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
	#[error("invalid hex string '{0}'")]
	InvalidHex(String),

	#[error("expected {expected} bytes, got {actual}")]
	InvalidLength { expected: usize, actual: usize },

	#[error("invalid amount '{0}'")]
	InvalidAmount(String),
}

// -- Fixed-width hashes --

/// Generates a little-endian hash type whose text form is the reversed
/// (big-endian) hex string used by explorers and RPC nodes.
macro_rules! uint_type {
	($(#[$meta:meta])* $name:ident, $len:expr) => {
		$(#[$meta])*
		#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
		pub struct $name([u8; $len]);

		impl $name {
			pub const LEN: usize = $len;

			/// Wrap bytes already in little-endian (wire) order.
			pub const fn from_le_bytes(bytes: [u8; $len]) -> Self {
				Self(bytes)
			}

			/// Parse the big-endian display form, with or without `0x`.
			pub fn from_display_hex(s: &str) -> Result<Self, PrimitiveError> {
				let clean = s.strip_prefix("0x").unwrap_or(s);
				let mut bytes = hex::decode(clean)
					.map_err(|_| PrimitiveError::InvalidHex(s.to_owned()))?;
				if bytes.len() != $len {
					return Err(PrimitiveError::InvalidLength {
						expected: $len,
						actual: bytes.len(),
					});
				}
				bytes.reverse();
				let mut out = [0u8; $len];
				out.copy_from_slice(&bytes);
				Ok(Self(out))
			}

			/// Little-endian (wire) bytes.
			pub fn as_bytes(&self) -> &[u8; $len] {
				&self.0
			}

			/// Hex of the little-endian bytes.
			pub fn to_le_hex(&self) -> String {
				hex::encode(self.0)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				let mut be = self.0;
				be.reverse();
				f.write_str(&hex::encode(be))
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}({})", stringify!($name), self)
			}
		}

		impl FromStr for $name {
			type Err = PrimitiveError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::from_display_hex(s)
			}
		}

		impl Serialize for $name {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				serializer.collect_str(self)
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				let s = String::deserialize(deserializer)?;
				Self::from_display_hex(&s).map_err(de::Error::custom)
			}
		}
	};
}

uint_type!(
	/// A 160-bit script hash (contract or account).
	UInt160,
	20
);

uint_type!(
	/// A 256-bit hash: transaction ids and asset ids.
	UInt256,
	32
);

// -- Fixed8 amounts --

const FIXED8_FACTOR: i64 = 100_000_000;

/// Asset amount with eight decimal places, stored as an integer count of
/// the smallest unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fixed8(i64);

impl Fixed8 {
	pub const ZERO: Self = Self(0);

	pub const fn from_raw(units: i64) -> Self {
		Self(units)
	}

	pub const fn raw(self) -> i64 {
		self.0
	}

	pub fn checked_add(self, other: Self) -> Option<Self> {
		self.0.checked_add(other.0).map(Self)
	}

	pub fn checked_sub(self, other: Self) -> Option<Self> {
		self.0.checked_sub(other.0).map(Self)
	}

	pub fn is_positive(self) -> bool {
		self.0 > 0
	}
}

impl FromStr for Fixed8 {
	type Err = PrimitiveError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let invalid = || PrimitiveError::InvalidAmount(s.to_owned());
		let trimmed = s.trim();
		let value = if trimmed.contains(['e', 'E']) {
			Decimal::from_scientific(trimmed)
		} else {
			Decimal::from_str(trimmed)
		}
		.map_err(|_| invalid())?;

		let scaled = value
			.checked_mul(Decimal::from(FIXED8_FACTOR))
			.ok_or_else(invalid)?;
		if !scaled.fract().is_zero() {
			return Err(invalid());
		}
		scaled.to_i64().map(Self).ok_or_else(invalid)
	}
}

impl fmt::Display for Fixed8 {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let abs = self.0.unsigned_abs();
		let factor = FIXED8_FACTOR as u64;
		let sign = if self.0 < 0 { "-" } else { "" };
		let whole = abs / factor;
		let frac = abs % factor;
		if frac == 0 {
			return write!(f, "{sign}{whole}");
		}
		let digits = format!("{frac:08}");
		write!(f, "{sign}{whole}.{}", digits.trim_end_matches('0'))
	}
}

impl Serialize for Fixed8 {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.collect_str(self)
	}
}

impl<'de> Deserialize<'de> for Fixed8 {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_any(Fixed8Visitor)
	}
}

/// Explorers report amounts as JSON numbers, config files as strings.
struct Fixed8Visitor;

impl Visitor<'_> for Fixed8Visitor {
	type Value = Fixed8;

	fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.write_str("a decimal amount as a number or string")
	}

	fn visit_str<E: de::Error>(self, v: &str) -> Result<Fixed8, E> {
		v.parse().map_err(E::custom)
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> Result<Fixed8, E> {
		// f64 Display never uses exponent notation.
		v.to_string().parse().map_err(E::custom)
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> Result<Fixed8, E> {
		i64::try_from(v)
			.ok()
			.and_then(|v| v.checked_mul(FIXED8_FACTOR))
			.map(Fixed8)
			.ok_or_else(|| E::custom(format!("amount {v} out of range")))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> Result<Fixed8, E> {
		v.checked_mul(FIXED8_FACTOR)
			.map(Fixed8)
			.ok_or_else(|| E::custom(format!("amount {v} out of range")))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn uint160_display_is_reversed_wire_order() {
		let h = UInt160::from_display_hex("0x5df31f6f59e6a4fbdd75103786bf73db1000b235").unwrap();
		assert_eq!(h.to_string(), "5df31f6f59e6a4fbdd75103786bf73db1000b235");
		assert_eq!(h.to_le_hex(), "35b20010db73bf86371075ddfba4e6596f1ff35d");
		assert_eq!(h.as_bytes()[0], 0x35);
	}

	#[test]
	fn uint_rejects_bad_input() {
		assert_eq!(
			UInt160::from_display_hex("abcd"),
			Err(PrimitiveError::InvalidLength { expected: 20, actual: 2 })
		);
		assert!(matches!(
			UInt256::from_display_hex("zz"),
			Err(PrimitiveError::InvalidHex(_))
		));
	}

	#[test]
	fn fixed8_parses_decimals() {
		assert_eq!("1".parse::<Fixed8>().unwrap().raw(), 100_000_000);
		assert_eq!("0.00000001".parse::<Fixed8>().unwrap().raw(), 1);
		assert_eq!("1e-8".parse::<Fixed8>().unwrap().raw(), 1);
		assert_eq!("-2.5".parse::<Fixed8>().unwrap().raw(), -250_000_000);
		assert!("0.000000001".parse::<Fixed8>().is_err());
		assert!("ten".parse::<Fixed8>().is_err());
	}

	#[test]
	fn fixed8_display_trims_zeros() {
		assert_eq!(Fixed8::from_raw(100_000_000).to_string(), "1");
		assert_eq!(Fixed8::from_raw(1).to_string(), "0.00000001");
		assert_eq!(Fixed8::from_raw(1_250_000_000).to_string(), "12.5");
		assert_eq!(Fixed8::from_raw(-50_000_000).to_string(), "-0.5");
	}

	#[test]
	fn fixed8_deserializes_numbers_and_strings() {
		let v: Vec<Fixed8> = serde_json::from_str(r#"[1.5, "0.1", 3, 1e-8]"#).unwrap();
		assert_eq!(
			v,
			vec![
				Fixed8::from_raw(150_000_000),
				Fixed8::from_raw(10_000_000),
				Fixed8::from_raw(300_000_000),
				Fixed8::from_raw(1),
			]
		);
		assert_eq!(serde_json::to_string(&v[0]).unwrap(), r#""1.5""#);
	}
}
