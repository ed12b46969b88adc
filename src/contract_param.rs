use num_bigint::BigInt;
use thiserror::Error;

/// Argument kinds recognised on the command line, keyed by their
/// contract-parameter type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
	Integer,
	ByteArray,
	String,
	Array,
}

impl ParamKind {
	pub fn from_tag(tag: &str) -> Option<Self> {
		match tag {
			"0x02" => Some(Self::Integer),
			"0x05" => Some(Self::ByteArray),
			"0x07" => Some(Self::String),
			"0x10" => Some(Self::Array),
			_ => None,
		}
	}

	pub fn tag(self) -> &'static str {
		match self {
			Self::Integer => "0x02",
			Self::ByteArray => "0x05",
			Self::String => "0x07",
			Self::Array => "0x10",
		}
	}
}

/// A single typed contract argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractParam {
	Integer(BigInt),
	ByteArray(Vec<u8>),
	String(String),
	/// Opaque payload, decoded from hex, wrapped as a one-element array.
	/// Nested structures are not parsed.
	Array(Vec<u8>),
}

impl ContractParam {
	pub fn kind(&self) -> ParamKind {
		match self {
			Self::Integer(_) => ParamKind::Integer,
			Self::ByteArray(_) => ParamKind::ByteArray,
			Self::String(_) => ParamKind::String,
			Self::Array(_) => ParamKind::Array,
		}
	}

	/// Build one argument from a `(type-tag, value)` pair.
	pub fn from_pair(tag: &str, value: &str) -> Result<Self, ParamError> {
		let kind =
			ParamKind::from_tag(tag).ok_or_else(|| ParamError::UnsupportedType(tag.to_owned()))?;
		match kind {
			ParamKind::Integer => value
				.parse::<BigInt>()
				.map(Self::Integer)
				.map_err(|_| ParamError::InvalidInteger(value.to_owned())),
			ParamKind::ByteArray => hex::decode(value)
				.map(Self::ByteArray)
				.map_err(|_| ParamError::InvalidHex { kind, value: value.to_owned() }),
			ParamKind::String => Ok(Self::String(value.to_owned())),
			ParamKind::Array => hex::decode(value)
				.map(Self::Array)
				.map_err(|_| ParamError::InvalidHex { kind, value: value.to_owned() }),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
	#[error("Unsupported type {0}")]
	UnsupportedType(String),

	#[error("missing value for argument of type {0}")]
	MissingValue(String),

	#[error("invalid integer argument '{0}'")]
	InvalidInteger(String),

	#[error("invalid hex for {} argument '{value}'", .kind.tag())]
	InvalidHex { kind: ParamKind, value: String },
}

/// Turn alternating `type value type value ...` tokens into arguments.
///
/// Fails on the first bad pair and returns nothing in that case; an empty
/// token list is a valid, empty argument list.
pub fn encode_args<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<ContractParam>, ParamError> {
	let pairs = tokens.chunks_exact(2);
	let dangling = pairs.remainder().first();
	let args = pairs
		.map(|pair| ContractParam::from_pair(pair[0].as_ref(), pair[1].as_ref()))
		.collect::<Result<Vec<_>, _>>()?;

	match dangling {
		None => Ok(args),
		Some(tag) => {
			let tag = tag.as_ref().to_owned();
			match ParamKind::from_tag(&tag) {
				Some(_) => Err(ParamError::MissingValue(tag)),
				None => Err(ParamError::UnsupportedType(tag)),
			}
		}
	}
}
