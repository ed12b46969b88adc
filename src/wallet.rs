use std::fmt;

use p256::ecdsa::{SigningKey, VerifyingKey};
use thiserror::Error;

use crate::crypto;
use crate::primitives::UInt160;
use crate::script;

/// Version byte prefixed to the script hash in an address.
pub const ADDRESS_VERSION: u8 = 0x17;

/// Version byte of a WIF-encoded private key.
pub const WIF_VERSION: u8 = 0x80;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
	#[error("invalid private key")]
	InvalidPrivateKey,

	#[error("invalid public key")]
	InvalidPublicKey,

	#[error("invalid address '{address}': {reason}")]
	InvalidAddress { address: String, reason: String },

	#[error("unrecognized key format (expected WIF, private key, public key, script hash or address)")]
	UnrecognizedKey,

	#[error("account has no private key")]
	MissingPrivateKey,
}

/// An account derived from whatever key material the user supplied.
///
/// The script hash is always known. Public and private keys are present
/// only when the input carried them (a WIF yields everything, an address
/// yields only the script hash).
#[derive(Clone)]
pub struct Account {
	script_hash: UInt160,
	public_key: Option<VerifyingKey>,
	private_key: Option<SigningKey>,
}

impl Account {
	/// Detect the kind of `key` and derive as much as it allows.
	pub fn parse(key: &str) -> Result<Self, WalletError> {
		let key = key.trim();

		if is_hex_of_len(key, 64) {
			return Self::from_private_key_hex(key);
		}
		if is_hex_of_len(key, 66) || is_hex_of_len(key, 130) {
			return Self::from_public_key_hex(key);
		}
		if is_hex_of_len(key, 40) {
			let script_hash =
				UInt160::from_display_hex(key).map_err(|_| WalletError::UnrecognizedKey)?;
			return Ok(Self::from_script_hash(script_hash));
		}

		match crypto::base58check_decode(key) {
			Ok(payload) => match payload.as_slice() {
				[WIF_VERSION, body @ .., 0x01] if body.len() == 32 => Self::from_private_key_bytes(body),
				[ADDRESS_VERSION, hash @ ..] if hash.len() == UInt160::LEN => {
					let mut bytes = [0u8; 20];
					bytes.copy_from_slice(hash);
					Ok(Self::from_script_hash(UInt160::from_le_bytes(bytes)))
				}
				_ => Err(WalletError::UnrecognizedKey),
			},
			Err(_) => Err(WalletError::UnrecognizedKey),
		}
	}

	pub fn from_private_key_hex(hex_key: &str) -> Result<Self, WalletError> {
		let bytes = hex::decode(hex_key).map_err(|_| WalletError::InvalidPrivateKey)?;
		Self::from_private_key_bytes(&bytes)
	}

	fn from_private_key_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
		let private_key =
			SigningKey::from_slice(bytes).map_err(|_| WalletError::InvalidPrivateKey)?;
		let public_key = private_key.verifying_key().clone();
		Ok(Self {
			script_hash: script_hash_from_public_key(&public_key),
			public_key: Some(public_key),
			private_key: Some(private_key),
		})
	}

	/// Accepts compressed (`02`/`03`) or uncompressed (`04`) SEC1 hex.
	pub fn from_public_key_hex(hex_key: &str) -> Result<Self, WalletError> {
		let bytes = hex::decode(hex_key).map_err(|_| WalletError::InvalidPublicKey)?;
		let public_key =
			VerifyingKey::from_sec1_bytes(&bytes).map_err(|_| WalletError::InvalidPublicKey)?;
		Ok(Self {
			script_hash: script_hash_from_public_key(&public_key),
			public_key: Some(public_key),
			private_key: None,
		})
	}

	pub fn from_script_hash(script_hash: UInt160) -> Self {
		Self {
			script_hash,
			public_key: None,
			private_key: None,
		}
	}

	pub fn address(&self) -> String {
		address_from_script_hash(&self.script_hash)
	}

	pub fn script_hash(&self) -> UInt160 {
		self.script_hash
	}

	pub fn public_key_hex(&self) -> Option<String> {
		self.public_key
			.as_ref()
			.map(|pk| hex::encode(pk.to_encoded_point(true).as_bytes()))
	}

	pub fn public_key_uncompressed_hex(&self) -> Option<String> {
		self.public_key
			.as_ref()
			.map(|pk| hex::encode(pk.to_encoded_point(false).as_bytes()))
	}

	pub fn private_key_hex(&self) -> Option<String> {
		self.private_key.as_ref().map(|sk| hex::encode(sk.to_bytes()))
	}

	pub fn signing_key(&self) -> Result<&SigningKey, WalletError> {
		self.private_key.as_ref().ok_or(WalletError::MissingPrivateKey)
	}

	/// Single-signature verification script, when the public key is known.
	pub fn verification_script(&self) -> Option<Vec<u8>> {
		self.public_key.as_ref().map(|pk| {
			script::single_sig_verification_script(pk.to_encoded_point(true).as_bytes())
		})
	}
}

// Never print key material.
impl fmt::Debug for Account {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Account")
			.field("address", &self.address())
			.field("has_private_key", &self.private_key.is_some())
			.finish()
	}
}

// -- Address helpers --

pub fn address_from_script_hash(script_hash: &UInt160) -> String {
	let mut payload = Vec::with_capacity(21);
	payload.push(ADDRESS_VERSION);
	payload.extend_from_slice(script_hash.as_bytes());
	crypto::base58check_encode(&payload)
}

pub fn script_hash_from_address(address: &str) -> Result<UInt160, WalletError> {
	let invalid = |reason: &str| WalletError::InvalidAddress {
		address: address.to_owned(),
		reason: reason.to_owned(),
	};
	let payload = crypto::base58check_decode(address).map_err(|e| invalid(&e.to_string()))?;
	match payload.as_slice() {
		[ADDRESS_VERSION, hash @ ..] if hash.len() == UInt160::LEN => {
			let mut bytes = [0u8; 20];
			bytes.copy_from_slice(hash);
			Ok(UInt160::from_le_bytes(bytes))
		}
		_ => Err(invalid("wrong version or length")),
	}
}

fn script_hash_from_public_key(public_key: &VerifyingKey) -> UInt160 {
	let script =
		script::single_sig_verification_script(public_key.to_encoded_point(true).as_bytes());
	UInt160::from_le_bytes(crypto::hash160(&script))
}

fn is_hex_of_len(s: &str, len: usize) -> bool {
	s.len() == len && s.bytes().all(|b| b.is_ascii_hexdigit())
}
