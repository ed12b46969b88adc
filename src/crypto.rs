use p256::ecdsa::signature::Signer as _;
use p256::ecdsa::{Signature, SigningKey};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Base58CheckError {
	#[error("invalid base58 string")]
	InvalidBase58,

	#[error("base58check payload too short")]
	TooShort,

	#[error("base58check checksum mismatch")]
	ChecksumMismatch,
}

// -- Hashing --

pub fn sha256(data: &[u8]) -> [u8; 32] {
	Sha256::digest(data).into()
}

/// Double SHA-256, used for checksums and transaction ids.
pub fn hash256(data: &[u8]) -> [u8; 32] {
	sha256(&sha256(data))
}

/// RIPEMD-160 of SHA-256, used for script hashes.
pub fn hash160(data: &[u8]) -> [u8; 20] {
	Ripemd160::digest(sha256(data)).into()
}

// -- Base58Check --

pub fn base58check_encode(payload: &[u8]) -> String {
	let checksum = hash256(payload);
	let mut buf = Vec::with_capacity(payload.len() + 4);
	buf.extend_from_slice(payload);
	buf.extend_from_slice(&checksum[..4]);
	bs58::encode(buf).into_string()
}

/// Decode and verify a Base58Check string, returning the payload without
/// the trailing 4-byte checksum.
pub fn base58check_decode(s: &str) -> Result<Vec<u8>, Base58CheckError> {
	let mut raw = bs58::decode(s)
		.into_vec()
		.map_err(|_| Base58CheckError::InvalidBase58)?;
	if raw.len() < 5 {
		return Err(Base58CheckError::TooShort);
	}
	let split = raw.len() - 4;
	let checksum = hash256(&raw[..split]);
	if raw[split..] != checksum[..4] {
		return Err(Base58CheckError::ChecksumMismatch);
	}
	raw.truncate(split);
	Ok(raw)
}

// -- Signing --

/// ECDSA over secp256r1 with SHA-256 of `message`, returned as the
/// 64-byte `r || s` form that witnesses carry.
pub fn sign(key: &SigningKey, message: &[u8]) -> [u8; 64] {
	let sig: Signature = key.sign(message);
	let mut out = [0u8; 64];
	out.copy_from_slice(&sig.to_bytes());
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use p256::ecdsa::signature::Verifier;
	use p256::ecdsa::VerifyingKey;

	#[test]
	fn hash_lengths() {
		assert_eq!(hash160(b"neo").len(), 20);
		assert_eq!(hash256(b"neo"), sha256(&sha256(b"neo")));
	}

	#[test]
	fn sha256_known_vector() {
		assert_eq!(
			hex::encode(sha256(b"abc")),
			"ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
		);
	}

	#[test]
	fn base58check_roundtrip() {
		let payload = [0x17u8, 1, 2, 3, 4, 5];
		let encoded = base58check_encode(&payload);
		assert_eq!(base58check_decode(&encoded).unwrap(), payload);
	}

	#[test]
	fn base58check_rejects_corruption() {
		let encoded = base58check_encode(&[0x80, 9, 9, 9]);
		let mut chars: Vec<char> = encoded.chars().collect();
		let last = chars.len() - 1;
		chars[last] = if chars[last] == '2' { '3' } else { '2' };
		let corrupted: String = chars.into_iter().collect();

		assert_eq!(
			base58check_decode(&corrupted),
			Err(Base58CheckError::ChecksumMismatch)
		);
		assert_eq!(base58check_decode("0OIl"), Err(Base58CheckError::InvalidBase58));
		assert_eq!(base58check_decode("2"), Err(Base58CheckError::TooShort));
	}

	#[test]
	fn signature_verifies() {
		let key = SigningKey::from_slice(&[7u8; 32]).unwrap();
		let sig = sign(&key, b"payload");
		let parsed = Signature::from_slice(&sig).unwrap();
		let vk = VerifyingKey::from(&key);
		assert!(vk.verify(b"payload", &parsed).is_ok());
		assert!(vk.verify(b"other", &parsed).is_err());
	}
}
