use num_bigint::BigInt;

use crate::contract_param::ContractParam;
use crate::primitives::UInt160;

/// The VM opcodes this tool emits.
pub mod opcode {
	pub const PUSH0: u8 = 0x00;
	pub const PUSHBYTES64: u8 = 0x40;
	pub const PUSHBYTES75: u8 = 0x4b;
	pub const PUSHDATA1: u8 = 0x4c;
	pub const PUSHDATA2: u8 = 0x4d;
	pub const PUSHDATA4: u8 = 0x4e;
	pub const PUSHM1: u8 = 0x4f;
	pub const PUSH1: u8 = 0x51;
	pub const APPCALL: u8 = 0x67;
	pub const CHECKSIG: u8 = 0xac;
	pub const PACK: u8 = 0xc1;
}

/// Appends VM instructions to an in-memory script.
#[derive(Debug, Default)]
pub struct ScriptBuilder {
	buf: Vec<u8>,
}

impl ScriptBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn emit(&mut self, op: u8) -> &mut Self {
		self.buf.push(op);
		self
	}

	/// Push a byte string with the shortest encoding for its length.
	pub fn emit_push_bytes(&mut self, data: &[u8]) -> &mut Self {
		let len = data.len();
		if len <= opcode::PUSHBYTES75 as usize {
			// PUSHBYTES1..75 are the length itself; zero length is PUSH0.
			self.buf.push(len as u8);
		} else if len <= u8::MAX as usize {
			self.buf.push(opcode::PUSHDATA1);
			self.buf.push(len as u8);
		} else if len <= u16::MAX as usize {
			self.buf.push(opcode::PUSHDATA2);
			self.buf.extend_from_slice(&(len as u16).to_le_bytes());
		} else {
			self.buf.push(opcode::PUSHDATA4);
			self.buf.extend_from_slice(&(len as u32).to_le_bytes());
		}
		self.buf.extend_from_slice(data);
		self
	}

	pub fn emit_push_int(&mut self, n: &BigInt) -> &mut Self {
		if *n == BigInt::from(-1) {
			return self.emit(opcode::PUSHM1);
		}
		if *n == BigInt::from(0) {
			return self.emit(opcode::PUSH0);
		}
		if *n >= BigInt::from(1) && *n <= BigInt::from(16) {
			let small = u8::try_from(n).unwrap_or(1);
			return self.emit(opcode::PUSH1 - 1 + small);
		}
		self.emit_push_bytes(&n.to_signed_bytes_le())
	}

	pub fn emit_push_param(&mut self, param: &ContractParam) -> &mut Self {
		match param {
			ContractParam::Integer(n) => self.emit_push_int(n),
			ContractParam::ByteArray(bytes) => self.emit_push_bytes(bytes),
			ContractParam::String(s) => self.emit_push_bytes(s.as_bytes()),
			ContractParam::Array(payload) => {
				self.emit_push_bytes(payload);
				self.emit_push_int(&BigInt::from(1));
				self.emit(opcode::PACK)
			}
		}
	}

	/// Push `items` as a packed array: elements in reverse, then count, then PACK.
	pub fn emit_push_array(&mut self, items: &[ContractParam]) -> &mut Self {
		for item in items.iter().rev() {
			self.emit_push_param(item);
		}
		self.emit_push_int(&BigInt::from(items.len()));
		self.emit(opcode::PACK)
	}

	/// Call `operation` on the contract at `script_hash` with `args`.
	pub fn emit_app_call(
		&mut self,
		script_hash: &UInt160,
		operation: &str,
		args: &[ContractParam],
	) -> &mut Self {
		self.emit_push_array(args);
		if !operation.is_empty() {
			self.emit_push_bytes(operation.as_bytes());
		}
		self.emit(opcode::APPCALL);
		self.buf.extend_from_slice(script_hash.as_bytes());
		self
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.buf
	}
}

/// Build the invocation script for one contract call.
pub fn invocation_script(script_hash: &UInt160, operation: &str, args: &[ContractParam]) -> Vec<u8> {
	let mut sb = ScriptBuilder::new();
	sb.emit_app_call(script_hash, operation, args);
	sb.into_bytes()
}

/// `PUSHBYTES33 <pubkey> CHECKSIG`.
pub fn single_sig_verification_script(compressed_public_key: &[u8]) -> Vec<u8> {
	let mut sb = ScriptBuilder::new();
	sb.emit_push_bytes(compressed_public_key);
	sb.emit(opcode::CHECKSIG);
	sb.into_bytes()
}

/// `PUSHBYTES64 <signature>`.
pub fn signature_invocation_script(signature: &[u8; 64]) -> Vec<u8> {
	let mut out = Vec::with_capacity(65);
	out.push(opcode::PUSHBYTES64);
	out.extend_from_slice(signature);
	out
}

#[cfg(test)]
mod tests {
	use super::*;

	fn push_int(n: i64) -> Vec<u8> {
		let mut sb = ScriptBuilder::new();
		sb.emit_push_int(&BigInt::from(n));
		sb.into_bytes()
	}

	#[test]
	fn small_integers_use_dedicated_opcodes() {
		assert_eq!(push_int(-1), vec![0x4f]);
		assert_eq!(push_int(0), vec![0x00]);
		assert_eq!(push_int(1), vec![0x51]);
		assert_eq!(push_int(16), vec![0x60]);
	}

	#[test]
	fn larger_integers_are_twos_complement_le() {
		assert_eq!(push_int(17), vec![0x01, 0x11]);
		assert_eq!(push_int(128), vec![0x02, 0x80, 0x00]);
		assert_eq!(push_int(-2), vec![0x01, 0xfe]);
		assert_eq!(push_int(1000), vec![0x02, 0xe8, 0x03]);
	}

	#[test]
	fn push_data_prefixes() {
		let mut sb = ScriptBuilder::new();
		sb.emit_push_bytes(&[0xaa; 75]);
		let short = sb.into_bytes();
		assert_eq!(short[0], 75);
		assert_eq!(short.len(), 76);

		let mut sb = ScriptBuilder::new();
		sb.emit_push_bytes(&[0xaa; 76]);
		let medium = sb.into_bytes();
		assert_eq!(&medium[..2], &[opcode::PUSHDATA1, 76]);

		let mut sb = ScriptBuilder::new();
		sb.emit_push_bytes(&[0xaa; 300]);
		let long = sb.into_bytes();
		assert_eq!(&long[..3], &[opcode::PUSHDATA2, 0x2c, 0x01]);
		assert_eq!(long.len(), 303);
	}

	#[test]
	fn app_call_layout() {
		let hash = UInt160::from_display_hex("5b7074e873973a6ed3708862f219a6fbf4d1c411").unwrap();
		let args = vec![
			ContractParam::Integer(BigInt::from(5)),
			ContractParam::String("hello".into()),
		];
		let script = invocation_script(&hash, "name", &args);

		let mut expected = vec![0x05];
		expected.extend_from_slice(b"hello");
		expected.push(0x55); // PUSH5
		expected.push(0x52); // PUSH2 (arg count)
		expected.push(opcode::PACK);
		expected.push(0x04);
		expected.extend_from_slice(b"name");
		expected.push(opcode::APPCALL);
		expected.extend_from_slice(hash.as_bytes());

		assert_eq!(script, expected);
		assert_eq!(script[script.len() - 20], 0x11, "hash is little-endian");
	}

	#[test]
	fn no_args_packs_empty_array() {
		let hash = UInt160::default();
		let script = invocation_script(&hash, "a", &[]);
		assert_eq!(&script[..4], &[0x00, opcode::PACK, 0x01, b'a']);
	}

	#[test]
	fn array_argument_is_single_element_array() {
		let mut sb = ScriptBuilder::new();
		sb.emit_push_param(&ContractParam::Array(vec![0xbe, 0xef]));
		assert_eq!(sb.into_bytes(), vec![0x02, 0xbe, 0xef, 0x51, opcode::PACK]);

		// Encoded from the command line, the hex payload lands as raw bytes.
		let args = crate::contract_param::encode_args(&["0x10", "cafe"]).unwrap();
		let mut sb = ScriptBuilder::new();
		sb.emit_push_param(&args[0]);
		assert_eq!(sb.into_bytes(), vec![0x02, 0xca, 0xfe, 0x51, opcode::PACK]);
	}

	#[test]
	fn verification_script_shape() {
		let script = single_sig_verification_script(&[0x02; 33]);
		assert_eq!(script.len(), 35);
		assert_eq!(script[0], 0x21);
		assert_eq!(script[34], opcode::CHECKSIG);
	}
}
