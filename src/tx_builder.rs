use thiserror::Error;
use tracing::debug;

use crate::assets;
use crate::balance::Balance;
use crate::crypto;
use crate::primitives::{Fixed8, UInt160, UInt256};
use crate::script;
use crate::wallet::{self, Account, WalletError};

/// Transaction type byte of an invocation transaction.
pub const INVOCATION_TX_TYPE: u8 = 0xd1;

/// Version 1 carries the gas field.
pub const INVOCATION_TX_VERSION: u8 = 1;

const ONE_GAS: i64 = 100_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxError {
	#[error("This balance does not contain any {0}!")]
	MissingAsset(String),

	#[error("Insufficient {symbol}! Need {required} but only found {available}")]
	Insufficient {
		symbol: String,
		required: Fixed8,
		available: Fixed8,
	},

	#[error("Insufficient {0}! Reached end of unspent coins!")]
	OutOfCoins(String),

	#[error("unknown asset {0}")]
	UnknownAsset(UInt256),

	#[error("gas must be a whole number of GAS, got {0}")]
	FractionalGas(Fixed8),

	#[error("amount overflow")]
	Overflow,

	#[error(transparent)]
	Wallet(#[from] WalletError),
}

/// A value transfer the transaction must carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferIntent {
	pub asset_id: UInt256,
	pub value: Fixed8,
	pub script_hash: UInt160,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionInput {
	pub prev_hash: UInt256,
	pub prev_index: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionOutput {
	pub asset_id: UInt256,
	pub value: Fixed8,
	pub script_hash: UInt160,
}

impl From<&TransferIntent> for TransactionOutput {
	fn from(intent: &TransferIntent) -> Self {
		Self {
			asset_id: intent.asset_id,
			value: intent.value,
			script_hash: intent.script_hash,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
	pub invocation_script: Vec<u8>,
	pub verification_script: Vec<u8>,
}

/// A contract invocation paid for with UTXO inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationTransaction {
	pub version: u8,
	pub script: Vec<u8>,
	pub gas: Fixed8,
	pub inputs: Vec<TransactionInput>,
	pub outputs: Vec<TransactionOutput>,
	pub witnesses: Vec<Witness>,
}

impl InvocationTransaction {
	pub fn new(script: Vec<u8>, gas: Fixed8) -> Self {
		Self {
			version: INVOCATION_TX_VERSION,
			script,
			gas,
			inputs: Vec::new(),
			outputs: Vec::new(),
			witnesses: Vec::new(),
		}
	}

	/// Everything except witnesses; this is what gets hashed and signed.
	pub fn serialize_unsigned(&self) -> Vec<u8> {
		let mut buf = Vec::with_capacity(64 + self.script.len());
		buf.push(INVOCATION_TX_TYPE);
		buf.push(self.version);
		write_var_bytes(&mut buf, &self.script);
		if self.version >= 1 {
			buf.extend_from_slice(&self.gas.raw().to_le_bytes());
		}

		// No attributes.
		write_var_int(&mut buf, 0);

		write_var_int(&mut buf, self.inputs.len() as u64);
		for input in &self.inputs {
			buf.extend_from_slice(input.prev_hash.as_bytes());
			buf.extend_from_slice(&input.prev_index.to_le_bytes());
		}

		write_var_int(&mut buf, self.outputs.len() as u64);
		for output in &self.outputs {
			buf.extend_from_slice(output.asset_id.as_bytes());
			buf.extend_from_slice(&output.value.raw().to_le_bytes());
			buf.extend_from_slice(output.script_hash.as_bytes());
		}
		buf
	}

	pub fn serialize(&self) -> Vec<u8> {
		let mut buf = self.serialize_unsigned();
		write_var_int(&mut buf, self.witnesses.len() as u64);
		for w in &self.witnesses {
			write_var_bytes(&mut buf, &w.invocation_script);
			write_var_bytes(&mut buf, &w.verification_script);
		}
		buf
	}

	pub fn hash(&self) -> UInt256 {
		UInt256::from_le_bytes(crypto::hash256(&self.serialize_unsigned()))
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.serialize())
	}

	/// Attach a single-signature witness from `account`.
	pub fn sign(&mut self, account: &Account) -> Result<(), TxError> {
		let key = account.signing_key()?;
		let verification_script = account
			.verification_script()
			.ok_or(WalletError::MissingPrivateKey)?;
		let signature = crypto::sign(key, &self.serialize_unsigned());
		self.witnesses.push(Witness {
			invocation_script: script::signature_invocation_script(&signature),
			verification_script,
		});
		Ok(())
	}
}

/// Build an unsigned invocation transaction funded from `balance`.
///
/// Each asset needs the sum of its intents, plus `gas` for GAS. Coins are
/// taken smallest first; any excess is returned to the balance's address.
pub fn build_invocation(
	balance: &Balance,
	intents: &[TransferIntent],
	script: Vec<u8>,
	gas: Fixed8,
) -> Result<InvocationTransaction, TxError> {
	if gas.raw() % ONE_GAS != 0 {
		return Err(TxError::FractionalGas(gas));
	}

	let mut required: Vec<(UInt256, Fixed8)> = Vec::new();
	for intent in intents {
		add_requirement(&mut required, intent.asset_id, intent.value)?;
	}
	if gas.is_positive() {
		add_requirement(&mut required, assets::GAS.asset_id(), gas)?;
	}

	let change_to = wallet::script_hash_from_address(&balance.address)?;
	let mut tx = InvocationTransaction::new(script, gas);
	tx.outputs.extend(intents.iter().map(TransactionOutput::from));

	for (asset_id, amount) in required {
		let info = assets::by_id(&asset_id).ok_or(TxError::UnknownAsset(asset_id))?;
		let symbol = info.symbol.to_owned();
		let asset = balance
			.asset(info.symbol)
			.ok_or_else(|| TxError::MissingAsset(symbol.clone()))?;
		if asset.balance < amount {
			return Err(TxError::Insufficient {
				symbol,
				required: amount,
				available: asset.balance,
			});
		}

		let mut coins = asset.unspent.clone();
		coins.sort_by_key(|c| c.value);

		let mut selected = Fixed8::ZERO;
		let mut used = 0;
		while selected < amount {
			let coin = coins.get(used).ok_or_else(|| TxError::OutOfCoins(symbol.clone()))?;
			selected = selected.checked_add(coin.value).ok_or(TxError::Overflow)?;
			used += 1;
		}

		tx.inputs.extend(coins[..used].iter().map(|c| TransactionInput {
			prev_hash: c.txid,
			prev_index: c.index,
		}));

		let change = selected.checked_sub(amount).ok_or(TxError::Overflow)?;
		if change.is_positive() {
			tx.outputs.push(TransactionOutput {
				asset_id,
				value: change,
				script_hash: change_to,
			});
		}
		debug!(asset = %info.symbol, inputs = used, %change, "selected coins");
	}

	Ok(tx)
}

fn add_requirement(
	required: &mut Vec<(UInt256, Fixed8)>,
	asset_id: UInt256,
	value: Fixed8,
) -> Result<(), TxError> {
	match required.iter_mut().find(|(id, _)| *id == asset_id) {
		Some((_, total)) => *total = total.checked_add(value).ok_or(TxError::Overflow)?,
		None => required.push((asset_id, value)),
	}
	Ok(())
}

// -- Wire helpers --

fn write_var_int(buf: &mut Vec<u8>, n: u64) {
	if n < 0xfd {
		buf.push(n as u8);
	} else if n <= 0xffff {
		buf.push(0xfd);
		buf.extend_from_slice(&(n as u16).to_le_bytes());
	} else if n <= 0xffff_ffff {
		buf.push(0xfe);
		buf.extend_from_slice(&(n as u32).to_le_bytes());
	} else {
		buf.push(0xff);
		buf.extend_from_slice(&n.to_le_bytes());
	}
}

fn write_var_bytes(buf: &mut Vec<u8>, data: &[u8]) {
	write_var_int(buf, data.len() as u64);
	buf.extend_from_slice(data);
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::balance::{AssetBalance, Coin};
	use p256::ecdsa::signature::Verifier;
	use p256::ecdsa::{Signature, VerifyingKey};

	const WIF: &str = "L1QqQJnpBwbsPGAuutuzPTac8piqvbR1HRjrY5qHup48TBCBFe4g";

	fn account() -> Account {
		Account::parse(WIF).unwrap()
	}

	fn gas_balance(account: &Account, values: &[i64]) -> Balance {
		let unspent: Vec<Coin> = values
			.iter()
			.enumerate()
			.map(|(i, v)| Coin {
				index: i as u16,
				txid: UInt256::from_le_bytes([i as u8 + 1; 32]),
				value: Fixed8::from_raw(*v),
			})
			.collect();
		let total = values.iter().sum();
		let mut b = Balance::new("TestNet", &account.address());
		b.add_asset(
			"GAS",
			AssetBalance {
				balance: Fixed8::from_raw(total),
				unspent,
				..Default::default()
			},
		);
		b
	}

	fn self_transfer(account: &Account) -> TransferIntent {
		TransferIntent {
			asset_id: assets::GAS.asset_id(),
			value: Fixed8::from_raw(1),
			script_hash: account.script_hash(),
		}
	}

	#[test]
	fn selects_smallest_coins_first_and_returns_change() {
		let acc = account();
		let balance = gas_balance(&acc, &[5 * ONE_GAS, ONE_GAS, ONE_GAS / 2]);
		let tx = build_invocation(&balance, &[self_transfer(&acc)], vec![0x00], Fixed8::from_raw(ONE_GAS))
			.unwrap();

		// Need 1 GAS + 1 unit: 0.5 + 1 GAS covers it.
		assert_eq!(tx.inputs.len(), 2);
		assert_eq!(tx.inputs[0].prev_index, 2);
		assert_eq!(tx.inputs[1].prev_index, 1);

		assert_eq!(tx.outputs.len(), 2);
		assert_eq!(tx.outputs[0].value, Fixed8::from_raw(1));
		assert_eq!(tx.outputs[1].value, Fixed8::from_raw(ONE_GAS / 2 - 1));
		assert_eq!(tx.outputs[1].script_hash, acc.script_hash());
	}

	#[test]
	fn exact_amount_has_no_change() {
		let acc = account();
		let balance = gas_balance(&acc, &[ONE_GAS + 1]);
		let tx = build_invocation(&balance, &[self_transfer(&acc)], vec![0x00], Fixed8::from_raw(ONE_GAS))
			.unwrap();
		assert_eq!(tx.inputs.len(), 1);
		assert_eq!(tx.outputs.len(), 1);
	}

	#[test]
	fn insufficient_funds() {
		let acc = account();
		let balance = gas_balance(&acc, &[ONE_GAS]);
		let err = build_invocation(&balance, &[self_transfer(&acc)], vec![], Fixed8::from_raw(ONE_GAS))
			.unwrap_err();
		assert!(matches!(err, TxError::Insufficient { .. }));
		assert_eq!(
			err.to_string(),
			"Insufficient GAS! Need 1.00000001 but only found 1"
		);
	}

	#[test]
	fn missing_asset() {
		let acc = account();
		let balance = Balance::new("TestNet", &acc.address());
		let err = build_invocation(&balance, &[self_transfer(&acc)], vec![], Fixed8::ZERO).unwrap_err();
		assert_eq!(err, TxError::MissingAsset("GAS".into()));
	}

	#[test]
	fn fractional_gas_is_rejected() {
		let acc = account();
		let balance = gas_balance(&acc, &[10 * ONE_GAS]);
		let err = build_invocation(&balance, &[], vec![], Fixed8::from_raw(ONE_GAS / 2)).unwrap_err();
		assert_eq!(err, TxError::FractionalGas(Fixed8::from_raw(ONE_GAS / 2)));
	}

	#[test]
	fn unsigned_layout() {
		let mut tx = InvocationTransaction::new(vec![0xaa, 0xbb], Fixed8::from_raw(ONE_GAS));
		tx.inputs.push(TransactionInput {
			prev_hash: UInt256::from_le_bytes([1; 32]),
			prev_index: 3,
		});
		let raw = tx.serialize_unsigned();

		assert_eq!(&raw[..5], &[0xd1, 0x01, 0x02, 0xaa, 0xbb]);
		assert_eq!(&raw[5..13], &ONE_GAS.to_le_bytes());
		assert_eq!(raw[13], 0x00, "attribute count");
		assert_eq!(raw[14], 0x01, "input count");
		assert_eq!(&raw[47..49], &[0x03, 0x00]);
		assert_eq!(raw[49], 0x00, "output count");
		assert_eq!(raw.len(), 50);
		// No witnesses yet.
		let mut expected = raw.clone();
		expected.push(0x00);
		assert_eq!(tx.serialize(), expected);
	}

	#[test]
	fn signed_witness_verifies() {
		let acc = account();
		let balance = gas_balance(&acc, &[3 * ONE_GAS]);
		let mut tx = build_invocation(&balance, &[self_transfer(&acc)], vec![0x51], Fixed8::from_raw(ONE_GAS))
			.unwrap();
		let hash_before = tx.hash();
		tx.sign(&acc).unwrap();

		assert_eq!(tx.hash(), hash_before, "witnesses do not change the hash");
		let w = &tx.witnesses[0];
		assert_eq!(w.invocation_script.len(), 65);
		assert_eq!(w.invocation_script[0], 0x40);
		assert_eq!(w.verification_script, acc.verification_script().unwrap());

		let pubkey = hex::decode(acc.public_key_hex().unwrap()).unwrap();
		let vk = VerifyingKey::from_sec1_bytes(&pubkey).unwrap();
		let sig = Signature::from_slice(&w.invocation_script[1..]).unwrap();
		assert!(vk.verify(&tx.serialize_unsigned(), &sig).is_ok());
	}

	#[test]
	fn signing_needs_private_key() {
		let watch_only = Account::parse(&account().address()).unwrap();
		let mut tx = InvocationTransaction::new(vec![], Fixed8::ZERO);
		assert_eq!(
			tx.sign(&watch_only),
			Err(TxError::Wallet(WalletError::MissingPrivateKey))
		);
	}

	#[test]
	fn var_int_boundaries() {
		let mut buf = Vec::new();
		write_var_int(&mut buf, 0xfc);
		write_var_int(&mut buf, 0xfd);
		write_var_int(&mut buf, 0x1_0000);
		assert_eq!(buf, vec![0xfc, 0xfd, 0xfd, 0x00, 0xfe, 0x00, 0x00, 0x01, 0x00]);
	}
}
