use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::assets;
use crate::primitives::{Fixed8, UInt160, UInt256};
use crate::tx_builder::InvocationTransaction;

/// One unspent (or spent, or pending) output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
	pub index: u16,
	pub txid: UInt256,
	pub value: Fixed8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
	pub balance: Fixed8,
	pub unspent: Vec<Coin>,
	#[serde(default)]
	pub spent: Vec<Coin>,
	#[serde(default)]
	pub unconfirmed: Vec<Coin>,
}

impl AssetBalance {
	fn recompute(&mut self) {
		self.balance = self
			.unspent
			.iter()
			.fold(Fixed8::ZERO, |acc, c| acc.checked_add(c.value).unwrap_or(acc));
	}
}

/// Snapshot of an address's native-asset holdings on one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
	pub net: String,
	pub address: String,
	pub asset_symbols: Vec<String>,
	pub assets: BTreeMap<String, AssetBalance>,
}

impl Balance {
	pub fn new(net: &str, address: &str) -> Self {
		Self {
			net: net.to_owned(),
			address: address.to_owned(),
			asset_symbols: Vec::new(),
			assets: BTreeMap::new(),
		}
	}

	pub fn add_asset(&mut self, symbol: &str, asset: AssetBalance) {
		if !self.asset_symbols.iter().any(|s| s == symbol) {
			self.asset_symbols.push(symbol.to_owned());
		}
		self.assets.insert(symbol.to_owned(), asset);
	}

	pub fn asset(&self, symbol: &str) -> Option<&AssetBalance> {
		self.assets.get(symbol)
	}

	/// Reflect a just-broadcast transaction: consumed coins move to
	/// `spent`, outputs paying `owner` are recorded as `unconfirmed`.
	pub fn apply_tx(&mut self, tx: &InvocationTransaction, owner: &UInt160) {
		for input in &tx.inputs {
			for asset in self.assets.values_mut() {
				let found = asset
					.unspent
					.iter()
					.position(|c| c.txid == input.prev_hash && c.index == input.prev_index);
				if let Some(pos) = found {
					let coin = asset.unspent.remove(pos);
					asset.spent.push(coin);
					asset.recompute();
					break;
				}
			}
		}

		let txid = tx.hash();
		for (index, output) in tx.outputs.iter().enumerate() {
			if output.script_hash != *owner {
				continue;
			}
			let Some(info) = assets::by_id(&output.asset_id) else {
				continue;
			};
			let coin = Coin {
				index: index as u16,
				txid,
				value: output.value,
			};
			if !self.assets.contains_key(info.symbol) {
				self.add_asset(info.symbol, AssetBalance::default());
			}
			if let Some(asset) = self.assets.get_mut(info.symbol) {
				asset.unconfirmed.push(coin);
			}
		}
	}
}
