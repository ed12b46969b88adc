use crate::primitives::UInt256;

/// A native UTXO asset.
pub struct AssetInfo {
	pub symbol: &'static str,
	/// Asset id in display (big-endian) hex.
	pub id: &'static str,
}

impl AssetInfo {
	pub fn asset_id(&self) -> UInt256 {
		// Registry ids are fixed 32-byte hex literals, checked in tests.
		UInt256::from_display_hex(self.id).unwrap_or_default()
	}
}

pub static NEO: AssetInfo = AssetInfo {
	symbol: "NEO",
	id: "c56f33fc6ecfcd0c225c4ab356fee59390af8560be0e930faebe74a6daff7c9b",
};

pub static GAS: AssetInfo = AssetInfo {
	symbol: "GAS",
	id: "602c79718b16e442de58778e148d0b1084e3b2dffd5de6b7b16cee7969282de7",
};

/// All native assets, identical on every network.
pub static ASSETS: [&AssetInfo; 2] = [&NEO, &GAS];

pub fn by_id(id: &UInt256) -> Option<&'static AssetInfo> {
	ASSETS.iter().copied().find(|a| a.asset_id() == *id)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn asset_ids_are_valid_hex() {
		for info in ASSETS {
			assert_eq!(info.id.len(), 64, "{} id should be 32 bytes", info.symbol);
			assert!(UInt256::from_display_hex(info.id).is_ok());
		}
	}

	#[test]
	fn lookups_agree() {
		assert_eq!(by_id(&GAS.asset_id()).unwrap().symbol, "GAS");
		assert_eq!(by_id(&NEO.asset_id()).unwrap().symbol, "NEO");
		assert!(by_id(&UInt256::default()).is_none());
	}
}
