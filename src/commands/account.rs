use anyhow::Result;

use crate::wallet::Account;

pub fn run(key: &str) -> Result<()> {
	let account = Account::parse(key)?;
	for line in render(&account) {
		println!("{line}");
	}
	Ok(())
}

/// Address, reversed script hash, public key, uncompressed public key and
/// private key, one per line. Underivable fields are blank.
fn render(account: &Account) -> [String; 5] {
	[
		account.address(),
		account.script_hash().to_le_hex(),
		account.public_key_hex().unwrap_or_default(),
		account.public_key_uncompressed_hex().unwrap_or_default(),
		account.private_key_hex().unwrap_or_default(),
	]
}
