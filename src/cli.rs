use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
	name = "neo-contract",
	about = "Derive accounts, read storage and invoke contracts on NEO-compatible chains.",
	version
)]
pub struct Cli {
	/// Use this RPC endpoint instead of discovering one through the explorer.
	#[arg(long, global = true)]
	pub rpc_url: Option<String>,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Print address, script hash and keys derivable from a key.
	Account {
		/// WIF, private key, public key, script hash or address.
		key: String,
	},

	/// Read a raw value from a contract's storage.
	Getstorage {
		/// Network name (e.g. TestNet) or explorer URL.
		net: String,

		/// Contract script hash.
		script_hash: String,

		/// Storage key (hex).
		key: String,
	},

	/// Build, sign and broadcast a contract invocation.
	Invoke {
		/// Network name (e.g. TestNet) or explorer URL.
		net: String,

		/// Signing key in WIF.
		wif: String,

		/// Balance JSON. Accepted for compatibility and ignored; the balance
		/// is always fetched from the explorer.
		balance: String,

		/// Contract script hash.
		contract: String,

		/// Contract operation name.
		operation: String,

		/// Arguments as `type value` pairs. Types: 0x02 integer,
		/// 0x05 byte array (hex), 0x07 string, 0x10 array (hex).
		#[arg(trailing_var_arg = true, allow_hyphen_values = true)]
		args: Vec<String>,
	},

	/// Print the confirmation count of a transaction.
	TxConfirmation {
		/// Network name (e.g. TestNet) or explorer URL.
		net: String,

		/// Transaction id.
		txid: String,
	},
}
