use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use neo_contract_cli::cli::{Cli, Command};
use neo_contract_cli::commands;

#[tokio::main]
async fn main() {
	init_tracing();
	let cli = Cli::parse();

	let result = match &cli.command {
		Command::Account { key } => commands::account::run(key),
		Command::Getstorage {
			net,
			script_hash,
			key,
		} => commands::getstorage::run(&cli, net, script_hash, key).await,
		Command::Invoke {
			net,
			wif,
			balance,
			contract,
			operation,
			args,
		} => commands::invoke::run(&cli, net, wif, balance, contract, operation, args).await,
		Command::TxConfirmation { net, txid } => commands::tx::run(&cli, net, txid).await,
	};

	commands::report(result);
}

/// Logs go to stderr so stdout stays machine-readable. `RUST_LOG` overrides
/// the default `warn` level.
fn init_tracing() {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.try_init();
}
