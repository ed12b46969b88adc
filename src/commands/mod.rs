pub mod account;
pub mod getstorage;
pub mod invoke;
pub mod tx;

use anyhow::Result;
use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::neoscan::NeoscanClient;

/// Resolve the RPC URL from the CLI flag, or ask the network's explorer.
pub async fn resolve_rpc(cli: &Cli, config: &Config, net: &str) -> Result<String> {
	if let Some(url) = &cli.rpc_url {
		return Ok(url.clone());
	}
	let explorer = NeoscanClient::new(&config.neoscan_url(net)?);
	let url = explorer.best_rpc_endpoint().await?;
	debug!(net, %url, "using discovered endpoint");
	Ok(url)
}

/// Print a failed command's error to stderr. The exit status stays 0.
pub fn report(result: Result<()>) {
	if let Err(err) = result {
		eprintln!("{err:#}");
	}
}
