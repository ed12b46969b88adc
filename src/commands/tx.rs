use anyhow::Result;

use crate::cli::Cli;
use crate::commands::resolve_rpc;
use crate::config::Config;
use crate::rpc::RpcClient;

pub async fn run(cli: &Cli, net: &str, txid: &str) -> Result<()> {
	let config = Config::load()?;
	let rpc = RpcClient::new(&resolve_rpc(cli, &config, net).await?);

	let confirmations = rpc.get_confirmations(txid).await?;
	println!("{confirmations}");
	Ok(())
}
