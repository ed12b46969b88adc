use anyhow::Result;

use crate::cli::Cli;
use crate::commands::resolve_rpc;
use crate::config::Config;
use crate::rpc::RpcClient;

pub async fn run(cli: &Cli, net: &str, script_hash: &str, key: &str) -> Result<()> {
	let config = Config::load()?;
	let rpc = RpcClient::new(&resolve_rpc(cli, &config, net).await?);

	let value = rpc.get_storage(script_hash, key).await?;
	println!("{}", value.as_deref().unwrap_or("null"));
	Ok(())
}
