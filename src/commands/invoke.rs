use anyhow::{anyhow, Result};
use tracing::debug;

use crate::balance::Balance;
use crate::cli::Cli;
use crate::config::{Config, InvokeConfig};
use crate::contract_param;
use crate::invoke::{self, InvocationOutcome, InvocationRequest, Invoker, NodeInvoker};
use crate::primitives::UInt256;

pub async fn run(
	cli: &Cli,
	net: &str,
	wif: &str,
	balance_json: &str,
	contract: &str,
	operation: &str,
	args: &[String],
) -> Result<()> {
	debug!(ignored = balance_json, "balance argument is not used");

	let config = Config::load()?;
	let invoker = NodeInvoker::new(&config.neoscan_url(net)?, cli.rpc_url.clone());
	let (balance, txid) =
		execute(&invoker, &config.invoke, net, wif, contract, operation, args).await?;

	println!("{}", serde_json::to_string(&balance)?);
	println!("{txid}");
	Ok(())
}

/// Encode `args`, then build and submit the invocation through `invoker`.
/// A failed outcome becomes an error carrying its reason.
pub async fn execute(
	invoker: &dyn Invoker,
	fees: &InvokeConfig,
	net: &str,
	wif: &str,
	contract: &str,
	operation: &str,
	args: &[String],
) -> Result<(Balance, UInt256)> {
	// Bad argument types abort before anything touches the network.
	let args = contract_param::encode_args(args)?;
	let request = InvocationRequest::new(net, wif, contract, operation, args, fees)?;

	match invoke::submit(invoker, &request).await {
		InvocationOutcome::Success { balance, txid } => Ok((balance, txid)),
		InvocationOutcome::Failure { reason } => Err(anyhow!(reason)),
	}
}
