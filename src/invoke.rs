use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::assets;
use crate::balance::Balance;
use crate::config::InvokeConfig;
use crate::contract_param::ContractParam;
use crate::neoscan::NeoscanClient;
use crate::primitives::{Fixed8, UInt160, UInt256};
use crate::rpc::RpcClient;
use crate::script;
use crate::tx_builder::{self, TransferIntent};
use crate::wallet::Account;

/// Everything needed to build and submit one contract invocation.
#[derive(Debug, Clone)]
pub struct InvocationRequest {
	pub net: String,
	pub account: Account,
	pub contract: UInt160,
	pub operation: String,
	pub args: Vec<ContractParam>,
	pub gas: Fixed8,
	pub intents: Vec<TransferIntent>,
}

impl InvocationRequest {
	/// Derive the signing account from `wif` and attach the fixed gas cost
	/// and self-transfer from `fees`.
	pub fn new(
		net: &str,
		wif: &str,
		contract: &str,
		operation: &str,
		args: Vec<ContractParam>,
		fees: &InvokeConfig,
	) -> Result<Self> {
		let account = Account::parse(wif).context("invalid signing key")?;
		account.signing_key().context("invalid signing key")?;
		let contract = UInt160::from_display_hex(contract)
			.with_context(|| format!("invalid contract script hash '{contract}'"))?;

		let intents = vec![TransferIntent {
			asset_id: assets::GAS.asset_id(),
			value: fees.self_transfer,
			script_hash: account.script_hash(),
		}];

		Ok(Self {
			net: net.to_owned(),
			account,
			contract,
			operation: operation.to_owned(),
			args,
			gas: fees.gas,
			intents,
		})
	}

	pub fn script(&self) -> Vec<u8> {
		script::invocation_script(&self.contract, &self.operation, &self.args)
	}
}

/// What the submission pipeline hands back: the balance it worked from
/// and, if the node accepted the transaction, its id.
#[derive(Debug, Clone)]
pub struct InvokeResponse {
	pub balance: Balance,
	pub txid: Option<UInt256>,
}

/// Looks up funds, builds, signs and broadcasts an invocation as a
/// single operation.
#[async_trait::async_trait]
pub trait Invoker: Send + Sync {
	async fn do_invoke(&self, request: &InvocationRequest) -> Result<InvokeResponse>;
}

/// Final classification of an invocation attempt.
#[derive(Debug, Clone)]
pub enum InvocationOutcome {
	/// Accepted by the node for broadcast; not yet confirmed on chain.
	Success { balance: Balance, txid: UInt256 },
	Failure { reason: String },
}

impl InvocationOutcome {
	pub fn is_success(&self) -> bool {
		matches!(self, Self::Success { .. })
	}
}

/// Submit `request` and classify the result. A response without a
/// transaction id is a failure even when nothing errored.
pub async fn submit(invoker: &dyn Invoker, request: &InvocationRequest) -> InvocationOutcome {
	info!(
		contract = %request.contract,
		operation = %request.operation,
		args = request.args.len(),
		"invocation built"
	);
	match invoker.do_invoke(request).await {
		Ok(InvokeResponse {
			balance,
			txid: Some(txid),
		}) => {
			info!(%txid, "invocation accepted");
			InvocationOutcome::Success { balance, txid }
		}
		Ok(InvokeResponse { txid: None, .. }) => {
			debug!("invocation rejected: no transaction id");
			InvocationOutcome::Failure {
				reason: "No transaction id received from invocation".into(),
			}
		}
		Err(err) => {
			debug!(error = %err, "invocation failed");
			InvocationOutcome::Failure {
				reason: format!("{err:#}"),
			}
		}
	}
}

/// Production pipeline: explorer balance, local signing, node broadcast.
pub struct NodeInvoker {
	neoscan: NeoscanClient,
	rpc_url: Option<String>,
}

impl NodeInvoker {
	/// `rpc_url` overrides explorer node discovery when set.
	pub fn new(neoscan_url: &str, rpc_url: Option<String>) -> Self {
		Self {
			neoscan: NeoscanClient::new(neoscan_url),
			rpc_url,
		}
	}

	async fn node(&self) -> Result<RpcClient> {
		let url = match &self.rpc_url {
			Some(url) => url.clone(),
			None => self.neoscan.best_rpc_endpoint().await?,
		};
		Ok(RpcClient::new(&url))
	}
}

#[async_trait::async_trait]
impl Invoker for NodeInvoker {
	async fn do_invoke(&self, request: &InvocationRequest) -> Result<InvokeResponse> {
		let address = request.account.address();
		let mut balance = self
			.neoscan
			.get_balance(&request.net, &address)
			.await
			.context("balance lookup failed")?;

		let mut tx = tx_builder::build_invocation(
			&balance,
			&request.intents,
			request.script(),
			request.gas,
		)?;
		tx.sign(&request.account)?;
		let txid = tx.hash();
		debug!(%txid, raw = %tx.to_hex(), "signed invocation");

		let node = self.node().await?;
		info!(url = node.url(), %txid, "invocation submitted");
		let accepted = node.send_raw_transaction(&tx.to_hex()).await?;
		if !accepted {
			return Ok(InvokeResponse {
				balance,
				txid: None,
			});
		}

		balance.apply_tx(&tx, &request.account.script_hash());
		Ok(InvokeResponse {
			balance,
			txid: Some(txid),
		})
	}
}
