use anyhow::{anyhow, Context, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use crate::balance::{AssetBalance, Balance, Coin};
use crate::primitives::{Fixed8, UInt256};

/// A node as listed by the explorer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeInfo {
	pub url: String,
	pub height: u64,
}

#[derive(Debug, Deserialize)]
pub struct NeoscanBalance {
	pub address: String,
	#[serde(default)]
	pub balance: Option<Vec<NeoscanAsset>>,
}

#[derive(Debug, Deserialize)]
pub struct NeoscanAsset {
	pub asset: String,
	#[serde(default)]
	pub asset_symbol: Option<String>,
	pub amount: Fixed8,
	#[serde(default)]
	pub unspent: Vec<NeoscanUnspent>,
}

#[derive(Debug, Deserialize)]
pub struct NeoscanUnspent {
	pub txid: UInt256,
	pub n: u16,
	pub value: Fixed8,
}

impl NeoscanBalance {
	pub fn into_balance(self, net: &str, address: &str) -> Balance {
		let mut balance = Balance::new(net, address);
		for entry in self.balance.unwrap_or_default() {
			let symbol = entry.asset_symbol.unwrap_or(entry.asset);
			let unspent = entry
				.unspent
				.into_iter()
				.map(|u| Coin {
					index: u.n,
					txid: u.txid,
					value: u.value,
				})
				.collect();
			balance.add_asset(
				&symbol,
				AssetBalance {
					balance: entry.amount,
					unspent,
					..Default::default()
				},
			);
		}
		balance
	}
}

/// Client for a Neoscan-style explorer API (node discovery and balances).
pub struct NeoscanClient {
	base: String,
	http: reqwest::Client,
}

impl NeoscanClient {
	pub fn new(base: &str) -> Self {
		Self {
			base: base.trim_end_matches('/').to_owned(),
			http: reqwest::Client::new(),
		}
	}

	async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
		let url = format!("{}{path}", self.base);
		debug!(%url, "explorer request");
		self.http
			.get(&url)
			.send()
			.await
			.with_context(|| format!("request to {url} failed"))?
			.error_for_status()?
			.json()
			.await
			.with_context(|| format!("malformed response from {url}"))
	}

	pub async fn get_all_nodes(&self) -> Result<Vec<NodeInfo>> {
		self.get("/v1/get_all_nodes").await
	}

	/// Pick an RPC endpoint at random among the nodes at the best height.
	pub async fn best_rpc_endpoint(&self) -> Result<String> {
		let nodes = self.get_all_nodes().await?;
		let url = pick_best_node(&nodes)
			.ok_or_else(|| anyhow!("explorer at {} listed no RPC nodes", self.base))?;
		debug!(%url, "resolved rpc endpoint");
		Ok(url)
	}

	pub async fn get_balance(&self, net: &str, address: &str) -> Result<Balance> {
		let raw: NeoscanBalance = self.get(&format!("/v1/get_balance/{address}")).await?;
		Ok(raw.into_balance(net, address))
	}
}

fn pick_best_node(nodes: &[NodeInfo]) -> Option<String> {
	let best = nodes.iter().map(|n| n.height).max()?;
	let candidates: Vec<&NodeInfo> = nodes.iter().filter(|n| n.height == best).collect();
	candidates
		.choose(&mut rand::thread_rng())
		.map(|n| n.url.clone())
}
