use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;

/// JSON-RPC 2.0 client for a single node endpoint.
pub struct RpcClient {
	url: String,
	http: reqwest::Client,
}

impl RpcClient {
	pub fn new(url: &str) -> Self {
		Self {
			url: url.to_owned(),
			http: reqwest::Client::new(),
		}
	}

	pub fn url(&self) -> &str {
		&self.url
	}

	/// Send one request and return its `result`. An `error` member, or a
	/// response with neither, is an error.
	pub async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
		let body = json!({
			"id": 1,
			"jsonrpc": "2.0",
			"method": method,
			"params": params,
		});
		debug!(url = %self.url, method, "rpc request");

		let resp: Value = self
			.http
			.post(&self.url)
			.json(&body)
			.send()
			.await
			.with_context(|| format!("{method} request to {} failed", self.url))?
			.json()
			.await
			.with_context(|| format!("{method} returned a malformed response"))?;

		if let Some(err) = resp.get("error").filter(|e| !e.is_null()) {
			return Err(anyhow!("{method} RPC error: {err}"));
		}
		let result = resp
			.get("result")
			.cloned()
			.ok_or_else(|| anyhow!("{method} RPC response has no result"))?;
		serde_json::from_value(result)
			.with_context(|| format!("{method} returned an unexpected result"))
	}

	// -- Node queries --

	pub async fn get_block_count(&self) -> Result<u64> {
		self.call("getblockcount", json!([])).await
	}

	/// Raw stored value (hex) under `key` in the contract's storage, or
	/// `None` when the key is absent.
	pub async fn get_storage(&self, script_hash: &str, key: &str) -> Result<Option<String>> {
		self.call("getstorage", json!([script_hash, key])).await
	}

	/// Verbose transaction lookup.
	pub async fn get_raw_transaction(&self, txid: &str) -> Result<Value> {
		self.call("getrawtransaction", json!([txid, 1])).await
	}

	/// Confirmation count of a transaction; zero while it is not in a block.
	pub async fn get_confirmations(&self, txid: &str) -> Result<u64> {
		let tx = self.get_raw_transaction(txid).await?;
		Ok(tx.get("confirmations").and_then(Value::as_u64).unwrap_or(0))
	}

	/// Broadcast a serialized transaction. `false` means the node refused it.
	pub async fn send_raw_transaction(&self, tx_hex: &str) -> Result<bool> {
		self.call("sendrawtransaction", json!([tx_hex])).await
	}
}
