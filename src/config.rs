use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

use crate::primitives::Fixed8;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub networks: BTreeMap<String, NetworkConfig>,
	#[serde(default)]
	pub invoke: InvokeConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
	/// Base URL of the explorer API used for node discovery and balances.
	pub neoscan: String,
}

/// Fixed amounts attached to every invocation.
///
/// The self-transfer exists only because transaction construction needs
/// at least one output; it is not a meaningful payment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct InvokeConfig {
	pub gas: Fixed8,
	pub self_transfer: Fixed8,
}

/// One whole GAS of system fee.
pub const DEFAULT_GAS: Fixed8 = Fixed8::from_raw(100_000_000);

/// 0.00000001 GAS back to the signer.
pub const DEFAULT_SELF_TRANSFER: Fixed8 = Fixed8::from_raw(1);

impl Default for InvokeConfig {
	fn default() -> Self {
		Self {
			gas: DEFAULT_GAS,
			self_transfer: DEFAULT_SELF_TRANSFER,
		}
	}
}

impl Default for Config {
	fn default() -> Self {
		let mut networks = BTreeMap::new();
		networks.insert(
			"MainNet".to_owned(),
			NetworkConfig {
				neoscan: "https://api.neoscan.io/api/main_net".into(),
			},
		);
		networks.insert(
			"TestNet".to_owned(),
			NetworkConfig {
				neoscan: "https://neoscan-testnet.io/api/test_net".into(),
			},
		);
		Self {
			networks,
			invoke: InvokeConfig::default(),
		}
	}
}

impl Config {
	/// Directory where CLI state is stored (~/.neo-contract/).
	pub fn dir() -> anyhow::Result<PathBuf> {
		dirs::home_dir()
			.map(|home| home.join(".neo-contract"))
			.ok_or_else(|| anyhow!("could not determine home directory"))
	}

	/// Path to the config file.
	pub fn path() -> anyhow::Result<PathBuf> {
		Ok(Self::dir()?.join("config.toml"))
	}

	/// Load config from disk, falling back to defaults if no file exists.
	pub fn load() -> anyhow::Result<Self> {
		let path = Self::path()?;
		if path.exists() {
			let content = std::fs::read_to_string(&path)?;
			toml::from_str(&content).with_context(|| format!("invalid config at {}", path.display()))
		} else {
			Ok(Self::default())
		}
	}

	/// Explorer base URL for a network name. Names match case-insensitively;
	/// anything that looks like a URL is used as the explorer itself.
	pub fn neoscan_url(&self, network: &str) -> anyhow::Result<String> {
		if let Some((_, cfg)) = self
			.networks
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(network))
		{
			return Ok(cfg.neoscan.clone());
		}
		if network.starts_with("http://") || network.starts_with("https://") {
			return Ok(network.to_owned());
		}
		Err(anyhow!(
			"unknown network '{network}' (configured: {})",
			self.networks.keys().cloned().collect::<Vec<_>>().join(", ")
		))
	}
}
