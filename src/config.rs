/*
    Service configuration.

    Network, address prefix, dust threshold and sweep fee. Defaults are the
    mainnet values; JSON or the environment can override them.
*/

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VaultError};

/// Network the service derives addresses for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    Regtest
}

impl Network {
    /// CashAddr prefix used on this network.
    pub fn cashaddr_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "bitcoincash",
            Self::Testnet => "bchtest",
            Self::Regtest => "bchreg"
        }
    }

    /// Base58Check version byte of legacy P2PKH addresses.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Self::Mainnet => 0x00,
            Self::Testnet | Self::Regtest => 0x6f
        }
    }

    /// Base58Check version byte of legacy P2SH addresses.
    pub fn p2sh_version(&self) -> u8 {
        match self {
            Self::Mainnet => 0x05,
            Self::Testnet | Self::Regtest => 0xc4
        }
    }

    /// Base58Check version byte of WIF private keys.
    pub fn wif_version(&self) -> u8 {
        match self {
            Self::Mainnet => 0x80,
            Self::Testnet | Self::Regtest => 0xef
        }
    }
}

impl std::str::FromStr for Network {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            other => Err(VaultError::Config(format!("unknown network {}", other)))
        }
    }
}

/// Configuration for [`crate::service::VaultService`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Network used for legacy version bytes.
    #[serde(default)]
    pub network: Network,

    /// CashAddr prefix, also assumed when a caller omits it.
    #[serde(default = "default_prefix")]
    pub address_prefix: String,

    /// Minimum balance in satoshis below which a sweep is rejected.
    #[serde(default = "default_dust_threshold")]
    pub dust_threshold: u64,

    /// Flat fee in satoshis left to miners when sweeping the full balance.
    #[serde(default = "default_sweep_fee")]
    pub sweep_fee: u64
}

fn default_prefix() -> String {
    Network::Mainnet.cashaddr_prefix().to_string()
}

fn default_dust_threshold() -> u64 {
    1000
}

fn default_sweep_fee() -> u64 {
    500
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            address_prefix: default_prefix(),
            dust_threshold: default_dust_threshold(),
            sweep_fee: default_sweep_fee()
        }
    }
}

impl VaultConfig {
    pub const ENV_NETWORK: &'static str = "HASHLOCK_NETWORK";
    pub const ENV_ADDRESS_PREFIX: &'static str = "HASHLOCK_ADDRESS_PREFIX";
    pub const ENV_DUST_THRESHOLD: &'static str = "HASHLOCK_DUST_THRESHOLD";
    pub const ENV_SWEEP_FEE: &'static str = "HASHLOCK_SWEEP_FEE";

    /// Default configuration for the given network.
    pub fn for_network(network: Network) -> Self {
        Self {
            network,
            address_prefix: network.cashaddr_prefix().to_string(),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with the `HASHLOCK_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match lookup(Self::ENV_NETWORK) {
            Some(network) => Self::for_network(network.parse()?),
            None => Self::default()
        };

        if let Some(prefix) = lookup(Self::ENV_ADDRESS_PREFIX) {
            config.address_prefix = prefix;
        }
        if let Some(value) = lookup(Self::ENV_DUST_THRESHOLD) {
            config.dust_threshold = parse_sats(Self::ENV_DUST_THRESHOLD, &value)?;
        }
        if let Some(value) = lookup(Self::ENV_SWEEP_FEE) {
            config.sweep_fee = parse_sats(Self::ENV_SWEEP_FEE, &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the address prefix.
    pub fn with_address_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.address_prefix = prefix.into();
        self
    }

    /// Set the dust threshold.
    pub fn with_dust_threshold(mut self, sats: u64) -> Self {
        self.dust_threshold = sats;
        self
    }

    /// Set the sweep fee.
    pub fn with_sweep_fee(mut self, sats: u64) -> Self {
        self.sweep_fee = sats;
        self
    }

    /// Reject configurations that would produce unusable addresses or sweeps.
    pub fn validate(&self) -> Result<()> {
        if self.address_prefix.is_empty()
            || !self
                .address_prefix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(VaultError::Config(format!(
                "address prefix {:?} must be non-empty lowercase ascii",
                self.address_prefix
            )));
        }
        if self.sweep_fee >= self.dust_threshold {
            return Err(VaultError::Config(format!(
                "sweep fee {} must be below the dust threshold {}",
                self.sweep_fee, self.dust_threshold
            )));
        }
        Ok(())
    }
}

fn parse_sats(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|e| VaultError::Config(format!("{}={:?}: {}", key, value, e)))
}
