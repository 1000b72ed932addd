/*
    Contract of the external wallet service.

    Balance lookup, UTXO discovery, transaction construction and broadcast
    live outside this crate. The service layer only talks to them through
    these traits, using a handle the process entry point constructs once and
    passes in.
*/

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{script::RedeemScript, Result};

/// Unit a balance is requested in. Balances cross the contract as whole
/// satoshis, never as fractional coins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BalanceUnit {
    Satoshi
}

/// Everything the wallet service needs to spend a hash-lock vault.
///
/// The spend needs no signature: the input's unlocking script pushes the
/// secret followed by the redeem script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepRequest {
    /// Vault address being emptied.
    pub from_address: String,
    /// Destination address.
    pub to_address: String,
    /// Amount sent to `to_address` in satoshis, after the fee.
    pub amount_sats: u64,
    /// Fee in satoshis left to miners.
    pub fee_sats: u64,
    /// Output script of the vault's UTXOs (P2SH).
    pub script_pub_key: RedeemScript,
    /// Redeem script revealed by the spend.
    pub locking_script: RedeemScript,
    /// scriptSig for every vault input.
    pub unlocking_script: RedeemScript
}

/// A watch-only view on one address.
#[async_trait]
pub trait WatchOnlyWallet: Send + Sync {
    /// The watched address.
    fn address(&self) -> &str;

    /// Confirmed plus unconfirmed balance of the address.
    async fn get_balance(&self, unit: BalanceUnit) -> Result<u64>;
}

/// Handle on the external ledger-wallet service.
#[async_trait]
pub trait WalletService: Send + Sync {
    /// Open a watch-only wallet on `address`.
    async fn watch_only(&self, address: &str) -> Result<Box<dyn WatchOnlyWallet>>;

    /// Build a transaction spending every UTXO of the vault per `request`,
    /// broadcast it and return its txid.
    async fn broadcast(&self, request: &SweepRequest) -> Result<String>;
}
