/*
    In-memory wallet service for tests.

    Only available with the `test-utils` feature or in test builds.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::{
    error::{Result, VaultError},
    hash,
    util::encode_02x,
    wallet::{BalanceUnit, SweepRequest, WalletService, WatchOnlyWallet}
};

type Balances = Arc<Mutex<HashMap<String, u64>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Wallet service backed by a balance table.
///
/// Broadcasts are recorded rather than sent, and return a txid derived from
/// the request so repeated sweeps of the same vault are distinguishable.
#[derive(Default)]
pub struct MockWalletService {
    balances: Balances,
    broadcasts: Mutex<Vec<SweepRequest>>,
    failure: Mutex<Option<String>>
}

impl MockWalletService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_balance(&self, address: &str, sats: u64) {
        lock(&self.balances).insert(address.to_string(), sats);
    }

    /// Make every subsequent call fail with `ExternalService(message)`.
    pub fn fail_with(&self, message: impl Into<String>) {
        *lock(&self.failure) = Some(message.into());
    }

    pub fn broadcasts(&self) -> Vec<SweepRequest> {
        lock(&self.broadcasts).clone()
    }

    fn check_available(&self) -> Result<()> {
        match lock(&self.failure).as_ref() {
            Some(message) => Err(VaultError::ExternalService(message.clone())),
            None => Ok(())
        }
    }
}

#[async_trait]
impl WalletService for MockWalletService {
    async fn watch_only(&self, address: &str) -> Result<Box<dyn WatchOnlyWallet>> {
        self.check_available()?;
        Ok(Box::new(MockWatchOnlyWallet {
            address: address.to_string(),
            balances: Arc::clone(&self.balances)
        }))
    }

    async fn broadcast(&self, request: &SweepRequest) -> Result<String> {
        self.check_available()?;

        let mut preimage = request.unlocking_script.as_bytes().to_vec();
        preimage.extend_from_slice(request.to_address.as_bytes());
        preimage.extend_from_slice(&request.amount_sats.to_le_bytes());
        let mut txid = hash::sha256d(&preimage);
        txid.reverse();

        lock(&self.balances).insert(request.from_address.clone(), 0);
        lock(&self.broadcasts).push(request.clone());
        Ok(encode_02x(&txid))
    }
}

/// Watch-only view onto the mock's balance table. Unknown addresses hold nothing.
pub struct MockWatchOnlyWallet {
    address: String,
    balances: Balances
}

#[async_trait]
impl WatchOnlyWallet for MockWatchOnlyWallet {
    fn address(&self) -> &str {
        &self.address
    }

    async fn get_balance(&self, unit: BalanceUnit) -> Result<u64> {
        let sats = lock(&self.balances).get(&self.address).copied().unwrap_or(0);
        match unit {
            BalanceUnit::Satoshi => Ok(sats)
        }
    }
}
