/*
    The service layer exposed to the request boundary.

    `VaultService` is stateless apart from its configuration and the wallet
    service handle it is given. The core operations return `Result`; the
    `handle_*` methods wrap them in the uniform `{success, ...}` envelope the
    boundary speaks.
*/

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    address::Address,
    config::VaultConfig,
    encoding::cashaddr::CashAddrCodec,
    error::{Result, VaultError},
    key::{PrivKey, PubKey},
    script::RedeemScript,
    vault::{HashLockVault, Secret, Vault},
    wallet::{BalanceUnit, SweepRequest, WalletService}
};

/// Boundary response: `{"success": true, ...data}` or `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn err(error: &VaultError) -> Self {
        Self { success: false, data: None, error: Some(error.to_string()) }
    }
}

impl<T> From<Result<T>> for Envelope<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(&e)
        }
    }
}

/// Response of `CREATE_VAULT`. Carries the secret, which is never kept server side.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedVault {
    pub secret: String,
    pub secret_hash: String,
    pub address: String,
    pub legacy_address: String,
    pub locking_script: String
}

impl From<&Vault> for CreatedVault {
    fn from(vault: &Vault) -> Self {
        Self {
            secret: vault.secret.to_hex(),
            secret_hash: vault.secret_hash.to_hex(),
            address: vault.address.clone(),
            legacy_address: vault.legacy_address.clone(),
            locking_script: vault.locking_script.to_hex()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretDescription {
    pub address: String,
    pub locking_script_hex: String
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub balance: u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReceipt {
    pub message: String,
    pub txid: String
}

/// A single-key identity, generated or imported. Holds the private key in WIF.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyIdentity {
    pub private_key_wif: String,
    pub public_key: String,
    pub address: String,
    pub legacy_address: String
}

pub struct VaultService {
    config: VaultConfig,
    vaults: HashLockVault,
    wallet: Arc<dyn WalletService>
}

impl VaultService {
    /// Create a service. The wallet handle is owned by the caller's process
    /// entry point and shared with anything else that needs it.
    pub fn new(config: VaultConfig, wallet: Arc<dyn WalletService>) -> Result<Self> {
        config.validate()?;
        let vaults = HashLockVault::new(CashAddrCodec::new(config.address_prefix.clone()), config.network);
        Ok(Self { config, vaults, wallet })
    }

    pub fn config(&self) -> &VaultConfig {
        &self.config
    }

    fn codec(&self) -> &CashAddrCodec {
        self.vaults.codec()
    }

    /// Create a new vault. Consumes entropy, persists nothing.
    #[instrument(skip(self))]
    pub fn create(&self) -> Result<Vault> {
        let vault = self.vaults.create_vault()?;
        info!(address = %vault.address, "created hash-lock vault");
        Ok(vault)
    }

    /// Re-derive the address and locking script of a hex secret.
    #[instrument(skip(self, secret_hex))]
    pub fn validate_and_describe(&self, secret_hex: &str) -> Result<SecretDescription> {
        let secret = Secret::from_hex(secret_hex)?;
        let (address, locking_script) = self.vaults.validate_secret(&secret)?;
        debug!(%address, "described secret");

        Ok(SecretDescription { address, locking_script_hex: locking_script.to_hex() })
    }

    /// Check a revealed secret against a published address.
    #[instrument(skip(self, secret_hex))]
    pub fn verify(&self, secret_hex: &str, address: &str) -> Result<bool> {
        let secret = Secret::from_hex(secret_hex)?;
        self.vaults.verify(&secret, address)
    }

    /// Generate a new private key and its P2PKH addresses.
    #[instrument(skip(self))]
    pub fn generate_identity(&self) -> Result<KeyIdentity> {
        let identity = self.identity_of(&PrivKey::new_rand()?)?;
        info!(address = %identity.address, "generated key identity");
        Ok(identity)
    }

    /// Addresses and public key of an imported WIF private key.
    #[instrument(skip(self, wif))]
    pub fn describe_identity(&self, wif: &str) -> Result<KeyIdentity> {
        let identity = self.identity_of(&PrivKey::from_wif(wif)?)?;
        debug!(address = %identity.address, "described key identity");
        Ok(identity)
    }

    fn identity_of(&self, key: &PrivKey) -> Result<KeyIdentity> {
        let pk = PubKey::from_priv_key(key);

        Ok(KeyIdentity {
            private_key_wif: key.export_as_wif(self.config.network),
            public_key: pk.as_hex(),
            address: Address::from_pub_key(&pk, self.codec())?,
            legacy_address: Address::legacy_from_pub_key(&pk, self.config.network)
        })
    }

    /// Balance of `address` in satoshis, as reported by the wallet service.
    #[instrument(skip(self))]
    pub async fn get_balance(&self, address: &str) -> Result<u64> {
        let address = self.codec().decode_expected(address)?.to_string();
        let wallet = self.wallet.watch_only(&address).await?;
        let balance = wallet.get_balance(BalanceUnit::Satoshi).await?;
        debug!(address = wallet.address(), balance, "fetched balance");
        Ok(balance)
    }

    /// Sweep the vault unlocked by `secret_hex` to `to_address`.
    ///
    /// Rejects balances below the dust threshold before anything is built;
    /// construction, signing and broadcast belong to the wallet service.
    #[instrument(skip(self, secret_hex))]
    pub async fn sweep(&self, secret_hex: &str, to_address: &str) -> Result<SweepReceipt> {
        let secret = Secret::from_hex(secret_hex)?;
        let to_address = self.codec().decode_expected(to_address)?.to_string();
        let (from_address, locking_script) = self.vaults.validate_secret(&secret)?;

        let wallet = self.wallet.watch_only(&from_address).await?;
        let balance = wallet.get_balance(BalanceUnit::Satoshi).await?;
        if balance < self.config.dust_threshold {
            warn!(from_address = wallet.address(), balance, threshold = self.config.dust_threshold, "refusing to sweep dust");
            return Err(VaultError::InsufficientFunds { balance, threshold: self.config.dust_threshold });
        }

        let amount_sats = balance
            .checked_sub(self.config.sweep_fee)
            .filter(|amount| *amount > 0)
            .ok_or(VaultError::InsufficientFunds { balance, threshold: self.config.dust_threshold })?;

        let request = SweepRequest {
            from_address,
            to_address,
            amount_sats,
            fee_sats: self.config.sweep_fee,
            script_pub_key: RedeemScript::p2sh(&locking_script),
            unlocking_script: RedeemScript::unlocking(secret.as_bytes(), &locking_script),
            locking_script
        };
        let txid = self.wallet.broadcast(&request).await?;
        info!(%txid, amount_sats, to = %request.to_address, "swept vault");

        Ok(SweepReceipt {
            message: format!("Swept {} satoshis to {}", amount_sats, request.to_address),
            txid
        })
    }

    /// `CREATE_VAULT`
    pub fn handle_create_vault(&self) -> Envelope<CreatedVault> {
        self.create().map(|vault| CreatedVault::from(&vault)).into()
    }

    /// `GET_BALANCE`
    pub async fn handle_get_balance(&self, address: &str) -> Envelope<Balance> {
        self.get_balance(address).await.map(|balance| Balance { balance }).into()
    }

    /// `SWEEP`
    pub async fn handle_sweep(&self, secret_hex: &str, to_address: &str) -> Envelope<SweepReceipt> {
        self.sweep(secret_hex, to_address).await.into()
    }

    /// `VALIDATE_SECRET`
    pub fn handle_validate_secret(&self, secret_hex: &str) -> Envelope<SecretDescription> {
        self.validate_and_describe(secret_hex).into()
    }

    /// `GENERATE_KEY`
    pub fn handle_generate_identity(&self) -> Envelope<KeyIdentity> {
        self.generate_identity().into()
    }

    /// `IMPORT_KEY`
    pub fn handle_describe_identity(&self, wif: &str) -> Envelope<KeyIdentity> {
        self.describe_identity(wif).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockWalletService;

    const ZERO_SECRET: &str = "0000000000000000000000000000000000000000000000000000000000000000";
    const ZERO_VAULT: &str = "bitcoincash:ppdv2yxh7z2w9lnl7rru76cg9v8kae649u98hfeked";
    const DESTINATION: &str = "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";

    fn service(wallet: Arc<MockWalletService>) -> VaultService {
        VaultService::new(VaultConfig::default(), wallet).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = VaultConfig::default().with_address_prefix("");
        assert!(VaultService::new(config, MockWalletService::new()).is_err());
    }

    #[test]
    fn create_envelope_shape() {
        let envelope = service(MockWalletService::new()).handle_create_vault();
        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["secret"].as_str().unwrap().len(), 64);
        assert_eq!(json["secretHash"].as_str().unwrap().len(), 64);
        assert_eq!(json["lockingScript"].as_str().unwrap().len(), 70);
        assert!(json["address"].as_str().unwrap().starts_with("bitcoincash:p"));
        assert!(json.get("error").is_none());
    }

    #[test]
    fn describe_zero_secret() {
        let description = service(MockWalletService::new()).validate_and_describe(ZERO_SECRET).unwrap();
        assert_eq!(description.address, ZERO_VAULT);
        assert_eq!(
            description.locking_script_hex,
            "a82066687aadf862bd776c8fc18b8e9f8e20089714856ee233b3902a591d0d5f292587"
        );
    }

    #[test]
    fn malformed_secret_envelope() {
        let envelope = service(MockWalletService::new()).handle_validate_secret(&"ab".repeat(31));
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().starts_with("invalid hex input"));
        assert!(json.get("address").is_none());
    }

    #[test]
    fn identity_is_consistent() {
        let identity = service(MockWalletService::new()).generate_identity().unwrap();
        let key = PrivKey::from_wif(&identity.private_key_wif).unwrap();
        let pk = PubKey::from_priv_key(&key);
        assert_eq!(pk.as_hex(), identity.public_key);
        assert!(identity.address.starts_with("bitcoincash:q"));
        assert!(identity.legacy_address.starts_with('1'));
    }

    #[test]
    fn imported_key_matches_generated_identity() {
        let service = service(MockWalletService::new());
        let generated = service.generate_identity().unwrap();
        assert!(generated == service.describe_identity(&generated.private_key_wif).unwrap());

        //Key 1, exported compressed whatever form it was imported in
        let identity = service.describe_identity("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf").unwrap();
        assert_eq!(identity.private_key_wif, "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn");
        assert_eq!(identity.address, "bitcoincash:qp63uahgrxged4z5jswyt5dn5v3lzsem6cy4spdc2h");
        assert_eq!(identity.legacy_address, "1BgGZ9tcN4rm9KBzDn7KprQz87SZ26SAMH");
    }

    #[test]
    fn malformed_wif_is_rejected() {
        let service = service(MockWalletService::new());
        assert!(matches!(
            service.describe_identity("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWo"),
            Err(VaultError::Base58(_))
        ));
        assert!(matches!(
            service.describe_identity("124ERAK4SqHMNWXycHPautn5zDYRKr3b2E"),
            Err(VaultError::InvalidKey(_))
        ));

        let envelope = service.handle_describe_identity("not a key");
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
    }

    #[tokio::test]
    async fn sweep_below_dust_threshold() {
        let wallet = MockWalletService::new();
        wallet.set_balance(ZERO_VAULT, 999);

        let envelope = service(wallet.clone()).handle_sweep(ZERO_SECRET, DESTINATION).await;
        assert!(!envelope.success);
        assert!(envelope.error.unwrap().starts_with("Insufficient funds"));
        assert!(wallet.broadcasts().is_empty());
    }

    #[tokio::test]
    async fn sweep_at_dust_threshold() {
        let wallet = MockWalletService::new();
        wallet.set_balance(ZERO_VAULT, 1000);

        let receipt = service(wallet.clone()).sweep(ZERO_SECRET, DESTINATION).await.unwrap();
        assert_eq!(receipt.message, format!("Swept 500 satoshis to {}", DESTINATION));

        let broadcasts = wallet.broadcasts();
        assert_eq!(broadcasts.len(), 1);
        assert_eq!(broadcasts[0].amount_sats, 500);
        assert_eq!(broadcasts[0].from_address, ZERO_VAULT);
        assert_eq!(broadcasts[0].unlocking_script.as_bytes()[1..33], [0u8; 32]);
    }

    #[tokio::test]
    async fn sweep_rejects_foreign_destination() {
        let wallet = MockWalletService::new();
        wallet.set_balance(ZERO_VAULT, 50_000);

        let result = service(wallet.clone())
            .sweep(ZERO_SECRET, "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t")
            .await;
        assert!(matches!(result, Err(VaultError::PrefixMismatch { .. })));
        assert!(wallet.broadcasts().is_empty());
    }
}
