/*
    Hash-lock vault derivation.

    Secret -> Sha256 -> hash-lock redeem script -> Hash160 -> CashAddr

    Every step is a pure function of the previous one, so a vault is never
    stored: it is recomputed from its secret whenever it is needed.
*/

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::{
    address::Address,
    config::Network,
    encoding::cashaddr::{AddressType, CashAddrCodec},
    entropy,
    error::{Result, VaultError},
    hash,
    script::RedeemScript,
    util::{decode_02x, encode_02x}
};

pub const SECRET_LEN: usize = 32;

/// 32 random bytes known only to the vault's creator until revealed.
/// Not comparable: compare derived hashes instead.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Secret([u8; SECRET_LEN]);

impl Secret {
    pub fn new(bytes: [u8; SECRET_LEN]) -> Self {
        Self(bytes)
    }

    /**
        Parses a hex secret. Anything but exactly 32 bytes fails with
        `InvalidHexInput` before any hashing happens.
    */
    pub fn from_hex(hex: &str) -> Result<Self> {
        let bytes = Zeroizing::new(decode_02x(hex)?);
        if bytes.len() != SECRET_LEN {
            return Err(VaultError::InvalidHexInput(format!(
                "expected {} bytes, found {}", SECRET_LEN, bytes.len()
            )));
        }

        let mut secret = Self([0u8; SECRET_LEN]);
        secret.0.copy_from_slice(&bytes);
        Ok(secret)
    }

    pub fn as_bytes(&self) -> &[u8; SECRET_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        encode_02x(&self.0)
    }

    /// Sha256 of the secret, the value committed to by the redeem script.
    pub fn hash(&self) -> SecretHash {
        SecretHash(hash::sha256(self.0))
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Secret(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretHash(pub [u8; 32]);

impl SecretHash {
    pub fn to_hex(&self) -> String {
        encode_02x(&self.0)
    }
}

/// Hash160 of a redeem script, the payload of its P2SH address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramHash(pub [u8; 20]);

impl ProgramHash {
    pub fn to_hex(&self) -> String {
        encode_02x(&self.0)
    }
}

/// A freshly derived vault. All fields follow from `secret`.
#[derive(Debug, Clone)]
pub struct Vault {
    pub secret: Secret,
    pub secret_hash: SecretHash,
    pub locking_script: RedeemScript,
    pub address: String,
    pub legacy_address: String
}

#[derive(Debug, Clone)]
pub struct HashLockVault {
    codec: CashAddrCodec,
    network: Network
}

impl HashLockVault {
    pub fn new(codec: CashAddrCodec, network: Network) -> Self {
        Self { codec, network }
    }

    pub fn codec(&self) -> &CashAddrCodec {
        &self.codec
    }

    /**
        Draws a new secret from the OS entropy source.
    */
    pub fn create_secret() -> Result<Secret> {
        Ok(Secret(entropy::random_bytes::<SECRET_LEN>()?))
    }

    /**
        OP_SHA256 PUSH(32) <sha256(secret)> OP_EQUAL
    */
    pub fn derive_locking_script(secret: &Secret) -> RedeemScript {
        RedeemScript::hash_lock(&secret.hash().0)
    }

    /**
        Ripemd160( Sha256( script ) )
    */
    pub fn derive_program_hash(script: &RedeemScript) -> ProgramHash {
        ProgramHash(script.hash())
    }

    /**
        Creates a vault around a new random secret.
    */
    pub fn create_vault(&self) -> Result<Vault> {
        self.vault_from_secret(Self::create_secret()?)
    }

    /**
        Derives the full vault for a known secret.
    */
    pub fn vault_from_secret(&self, secret: Secret) -> Result<Vault> {
        let locking_script = Self::derive_locking_script(&secret);
        let address = self.codec.encode(&Self::derive_program_hash(&locking_script).0, AddressType::ScriptHash)?;

        Ok(Vault {
            secret_hash: secret.hash(),
            legacy_address: Address::legacy_from_script(&locking_script, self.network),
            locking_script,
            address,
            secret
        })
    }

    /**
        Re-derives the address and locking script of a revealed secret.
        There is nothing to look up, validity is structural.
    */
    pub fn validate_secret(&self, secret: &Secret) -> Result<(String, RedeemScript)> {
        let locking_script = Self::derive_locking_script(secret);
        let address = Address::from_script(&locking_script, &self.codec)?;
        Ok((address, locking_script))
    }

    /**
        True if `secret` unlocks `address`.

        The address is decoded rather than string-compared so that case and
        an omitted prefix do not matter.
    */
    pub fn verify(&self, secret: &Secret, address: &str) -> Result<bool> {
        let decoded = self.codec.decode_expected(address)?;
        let expected = Self::derive_program_hash(&Self::derive_locking_script(secret));

        Ok(decoded.address_type() == AddressType::ScriptHash && decoded.hash() == &expected.0[..])
    }
}

impl Default for HashLockVault {
    fn default() -> Self {
        Self::new(CashAddrCodec::default(), Network::Mainnet)
    }
}
