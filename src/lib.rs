/*
    Library to derive hash-lock vaults and their addresses for Bitcoin Cash.

    A vault is a random 32 byte secret committed to by a P2SH redeem script:
        OP_SHA256 <sha256(secret)> OP_EQUAL
    The script hash is encoded as a CashAddr, so anyone holding the secret
    can later sweep the address and anyone can verify a revealed secret
    against the published address.

    References:
        - CashAddr format (https://github.com/bitcoincashorg/bitcoincash.org/blob/master/spec/cashaddr.md)

        - The Bitcoin Book (https://github.com/bitcoinbook/bitcoinbook/)
            for P2SH, Base58Check and WIF
*/

//Outward facing modules
pub mod address;
pub mod config;
pub mod encoding;
pub mod error;
pub mod key;
pub mod prelude;
pub mod script;
pub mod service;
pub mod util;
pub mod vault;
pub mod wallet;

//Modules for internal use
mod entropy;
mod hash;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{Result, VaultError};

//Dependencies
use rand::rngs::OsRng;
use ripemd160::Ripemd160;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
