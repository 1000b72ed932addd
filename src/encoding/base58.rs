/*
    Base58Check encoding used for legacy addresses and WIF private keys.
*/

use crate::{
    error::{Result, VaultError},
    hash
};

const CHECKSUM_LEN: usize = 4;

/**
    Returns the Base58Check encoded value of the input data.
    * `version` is prepended before the checksum is computed
*/
pub fn check_encode(version: &[u8], data: &[u8]) -> String {
    let mut bytes = version.to_vec();
    bytes.extend_from_slice(data);

    //Append the first 4 bytes of Sha256d(version | data)
    let checksum = hash::sha256d(&bytes);
    bytes.extend_from_slice(&checksum[..CHECKSUM_LEN]);

    bs58::encode(bytes).into_string()
}

/**
    Returns the decoded version and payload with the checksum removed.
    Version bytes are NOT split off as their length depends on context.
*/
pub fn check_decode(encoded: &str) -> Result<Vec<u8>> {
    let mut bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| VaultError::Base58(e.to_string()))?;
    if bytes.len() <= CHECKSUM_LEN {
        return Err(VaultError::Base58(format!("{} bytes is too short", bytes.len())));
    }

    let checksum = bytes.split_off(bytes.len() - CHECKSUM_LEN);
    if hash::sha256d(&bytes)[..CHECKSUM_LEN] != checksum[..] {
        return Err(VaultError::Base58("bad checksum".to_string()));
    }

    Ok(bytes)
}
