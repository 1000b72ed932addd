use rand::RngCore;

use crate::{
    OsRng,
    error::{Result, VaultError}
};

/**
    Fills a fixed size buffer with random bytes from the OS entropy source.

    A failing source is reported as `EntropyUnavailable` and never retried
    with a weaker generator.
*/
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| VaultError::EntropyUnavailable(e.to_string()))?;
    Ok(bytes)
}
