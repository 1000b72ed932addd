/*
    Regroups a sequence of `from_bits` wide values into `to_bits` wide values.

    Encoding uses (8 -> 5, pad) and decoding uses (5 -> 8, no pad).
*/

use crate::error::{Result, VaultError};

/**
    Repacks `data` from groups of `from_bits` into groups of `to_bits`.

    With `pad` set, leftover bits are emitted as one final group padded with
    zeros on the right. Without it the leftover must be shorter than one input
    group and all zero, otherwise information would be dropped silently.
*/
pub fn repack(data: &[u8], from_bits: u32, to_bits: u32, pad: bool) -> Result<Vec<u8>> {
    if !(1..=8).contains(&from_bits) || !(1..=8).contains(&to_bits) {
        return Err(VaultError::InvalidBitWidth { from: from_bits, to: to_bits });
    }

    let max_value: u32 = (1 << to_bits) - 1;
    let max_acc: u32 = (1 << (from_bits + to_bits - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut out = Vec::with_capacity((data.len() * from_bits as usize + to_bits as usize - 1) / to_bits as usize);

    for &value in data {
        if (value as u32) >> from_bits != 0 {
            return Err(VaultError::EncodingOverflow { value, bits: from_bits });
        }
        acc = ((acc << from_bits) | value as u32) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(VaultError::TrailingBitsNonZero);
    }

    Ok(out)
}
