/*
    40 bit BCH checksum of the CashAddr format.

    The checksum covers the expanded prefix, the 5-bit payload and eight
    zero groups standing in for the checksum itself. A string carrying a
    valid checksum evaluates to exactly zero.
*/

/// Generator constants, one per bit of the top group shifted out of the accumulator.
const GENERATORS: [u64; 5] = [
    0x98f2bc8e61,
    0x79b76d99e2,
    0xf33e5fb3c4,
    0xae2eabe2a8,
    0x1e4f43e470
];

pub const CHECKSUM_LEN: usize = 8;

/**
    Lower 5 bits of every prefix character followed by a zero separator group.
*/
pub fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut expanded: Vec<u8> = prefix.bytes().map(|c| c & 0x1f).collect();
    expanded.push(0);
    expanded
}

/**
    Polynomial remainder over GF(32) of the given 5-bit groups, XORed with 1.
*/
pub fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ d as u64;

        for (i, generator) in GENERATORS.iter().enumerate() {
            if c0 & (1 << i) != 0 {
                c ^= generator;
            }
        }
    }

    c ^ 1
}

/**
    Computes the eight checksum groups for `payload` under `prefix`,
    most significant group first.
*/
pub fn checksum(prefix: &str, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(payload);
    values.extend_from_slice(&[0; CHECKSUM_LEN]);

    let m = polymod(&values);
    let mut groups = [0u8; CHECKSUM_LEN];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = ((m >> (5 * (7 - i))) & 0x1f) as u8;
    }
    groups
}

/**
    Checks `data` (payload followed by its checksum groups) against `prefix`.
*/
pub fn verify(prefix: &str, data: &[u8]) -> bool {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(data);
    polymod(&values) == 0
}
