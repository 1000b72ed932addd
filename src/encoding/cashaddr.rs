/*
    Module implements CashAddr encoding

    address = prefix ":" base32( payload | checksum )
    payload = version byte | hash, regrouped into 5-bit groups
*/

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    encoding::{
        bits,
        checksum::{self, CHECKSUM_LEN}
    },
    error::{Result, VaultError}
};

// Encoding character set. Index is the 5-bit value.
pub const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Prefix assumed when an address is given without one.
pub const DEFAULT_PREFIX: &str = "bitcoincash";

pub const SEPARATOR: char = ':';

// Hash lengths addressable by the three size bits of the version byte.
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressType {
    PublicKeyHash,
    ScriptHash
}

impl AddressType {
    fn type_bits(self) -> u8 {
        match self {
            AddressType::PublicKeyHash => 0,
            AddressType::ScriptHash => 1
        }
    }
}

/**
    Version byte for a hash of the given length.

    Bit 7 is reserved, bits 3-6 hold the type and bits 0-2 the size code,
    so 20 byte hashes give 0x00 (P2PKH) and 0x08 (P2SH).
*/
pub fn version_byte(address_type: AddressType, hash_len: usize) -> Result<u8> {
    let size_code = HASH_SIZES
        .iter()
        .position(|&n| n == hash_len)
        .ok_or(VaultError::InvalidHashLength(hash_len))?;

    Ok(address_type.type_bits() << 3 | size_code as u8)
}

/**
    Reads the address type from a version byte and checks its size code
    against the length of the hash that followed it.
*/
fn parse_version_byte(version: u8, hash_len: usize) -> Result<AddressType> {
    let address_type = match version >> 3 {
        0 => AddressType::PublicKeyHash,
        1 => AddressType::ScriptHash,
        _ => return Err(VaultError::UnknownAddressType(version))
    };

    if HASH_SIZES[(version & 0x07) as usize] != hash_len {
        return Err(VaultError::InvalidHashLength(hash_len));
    }

    Ok(address_type)
}

/**
    A validated CashAddr.

    Values only come out of `new` or `decode`, so the canonical encoding is
    always available and formatting cannot fail.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashAddress {
    prefix: String,
    address_type: AddressType,
    hash: Vec<u8>,
    encoded: String
}

impl CashAddress {
    /**
        Builds an address from its parts. Fails on an empty prefix or a hash
        length the version byte cannot describe.
    */
    pub fn new(prefix: &str, address_type: AddressType, hash: &[u8]) -> Result<Self> {
        Ok(Self {
            encoded: encode(prefix, hash, address_type)?,
            prefix: prefix.to_string(),
            address_type,
            hash: hash.to_vec()
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Lower case `prefix:payload` form.
    pub fn as_str(&self) -> &str {
        &self.encoded
    }
}

impl fmt::Display for CashAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.encoded)
    }
}

/**
    Encodes `hash` under `prefix`. The result is always lower case.
*/
pub fn encode(prefix: &str, hash: &[u8], address_type: AddressType) -> Result<String> {
    if prefix.is_empty() {
        return Err(VaultError::MalformedPayload("empty prefix".to_string()));
    }
    let mut payload = vec![version_byte(address_type, hash.len())?];
    payload.extend_from_slice(hash);

    let mut data = bits::repack(&payload, 8, 5, true)?;
    let checksum = checksum::checksum(prefix, &data);
    data.extend_from_slice(&checksum);

    let mut address = String::with_capacity(prefix.len() + 1 + data.len());
    address.push_str(prefix);
    address.push(SEPARATOR);
    address.extend(data.iter().map(|&d| CHARSET[d as usize] as char));
    Ok(address)
}

/**
    Decodes and validates an address.

    An address without a prefix is checked against `default_prefix`.
    Upper case addresses are accepted, mixed case is not.
*/
pub fn decode(address: &str, default_prefix: &str) -> Result<CashAddress> {
    let has_lower = address.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = address.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(VaultError::MixedCase);
    }
    let address = address.to_ascii_lowercase();

    let (prefix, encoded) = match address.split_once(SEPARATOR) {
        Some((prefix, encoded)) => (prefix.to_string(), encoded),
        None => (default_prefix.to_ascii_lowercase(), address.as_str())
    };
    if prefix.is_empty() {
        return Err(VaultError::MalformedPayload("empty prefix".to_string()));
    }

    let data = encoded
        .chars()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x as char == c)
                .map(|p| p as u8)
                .ok_or(VaultError::InvalidCharacter(c))
        })
        .collect::<Result<Vec<u8>>>()?;

    if data.len() <= CHECKSUM_LEN {
        return Err(VaultError::MalformedPayload(format!("only {} characters after the prefix", data.len())));
    }
    if !checksum::verify(&prefix, &data) {
        return Err(VaultError::ChecksumMismatch);
    }

    let payload = bits::repack(&data[..data.len() - CHECKSUM_LEN], 5, 8, false)
        .map_err(|e| VaultError::MalformedPayload(e.to_string()))?;
    let (version, hash) = match payload.split_first() {
        Some((version, hash)) => (*version, hash.to_vec()),
        None => return Err(VaultError::MalformedPayload("empty payload".to_string()))
    };

    Ok(CashAddress {
        address_type: parse_version_byte(version, hash.len())?,
        encoded: format!("{}{}{}", prefix, SEPARATOR, encoded),
        prefix,
        hash
    })
}

/**
    Address codec bound to one network prefix.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashAddrCodec {
    prefix: String
}

impl CashAddrCodec {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn encode(&self, hash: &[u8], address_type: AddressType) -> Result<String> {
        encode(&self.prefix, hash, address_type)
    }

    /// Decodes any valid address, using this codec's prefix when none is given.
    pub fn decode(&self, address: &str) -> Result<CashAddress> {
        decode(address, &self.prefix)
    }

    /// Like `decode` but also rejects addresses written for another prefix.
    pub fn decode_expected(&self, address: &str) -> Result<CashAddress> {
        let decoded = self.decode(address)?;
        if decoded.prefix() != self.prefix {
            return Err(VaultError::PrefixMismatch {
                expected: self.prefix.clone(),
                found: decoded.prefix().to_string()
            });
        }
        Ok(decoded)
    }
}

impl Default for CashAddrCodec {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Test vectors from the CashAddr specification
    const TEST_HASH_20: &str = "f5bf48b397dae70be82b3cca4793f8eb2b6cdac9";

    fn test_hash() -> Vec<u8> {
        hex::decode(TEST_HASH_20).unwrap()
    }

    #[test]
    fn spec_vectors() {
        let hash = test_hash();
        assert_eq!(
            encode("bitcoincash", &hash, AddressType::PublicKeyHash).unwrap(),
            "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"
        );
        assert_eq!(
            encode("bchtest", &hash, AddressType::ScriptHash).unwrap(),
            "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t"
        );
        assert_eq!(
            encode("pref", &hash, AddressType::ScriptHash).unwrap(),
            "pref:pr6m7j9njldwwzlg9v7v53unlr4jkmx6ey65nvtks5"
        );
    }

    #[test]
    fn legacy_translation_vectors() {
        let cases = [
            ("76a04053bda0a88bda5177b86a15c3b29f559873", AddressType::PublicKeyHash, "bitcoincash:qpm2qsznhks23z7629mms6s4cwef74vcwvy22gdx6a"),
            ("cb481232299cd5743151ac4b2d63ae198e7bb0a9", AddressType::PublicKeyHash, "bitcoincash:qr95sy3j9xwd2ap32xkykttr4cvcu7as4y0qverfuy"),
            ("011f28e473c95f4013d7d53ec5fbc3b42df8ed10", AddressType::PublicKeyHash, "bitcoincash:qqq3728yw0y47sqn6l2na30mcw6zm78dzqre909m2r"),
            ("76a04053bda0a88bda5177b86a15c3b29f559873", AddressType::ScriptHash, "bitcoincash:ppm2qsznhks23z7629mms6s4cwef74vcwvn0h829pq"),
            ("cb481232299cd5743151ac4b2d63ae198e7bb0a9", AddressType::ScriptHash, "bitcoincash:pr95sy3j9xwd2ap32xkykttr4cvcu7as4yc93ky28e"),
            ("011f28e473c95f4013d7d53ec5fbc3b42df8ed10", AddressType::ScriptHash, "bitcoincash:pqq3728yw0y47sqn6l2na30mcw6zm78dzq5ucqzc37")
        ];

        let codec = CashAddrCodec::default();
        for (hash_hex, address_type, expected) in cases {
            let hash = hex::decode(hash_hex).unwrap();
            assert_eq!(codec.encode(&hash, address_type).unwrap(), expected);

            let decoded = codec.decode(expected).unwrap();
            assert_eq!(decoded.prefix(), DEFAULT_PREFIX);
            assert_eq!(decoded.address_type(), address_type);
            assert_eq!(hex::encode(decoded.hash()), hash_hex);
        }
    }

    #[test]
    fn encode_decode_inverse() {
        let codec = CashAddrCodec::default();
        for seed in 0..16u8 {
            let hash: Vec<u8> = (0..20).map(|i| seed.wrapping_mul(31).wrapping_add(i)).collect();
            for address_type in [AddressType::PublicKeyHash, AddressType::ScriptHash] {
                let address = codec.encode(&hash, address_type).unwrap();
                assert_eq!(
                    codec.decode(&address).unwrap(),
                    CashAddress::new(DEFAULT_PREFIX, address_type, &hash).unwrap()
                );
            }
        }
    }

    #[test]
    fn only_encodable_addresses_can_be_built() {
        assert_eq!(
            CashAddress::new(DEFAULT_PREFIX, AddressType::ScriptHash, &[0; 21]),
            Err(VaultError::InvalidHashLength(21))
        );
        assert!(matches!(
            CashAddress::new("", AddressType::PublicKeyHash, &test_hash()),
            Err(VaultError::MalformedPayload(_))
        ));

        let address = CashAddress::new("bchtest", AddressType::ScriptHash, &test_hash()).unwrap();
        assert_eq!(address.to_string(), "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t");
        assert_eq!(format!("{}", address), address.as_str());
    }

    #[test]
    fn version_bytes() {
        assert_eq!(version_byte(AddressType::PublicKeyHash, 20).unwrap(), 0x00);
        assert_eq!(version_byte(AddressType::ScriptHash, 20).unwrap(), 0x08);
        assert_eq!(version_byte(AddressType::ScriptHash, 32).unwrap(), 0x0b);
        assert_eq!(version_byte(AddressType::PublicKeyHash, 21), Err(VaultError::InvalidHashLength(21)));
    }

    #[test]
    fn longer_hashes_round_trip() {
        let hash: Vec<u8> = (0..32).collect();
        let address = encode("bitcoincash", &hash, AddressType::ScriptHash).unwrap();
        assert_eq!(address, "bitcoincash:pvqqzqsrqszsvpcgpy9qkrqdpc83qygjzv2p29shrqv35xcur50p7h2c7ctj5");
        assert_eq!(decode(&address, DEFAULT_PREFIX).unwrap().hash(), &hash[..]);
    }

    #[test]
    fn missing_prefix_uses_default() {
        let decoded = decode("qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", DEFAULT_PREFIX).unwrap();
        assert_eq!(decoded.prefix(), "bitcoincash");
        assert_eq!(decoded.hash(), &test_hash()[..]);
        assert_eq!(decoded.as_str(), "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2");

        //The same payload is not valid under another default prefix
        assert_eq!(
            decode("qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", "bchtest"),
            Err(VaultError::ChecksumMismatch)
        );
    }

    #[test]
    fn case_handling() {
        let decoded = decode("BITCOINCASH:QR6M7J9NJLDWWZLG9V7V53UNLR4JKMX6EYLEP8EKG2", DEFAULT_PREFIX).unwrap();
        assert_eq!(decoded.hash(), &test_hash()[..]);
        assert_eq!(decoded.to_string(), "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2");

        assert_eq!(
            decode("bitcoincash:Qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", DEFAULT_PREFIX),
            Err(VaultError::MixedCase)
        );
    }

    #[test]
    fn flipped_character_fails_checksum() {
        let address = "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2";
        let start = address.find(SEPARATOR).unwrap() + 1;

        for i in start..address.len() {
            let mut bytes = address.as_bytes().to_vec();
            let current = CHARSET.iter().position(|&c| c == bytes[i]).unwrap();
            bytes[i] = CHARSET[(current + 1) % 32];
            let flipped = String::from_utf8(bytes).unwrap();
            assert_eq!(decode(&flipped, DEFAULT_PREFIX), Err(VaultError::ChecksumMismatch), "position {}", i);
        }
    }

    #[test]
    fn invalid_characters() {
        // 'b', 'i', 'o' and '1' are not in the character set
        assert_eq!(
            decode("bitcoincash:br6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", DEFAULT_PREFIX),
            Err(VaultError::InvalidCharacter('b'))
        );
        assert_eq!(
            decode("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ek1o", DEFAULT_PREFIX),
            Err(VaultError::InvalidCharacter('1'))
        );
    }

    #[test]
    fn malformed_payloads() {
        assert!(matches!(decode("bitcoincash:", DEFAULT_PREFIX), Err(VaultError::MalformedPayload(_))));
        assert!(matches!(decode(":qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", DEFAULT_PREFIX), Err(VaultError::MalformedPayload(_))));

        //A valid checksum over a payload whose padding bits are set
        let mut data = vec![0u8; 34];
        data[33] = 1;
        let mut with_checksum = data.clone();
        with_checksum.extend_from_slice(&checksum::checksum("bitcoincash", &data));
        let address: String = std::iter::once("bitcoincash:".to_string())
            .chain(with_checksum.iter().map(|&d| (CHARSET[d as usize] as char).to_string()))
            .collect();
        assert!(matches!(decode(&address, DEFAULT_PREFIX), Err(VaultError::MalformedPayload(_))));
    }

    #[test]
    fn unknown_type_bits_are_rejected() {
        //Version byte 0x10 carries type 2
        let mut payload = vec![0x10u8];
        payload.extend_from_slice(&test_hash());
        let mut data = bits::repack(&payload, 8, 5, true).unwrap();
        let checksum = checksum::checksum("bitcoincash", &data);
        data.extend_from_slice(&checksum);
        let address: String = data.iter().map(|&d| CHARSET[d as usize] as char).collect();

        assert_eq!(decode(&address, DEFAULT_PREFIX), Err(VaultError::UnknownAddressType(0x10)));
    }

    #[test]
    fn prefix_enforcement() {
        let codec = CashAddrCodec::default();
        assert_eq!(
            codec.decode_expected("bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t"),
            Err(VaultError::PrefixMismatch { expected: "bitcoincash".into(), found: "bchtest".into() })
        );
        assert!(codec.decode("bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t").is_ok());
    }
}
