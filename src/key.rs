use std::fmt;

use crate::{
    Secp256k1,
    PublicKey,
    SecretKey,
    config::Network,
    encoding::base58,
    entropy,
    error::{Result, VaultError},
    hash,
    util::encode_02x
};

// Suffix marking a WIF key whose public key is serialized compressed
const WIF_COMPRESSED: u8 = 0x01;

pub struct PrivKey(SecretKey);

impl PrivKey {

    /**
        Draws 32 bytes from the OS entropy source and uses them as a secret key.
    */
    pub fn new_rand() -> Result<Self> {
        Self::from_slice(&entropy::random_bytes::<32>()?)
    }

    /**
        Use a predefined byte array as a secret key.
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self> {
        SecretKey::from_slice(byte_array)
            .map(Self)
            .map_err(|e| VaultError::InvalidKey(e.to_string()))
    }

    pub fn as_bytes(&self) -> [u8; 32] {
        self.0.secret_bytes()
    }

    /*
        Export the private key in wallet-import-format (Base58Check Encoded with prefix)
        Keys are always exported with the compression byte.
    */
    pub fn export_as_wif(&self, network: Network) -> String {
        let mut key: Vec<u8> = self.as_bytes().to_vec();
        key.push(WIF_COMPRESSED);

        base58::check_encode(&[network.wif_version()], &key)
    }

    /**
        Import a private key from a mainnet or testnet WIF string,
        with or without the compression byte.
    */
    pub fn from_wif(wif: &str) -> Result<Self> {
        let bytes = base58::check_decode(wif)?;
        let (version, key) = match bytes.split_first() {
            Some(split) => split,
            None => return Err(VaultError::InvalidKey("empty WIF payload".to_string()))
        };

        if *version != Network::Mainnet.wif_version() && *version != Network::Testnet.wif_version() {
            return Err(VaultError::InvalidKey(format!("unknown WIF version {:#04x}", version)));
        }

        match key.len() {
            32 => Self::from_slice(key),
            33 if key[32] == WIF_COMPRESSED => Self::from_slice(&key[..32]),
            n => Err(VaultError::InvalidKey(format!("WIF payload of {} bytes", n)))
        }
    }
}

// Never print key material
impl fmt::Debug for PrivKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PrivKey(<redacted>)")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PubKey(PublicKey);

impl PubKey {

    /**
        Finds the compressed public key from a secret key.

        Is the result of static point G on the secp256k1 curve multipled k times, where k is the private key.
    */
    pub fn from_priv_key(k: &PrivKey) -> Self {
        Self(PublicKey::from_secret_key(&Secp256k1::new(), &k.0))
    }

    /**
        Use a predefined byte array as a public key.
    */
    pub fn from_slice(byte_array: &[u8]) -> Result<Self> {
        PublicKey::from_slice(byte_array)
            .map(Self)
            .map_err(|e| VaultError::InvalidKey(e.to_string()))
    }

    /**
        Returns the compressed public key as a byte array.
    */
    pub fn as_bytes(&self) -> [u8; 33] {
        self.0.serialize()
    }

    pub fn as_hex(&self) -> String {
        encode_02x(&self.as_bytes())
    }

    /**
        Ripemd160( Sha256( compressed public key ) )
    */
    pub fn hash160(&self) -> [u8; 20] {
        hash::hash160(self.as_bytes())
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_one() -> PrivKey {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        PrivKey::from_slice(&bytes).unwrap()
    }

    #[test]
    fn generator_point() {
        let pk = PubKey::from_priv_key(&key_one());
        assert_eq!(pk.as_hex(), "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798");
        assert_eq!(encode_02x(&pk.hash160()), "751e76e8199196d454941c45d1b3a323f1433bd6");
    }

    #[test]
    fn wif_vectors() {
        let k = key_one();
        assert_eq!(k.export_as_wif(Network::Mainnet), "KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn");
        assert_eq!(k.export_as_wif(Network::Testnet), "cMahea7zqjxrtgAbB7LSGbcQUr1uX1ojuat9jZodMN87JcbXMTcA");

        let imported = PrivKey::from_wif("KwDiBf89QgGbjEhKnhXJuH7LrciVrZi3qYjgd9M7rFU73sVHnoWn").unwrap();
        assert_eq!(imported.as_bytes(), k.as_bytes());

        //Uncompressed WIF of the same key
        let uncompressed = PrivKey::from_wif("5HpHagT65TZzG1PH3CSu63k8DbpvD8s5ip4nEB3kEsreAnchuDf").unwrap();
        assert_eq!(uncompressed.as_bytes(), k.as_bytes());
    }

    #[test]
    fn random_keys_round_trip_through_wif() {
        for _ in 0..5 {
            let k = PrivKey::new_rand().unwrap();
            let wif = k.export_as_wif(Network::Mainnet);
            assert!(wif.starts_with('K') || wif.starts_with('L'));
            assert_eq!(PrivKey::from_wif(&wif).unwrap().as_bytes(), k.as_bytes());
        }
    }

    #[test]
    fn invalid_keys() {
        assert!(matches!(PrivKey::from_slice(&[0u8; 32]), Err(VaultError::InvalidKey(_))));
        assert!(matches!(PrivKey::from_slice(&[1u8; 31]), Err(VaultError::InvalidKey(_))));
        assert!(matches!(PubKey::from_slice(&[2u8; 20]), Err(VaultError::InvalidKey(_))));
        //Valid Base58Check but a legacy address, not a key
        assert!(matches!(PrivKey::from_wif("124ERAK4SqHMNWXycHPautn5zDYRKr3b2E"), Err(VaultError::InvalidKey(_))));
        assert!(format!("{:?}", key_one()).contains("redacted"));
    }
}
