use crate:: {
    config::Network,
    encoding::{
        base58,
        cashaddr::{AddressType, CashAddrCodec}
    },
    error::Result,
    key::PubKey,
    script::RedeemScript
};

pub struct Address;

impl Address {
    /**
        Creates a P2SH CashAddr from a redeem script
        * CashAddr( ScriptHash, Hash160( script ) )
    */
    pub fn from_script(script: &RedeemScript, codec: &CashAddrCodec) -> Result<String> {
        codec.encode(&script.hash(), AddressType::ScriptHash)
    }

    /**
        Creates a P2PKH CashAddr from a compressed public key
        * CashAddr( PublicKeyHash, Hash160( public key ) )
    */
    pub fn from_pub_key(pk: &PubKey, codec: &CashAddrCodec) -> Result<String> {
        codec.encode(&pk.hash160(), AddressType::PublicKeyHash)
    }

    /**
        Legacy Base58Check P2SH address of a redeem script
    */
    pub fn legacy_from_script(script: &RedeemScript, network: Network) -> String {
        base58::check_encode(&[network.p2sh_version()], &script.hash())
    }

    /**
        Legacy Base58Check P2PKH address of a compressed public key
    */
    pub fn legacy_from_pub_key(pk: &PubKey, network: Network) -> String {
        base58::check_encode(&[network.p2pkh_version()], &pk.hash160())
    }

    /**
        Verifies that an address is valid for the codec's prefix
    */
    pub fn is_valid(address: &str, codec: &CashAddrCodec) -> bool {
        codec.decode_expected(address).is_ok()
    }
}
