use crate::{
    hash,
    script::{
        Builder,
        opcodes
    },
    util::encode_02x
};

/// Length of a hash-lock redeem script: OP_SHA256 PUSH(32) <32 bytes> OP_EQUAL
pub const HASH_LOCK_LEN: usize = 35;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemScript {
    pub code: Vec<u8>
}

impl RedeemScript {
    /**
        Create a new instance of self
    */
    pub fn new(code: Vec<u8>) -> Self {
        Self {
            code
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn to_hex(&self) -> String {
        encode_02x(&self.code)
    }

    /**
        Hash the script with Hash160, the program hash of a P2SH address
    */
    pub fn hash(&self) -> [u8; 20] {
        hash::hash160(&self.code)
    }

    /// Hash-lock redeem script
    /// OP_SHA256 <32-byte secret hash> OP_EQUAL
    pub fn hash_lock(secret_hash: &[u8; 32]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_SHA256)
            .push_opcode(opcodes::OP_PUSHBYTES_32)
            .push_slice(secret_hash)
            .push_opcode(opcodes::OP_EQUAL)
            .into_script()
    }

    /// Unlocking script spending a hash-lock P2SH output.
    /// <secret> <redeem script>
    /// No signature is involved, revealing the preimage is the whole proof.
    pub fn unlocking(secret: &[u8; 32], locking: &Self) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_PUSHBYTES_32)
            .push_slice(secret)
            .push_data(&locking.code)
            .into_script()
    }

    /// P2SH script pub key
    /// OP_HASH160 <Hash160(redeemScript)> OP_EQUAL
    pub fn p2sh(script: &Self) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_HASH160)
            .push_opcode(opcodes::OP_PUSHBYTES_20)
            .push_slice(&script.hash())
            .push_opcode(opcodes::OP_EQUAL)
            .into_script()
    }

    /// P2PKH script pub key
    /// OP_DUP OP_HASH160 <Pubkey Hash> OP_EQUALVERIFY OP_CHECKSIG
    pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Self {
        Builder::new()
            .push_opcode(opcodes::OP_DUP)
            .push_opcode(opcodes::OP_HASH160)
            .push_opcode(opcodes::OP_PUSHBYTES_20)
            .push_slice(pubkey_hash)
            .push_opcode(opcodes::OP_EQUALVERIFY)
            .push_opcode(opcodes::OP_CHECKSIG)
            .into_script()
    }

    /**
        Returns the committed secret hash if self is a hash-lock script.
    */
    pub fn secret_hash(&self) -> Option<[u8; 32]> {
        if self.code.len() != HASH_LOCK_LEN
            || self.code[0] != opcodes::OP_SHA256.into_u8()
            || self.code[1] != opcodes::OP_PUSHBYTES_32.into_u8()
            || self.code[34] != opcodes::OP_EQUAL.into_u8()
        {
            return None;
        }

        let mut secret_hash = [0u8; 32];
        secret_hash.copy_from_slice(&self.code[2..34]);
        Some(secret_hash)
    }
}
