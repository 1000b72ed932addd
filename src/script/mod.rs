/*
    Minimal script support: the hash-lock redeem script, its unlocking
    script and the standard output scripts its address pays to.
*/

pub mod builder;
pub mod redeem_script;

pub use builder::{Builder, Opcode, opcodes};
pub use redeem_script::{RedeemScript, HASH_LOCK_LEN};
