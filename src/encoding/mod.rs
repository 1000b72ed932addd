/*
    Module that bundles together the encoding schemes used for addresses and keys
*/

pub mod base58;
pub mod bits;
pub mod cashaddr;
pub mod checksum;

pub use cashaddr::{AddressType, CashAddrCodec, CashAddress};
