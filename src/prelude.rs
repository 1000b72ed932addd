/*
    This module contains the default imports for the library.

    Import the library using:
        use hashlock_vault::prelude::*;
    to quickly import the essential parts of the library.
*/

pub use crate::{

    key::{
        PubKey,
        PrivKey
    },

    address::Address,

    config::{
        Network,
        VaultConfig
    },

    encoding::{
        AddressType,
        CashAddrCodec,
        CashAddress
    },

    error::{
        Result,
        VaultError
    },

    service::{
        Envelope,
        VaultService
    },

    util::{
        encode_02x,
        decode_02x
    },

    vault::{
        HashLockVault,
        Secret,
        Vault
    },

    wallet::{
        BalanceUnit,
        SweepRequest,
        WalletService,
        WatchOnlyWallet
    },

    script::RedeemScript

};
