/*
    Error type shared by every layer of the crate.

    Core functions return `Result<T>`; only the service boundary flattens
    failures into the `{success: false, error}` envelope.
*/

use thiserror::Error;

/// Common result alias for vault operations.
pub type Result<T> = std::result::Result<T, VaultError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VaultError {
    /// A value handed to the bit repacker does not fit its declared width.
    #[error("value {value} does not fit in {bits} bits")]
    EncodingOverflow { value: u8, bits: u32 },

    #[error("unsupported bit widths {from} -> {to}")]
    InvalidBitWidth { from: u32, to: u32 },

    /// Unpadded repacking would drop set bits or a whole input group.
    #[error("trailing bits are non-zero or exceed one input group")]
    TrailingBitsNonZero,

    #[error("invalid character {0:?} in address")]
    InvalidCharacter(char),

    #[error("address mixes upper and lower case")]
    MixedCase,

    #[error("address checksum mismatch")]
    ChecksumMismatch,

    #[error("malformed address payload: {0}")]
    MalformedPayload(String),

    #[error("unsupported hash length of {0} bytes")]
    InvalidHashLength(usize),

    #[error("unknown address type in version byte {0:#04x}")]
    UnknownAddressType(u8),

    #[error("address prefix mismatch: expected {expected}, found {found}")]
    PrefixMismatch { expected: String, found: String },

    /// The OS entropy source failed. Never substituted with a weaker source.
    #[error("entropy unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("invalid hex input: {0}")]
    InvalidHexInput(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("base58 decode failed: {0}")]
    Base58(String),

    #[error("Insufficient funds: balance of {balance} sat is below the {threshold} sat dust threshold")]
    InsufficientFunds { balance: u64, threshold: u64 },

    /// Failure reported by the external wallet service, passed through unchanged.
    #[error("wallet service error: {0}")]
    ExternalService(String),

    #[error("invalid configuration: {0}")]
    Config(String)
}

impl VaultError {
    /// True when the error was caused by untrusted caller input rather than
    /// a defect or a collaborator failure.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCharacter(_)
                | Self::MixedCase
                | Self::ChecksumMismatch
                | Self::MalformedPayload(_)
                | Self::InvalidHashLength(_)
                | Self::UnknownAddressType(_)
                | Self::PrefixMismatch { .. }
                | Self::InvalidHexInput(_)
                | Self::InvalidKey(_)
                | Self::Base58(_)
        )
    }

    /// Only the network-facing collaborator may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ExternalService(_))
    }
}

impl From<hex::FromHexError> for VaultError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHexInput(err.to_string())
    }
}

impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
