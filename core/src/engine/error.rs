// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Engine error types, returned to the host as APDU status errors

use ledger_proto::ApduError;

/// [Engine][super::Engine] errors
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "thiserror", derive(thiserror::Error))]
#[repr(u8)]
pub enum Error {
    /// Invalid argument length
    #[cfg_attr(feature = "thiserror", error("Invalid argument length"))]
    InvalidLength = 0x00,

    /// Unexpected event
    #[cfg_attr(feature = "thiserror", error("Unexpected event"))]
    UnexpectedEvent = 0x01,

    /// Operation or signing request with no active session
    #[cfg_attr(feature = "thiserror", error("no active signing session"))]
    NotSigning = 0x02,

    /// User rejected a confirmation
    #[cfg_attr(feature = "thiserror", error("cancelled by user"))]
    UserCancelled = 0x03,

    /// Root key material unavailable or derivation failed
    #[cfg_attr(feature = "thiserror", error("key derivation unavailable"))]
    DerivationUnavailable = 0x04,

    /// Operation type is not supported
    #[cfg_attr(feature = "thiserror", error("unsupported operation type"))]
    UnsupportedOperationType = 0x05,

    /// Invalid message encoding
    #[cfg_attr(feature = "thiserror", error("invalid encoding"))]
    InvalidEncoding = 0x06,

    /// Chunk offset does not follow previously loaded data
    #[cfg_attr(feature = "thiserror", error("invalid chunk offset"))]
    InvalidOffset = 0x07,

    /// Transaction must contain at least one operation
    #[cfg_attr(feature = "thiserror", error("invalid operation count"))]
    InvalidOperationCount = 0x08,

    /// Memo text exceeds the maximum length
    #[cfg_attr(feature = "thiserror", error("memo text too long"))]
    MemoTooLong = 0x09,

    /// Network passphrase exceeds the maximum length
    #[cfg_attr(feature = "thiserror", error("network passphrase too long"))]
    PassphraseTooLong = 0x0a,

    /// Signing requested before all operations were confirmed
    #[cfg_attr(feature = "thiserror", error("transaction incomplete"))]
    IncompleteTransaction = 0x0b,

    /// Derived signing key does not match the session signer
    #[cfg_attr(feature = "thiserror", error("signing key mismatch"))]
    KeyMismatch = 0x0c,
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        match e {
            ApduError::InvalidLength => Error::InvalidLength,
            _ => Error::InvalidEncoding,
        }
    }
}
