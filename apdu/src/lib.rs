// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Protocol / APDU definitions for Stellar app communication
//!
//! This module provides a protocol specification and reference implementation for communication
//! with Stellar hardware wallets.
//!
//! APDUs use a primitive binary encoding to simplify implementation with unsupported languages and platforms.
//! Note that this is _only_ the transport encoding, the transaction signature base hashed on the device
//! is the canonical (big-endian) Stellar encoding and is reconstructed by the engine from these fields.
//!
//! Encodings are intended to be _roughly_ equivalent to packed c structures while maintaining
//! 32-bit field alignment to reduce the need for unaligned access on constrained platforms.
//! All field encodings are little-endian, because most of the world is these days.
//!
//! Messages larger than a single APDU (long network passphrases) are delivered in chunks
//! via [`TxLoad`][tx::TxLoad], see [tx::load] for details.
//!

#![no_std]

pub use ledger_proto::{ApduError, ApduReq, ApduStatic};

pub mod app_info;
pub mod prelude;
pub mod public_key;
pub mod state;
pub mod tx;

mod helpers;

/// Stellar APDU Class
pub const XLM_APDU_CLA: u8 = 0xe0;

/// Stellar APDU protocol version
pub const XLM_PROTO_VERSION: u8 = 0x01;

/// Maximum APDU payload length
pub const MAX_APDU_LEN: usize = 249;

/// Stellar APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(u8)]
pub enum Instruction {
    // General instructions
    GetAppInfo = 0x00,

    // Stellar instructions
    /// Fetch (and optionally display) an account public key
    GetPublicKey = 0x10,

    /// Start a transaction signing session with the transaction header
    TxInit = 0x20,

    /// Add an operation to the running transaction
    TxAddOperation = 0x21,

    /// Load a chunk of a message too large for a single APDU
    TxLoad = 0x22,

    /// Sign the completed transaction
    TxSign = 0x23,

    /// Abort the running transaction
    TxAbort = 0x24,

    /// Fetch transaction state
    TxGetInfo = 0x25,

    /// Display the transaction summary for review
    TxReview = 0x26,
}

/// Helper macro for encoding `bitflags` types
#[macro_export]
macro_rules! encdec_bitflags {
    ($b:ty) => {
        impl encdec::Encode for $b {
            type Error = ApduError;

            fn encode(&self, buff: &mut [u8]) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode(&bits, buff).map_err(|e| e.into())
            }

            fn encode_len(&self) -> Result<usize, Self::Error> {
                let bits: u8 = self.bits();
                encdec::Encode::encode_len(&bits).map_err(|e| e.into())
            }
        }

        impl encdec::DecodeOwned for $b {
            type Output = $b;
            type Error = ApduError;

            fn decode_owned(buff: &[u8]) -> Result<(Self, usize), Self::Error> {
                if buff.is_empty() {
                    return Err(ApduError::InvalidLength);
                }

                let v = <$b>::from_bits_truncate(buff[0]);
                Ok((v, 1))
            }
        }
    };
}
