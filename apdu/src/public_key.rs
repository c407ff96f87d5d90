// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Public key APDUs, for fetching (and optionally displaying) account addresses

use encdec::{Decode, Encode};

use super::{encdec_bitflags, ApduError, ApduStatic, Instruction, XLM_APDU_CLA};
use crate::helpers::*;

bitflags::bitflags! {
    /// Public key request flags
    pub struct PublicKeyFlags: u8 {
        /// Display the derived address and request user approval before responding
        const DISPLAY = 1 << 0;
    }
}

encdec_bitflags!(PublicKeyFlags);

/// Public key request APDU.
///
/// Requests the ed25519 public key for the SLIP-0010 derived account `m/44'/148'/index'`.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         ACCOUNT_INDEX                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     FLAGS     |                    RESERVED                   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeyReq {
    /// SLIP-0010 account index
    pub account_index: u32,

    /// Request flags
    pub flags: PublicKeyFlags,

    /// Reserved for future use (maintains 32-bit field alignment)
    #[encdec(with = "arr")]
    reserved: [u8; 3],
}

impl PublicKeyReq {
    /// Create a new [PublicKeyReq] APDU
    pub fn new(account_index: u32, flags: PublicKeyFlags) -> Self {
        Self {
            account_index,
            flags,
            reserved: [0u8; 3],
        }
    }
}

impl ApduStatic for PublicKeyReq {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::GetPublicKey as u8;
}

/// Public key response APDU
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                         ACCOUNT_INDEX                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /                  (32-byte ed25519 public key)                 /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct PublicKeyResp {
    /// SLIP-0010 account index
    pub account_index: u32,

    /// Account public key
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],
}

impl PublicKeyResp {
    /// Create a new [`PublicKeyResp`] APDU
    pub fn new(account_index: u32, public_key: [u8; 32]) -> Self {
        Self {
            account_index,
            public_key,
        }
    }
}
