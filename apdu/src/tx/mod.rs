// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction related APDUs, used to execute a transaction via the hardware wallet.
//!
//! See [ledger_xlm_core::engine] for interaction and state machines

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{helpers::*, state::TxState, ApduError, Instruction, XLM_APDU_CLA};

mod tx_init;
pub use tx_init::*;

mod op;
pub use op::*;

pub mod load;
pub use load::TxLoad;

/// Transaction information request APDU
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfoReq;

impl ApduStatic for TxInfoReq {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxGetInfo as u8;
}

/// Transaction review request (0 length APDU), displays the fee, signing account, memo,
/// and time bounds for confirmation. Required before operations are accepted.
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxReview;

impl ApduStatic for TxReview {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxReview as u8;
}

/// Sign transaction request (0 length APDU), valid once all operations are confirmed
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxSign;

impl ApduStatic for TxSign {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxSign as u8;
}

/// Abort transaction request (0 length APDU)
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxAbort;

impl ApduStatic for TxAbort {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxAbort as u8;
}

/// Transaction information response APDU.
///
/// Received in response to TX commands, contains the current transaction engine state,
/// the next expected offset when loading a chunked message (zero otherwise),
/// and the number of confirmed and declared operations.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    TX_STATE   |    RESERVED   |          LOAD_OFFSET          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        OPS_CONFIRMED                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          OPS_TOTAL                            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxInfo {
    /// Current transaction engine state
    pub state: TxState,

    /// Reserved for future use (maintains 32-bit field alignment)
    reserved: u8,

    /// Next expected offset for chunked message loading
    pub offset: u16,

    /// Number of operations confirmed by the user
    pub confirmed: u32,

    /// Number of operations declared in the transaction header
    pub total: u32,
}

impl TxInfo {
    /// Create a new [`TxInfo`] APDU
    pub fn new(state: TxState, offset: u16, confirmed: u32, total: u32) -> Self {
        Self {
            state,
            reserved: 0,
            offset,
            confirmed,
            total,
        }
    }
}

/// Transaction signature response APDU, returned on [`TxSign`]
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          PUBLIC_KEY                           /
/// /                (32-byte ed25519 signer public key)            /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                           SIGNATURE                           /
/// /           (64-byte ed25519 signature over tx digest)          /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxSignature {
    /// Device derived signer public key
    #[encdec(with = "arr")]
    pub public_key: [u8; 32],

    /// Detached ed25519 signature
    #[encdec(with = "arr")]
    pub signature: [u8; 64],
}

impl TxSignature {
    /// Create a new [`TxSignature`] APDU
    pub fn new(public_key: [u8; 32], signature: [u8; 64]) -> Self {
        Self {
            public_key,
            signature,
        }
    }
}
