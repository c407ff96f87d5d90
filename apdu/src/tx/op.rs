// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{encdec_bitflags, helpers::*, ApduError, Instruction, XLM_APDU_CLA};

/// Stellar operation types, values match the transaction `OperationType` discriminant
#[derive(Copy, Clone, PartialEq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum OperationType {
    CreateAccount = 0,
    Payment = 1,
}

/// Stellar asset types, values match the transaction `AssetType` discriminant
#[derive(Copy, Clone, PartialEq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum AssetType {
    Native = 0,
    AlphaNum4 = 1,
    AlphaNum12 = 2,
}

bitflags::bitflags! {
    /// Flags for [`TxOp`] APDUs
    pub struct TxOpFlags: u8 {
        /// Operation overrides the transaction source account
        const HAS_SOURCE = 1 << 0;
    }
}

encdec_bitflags!(TxOpFlags);

/// Add operation APDU, each operation is confirmed by the user and appended to the transaction hash.
///
/// `AMOUNT` contains the starting balance for `CreateAccount` operations, and the payment
/// amount for `Payment` operations. `ASSET_CODE` is zero-padded for 4-character codes.
/// Unused key fields are zeroed.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |    OP_TYPE    |     FLAGS     |  ASSET_TYPE   |   RESERVED    |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                            AMOUNT                             |
/// |                         (u64, 8-byte)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        SOURCE_ACCOUNT                         /
/// /                 (32-byte ed25519 public key)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          DESTINATION                          /
/// /                 (32-byte ed25519 public key)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                          ASSET_CODE                           /
/// /                          (12-byte)                            /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                         ASSET_ISSUER                          /
/// /                 (32-byte ed25519 public key)                  /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug, Encode, Decode)]
#[encdec(error = "ApduError")]
pub struct TxOp {
    /// Operation type, see [`OperationType`]
    pub op_type: u8,

    /// Operation flags
    pub flags: TxOpFlags,

    /// Payment asset type
    #[encdec(with = "enum_u8")]
    pub asset_type: AssetType,

    /// Reserved for future use (maintains 32-bit field alignment)
    reserved: u8,

    /// Operation amount (stroops)
    pub amount: u64,

    /// Operation source account (valid if [`TxOpFlags::HAS_SOURCE`] is set)
    #[encdec(with = "arr")]
    pub source: [u8; 32],

    /// Destination account
    #[encdec(with = "arr")]
    pub destination: [u8; 32],

    /// Asset code (zero-padded)
    #[encdec(with = "arr")]
    pub asset_code: [u8; 12],

    /// Asset issuer
    #[encdec(with = "arr")]
    pub asset_issuer: [u8; 32],
}

impl ApduStatic for TxOp {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxAddOperation as u8;
}

impl TxOp {
    /// Create a new raw [`TxOp`] with the provided type and amount
    pub fn new(op_type: u8, destination: [u8; 32], amount: u64) -> Self {
        Self {
            op_type,
            flags: TxOpFlags::empty(),
            asset_type: AssetType::Native,
            reserved: 0,
            amount,
            source: [0u8; 32],
            destination,
            asset_code: [0u8; 12],
            asset_issuer: [0u8; 32],
        }
    }

    /// Create a `CreateAccount` operation
    pub fn create_account(destination: [u8; 32], starting_balance: u64) -> Self {
        Self::new(
            OperationType::CreateAccount.into(),
            destination,
            starting_balance,
        )
    }

    /// Create a native (XLM) `Payment` operation
    pub fn payment_native(destination: [u8; 32], amount: u64) -> Self {
        Self::new(OperationType::Payment.into(), destination, amount)
    }

    /// Create a `Payment` operation for an issued asset.
    ///
    /// Codes of up to 4 bytes use [`AssetType::AlphaNum4`], up to 12 [`AssetType::AlphaNum12`].
    pub fn payment(
        destination: [u8; 32],
        code: &[u8],
        issuer: [u8; 32],
        amount: u64,
    ) -> Result<Self, ApduError> {
        let asset_type = match code.len() {
            1..=4 => AssetType::AlphaNum4,
            5..=12 => AssetType::AlphaNum12,
            _ => return Err(ApduError::InvalidLength),
        };

        let mut s = Self::new(OperationType::Payment.into(), destination, amount);
        s.asset_type = asset_type;
        s.asset_code[..code.len()].copy_from_slice(code);
        s.asset_issuer = issuer;

        Ok(s)
    }

    /// Set the operation source account
    pub fn with_source(mut self, source: [u8; 32]) -> Self {
        self.flags |= TxOpFlags::HAS_SOURCE;
        self.source = source;
        self
    }

    /// Fetch the operation source account if set
    pub fn source(&self) -> Option<&[u8; 32]> {
        match self.flags.contains(TxOpFlags::HAS_SOURCE) {
            true => Some(&self.source),
            false => None,
        }
    }
}
