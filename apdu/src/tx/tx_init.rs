// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::{ApduError, Instruction, XLM_APDU_CLA};

/// Length of the fixed portion of a [`TxInit`] APDU
pub const TX_INIT_HEADER_LEN: usize = 96;

/// Length of the memo field in a [`TxInit`] APDU
pub const MEMO_FIELD_LEN: usize = 32;

/// Stellar memo types, values match the transaction `MemoType` discriminant
#[derive(Copy, Clone, PartialEq, Debug, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum MemoType {
    None = 0,
    Text = 1,
    Id = 2,
    Hash = 3,
    Return = 4,
}

/// Transaction initialisation APDU, starts a signing session with the transaction header.
///
/// Unlike other APDUs this may exceed the maximum APDU length for long network passphrases,
/// in which case the encoded object is delivered via [`TxLoad`][super::TxLoad] chunks.
///
/// The memo field contains the memo text for [`MemoType::Text`], the little-endian `u64`
/// memo id for [`MemoType::Id`], or the 32-byte hash for [`MemoType::Hash`] and
/// [`MemoType::Return`]. Time bounds with both values zero indicate no time bounds.
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        ACCOUNT_INDEX                          |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                              FEE                              |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        SEQUENCE_NUMBER                        |
/// |                         (u64, 8-byte)                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        TIME_BOUND_MIN                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        TIME_BOUND_MAX                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                        NUM_OPERATIONS                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   MEMO_TYPE   |   MEMO_LEN    |        PASSPHRASE_LEN         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                             MEMO                              /
/// /                          (32-byte)                            /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                        SOURCE_ACCOUNT                         /
/// /        (32-byte client public key, not used for signing)      /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                      NETWORK_PASSPHRASE                       /
/// /                       (variable length)                       /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TxInit<'a> {
    /// Account index for SLIP-0010 derivation
    pub account_index: u32,

    /// Transaction fee (stroops)
    pub fee: u32,

    /// Transaction sequence number
    pub sequence_number: u64,

    /// Lower time bound (unix seconds, 0 for none)
    pub time_bound_min: u32,

    /// Upper time bound (unix seconds, 0 for none)
    pub time_bound_max: u32,

    /// Number of operations in the transaction
    pub num_operations: u32,

    /// Memo type
    pub memo_type: MemoType,

    /// Length of memo value
    pub memo_len: u8,

    /// Memo value
    pub memo: [u8; MEMO_FIELD_LEN],

    /// Client-claimed source account, informational only
    pub source_account: [u8; 32],

    /// Network passphrase
    pub network_passphrase: &'a str,
}

impl<'a> ApduStatic for TxInit<'a> {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxInit as u8;
}

impl<'a> TxInit<'a> {
    /// Create a new [`TxInit`] request with no memo and no time bounds
    pub fn new(
        account_index: u32,
        network_passphrase: &'a str,
        fee: u32,
        sequence_number: u64,
        num_operations: u32,
    ) -> Self {
        Self {
            account_index,
            fee,
            sequence_number,
            time_bound_min: 0,
            time_bound_max: 0,
            num_operations,
            memo_type: MemoType::None,
            memo_len: 0,
            memo: [0u8; MEMO_FIELD_LEN],
            source_account: [0u8; 32],
            network_passphrase,
        }
    }

    /// Set transaction time bounds
    pub fn with_time_bounds(mut self, min: u32, max: u32) -> Self {
        self.time_bound_min = min;
        self.time_bound_max = max;
        self
    }

    /// Set the client-claimed source account
    pub fn with_source_account(mut self, source_account: [u8; 32]) -> Self {
        self.source_account = source_account;
        self
    }

    /// Set a raw memo value (text or hash types)
    pub fn with_memo(mut self, memo_type: MemoType, value: &[u8]) -> Result<Self, ApduError> {
        if value.len() > MEMO_FIELD_LEN {
            return Err(ApduError::InvalidLength);
        }

        self.memo_type = memo_type;
        self.memo_len = value.len() as u8;
        self.memo = [0u8; MEMO_FIELD_LEN];
        self.memo[..value.len()].copy_from_slice(value);

        Ok(self)
    }

    /// Set an id memo
    pub fn with_memo_id(mut self, id: u64) -> Self {
        self.memo_type = MemoType::Id;
        self.memo_len = 8;
        self.memo = [0u8; MEMO_FIELD_LEN];
        self.memo[..8].copy_from_slice(&id.to_le_bytes());
        self
    }

    /// Fetch memo value bytes
    pub fn memo_value(&self) -> &[u8] {
        &self.memo[..(self.memo_len as usize).min(MEMO_FIELD_LEN)]
    }
}

impl<'a> Encode for TxInit<'a> {
    type Error = ApduError;

    /// Encode a [`TxInit`] APDU into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let p = self.network_passphrase.as_bytes();

        if p.len() > u16::MAX as usize {
            return Err(ApduError::InvalidLength);
        }
        if buff.len() < self.encode_len()? {
            return Err(ApduError::InvalidLength);
        }

        let mut index = 0;

        buff[index..][..4].copy_from_slice(&self.account_index.to_le_bytes());
        index += 4;

        buff[index..][..4].copy_from_slice(&self.fee.to_le_bytes());
        index += 4;

        buff[index..][..8].copy_from_slice(&self.sequence_number.to_le_bytes());
        index += 8;

        buff[index..][..4].copy_from_slice(&self.time_bound_min.to_le_bytes());
        index += 4;

        buff[index..][..4].copy_from_slice(&self.time_bound_max.to_le_bytes());
        index += 4;

        buff[index..][..4].copy_from_slice(&self.num_operations.to_le_bytes());
        index += 4;

        buff[index] = self.memo_type.into();
        buff[index + 1] = self.memo_len;
        buff[index + 2..][..2].copy_from_slice(&(p.len() as u16).to_le_bytes());
        index += 4;

        buff[index..][..MEMO_FIELD_LEN].copy_from_slice(&self.memo);
        index += MEMO_FIELD_LEN;

        buff[index..][..32].copy_from_slice(&self.source_account);
        index += 32;

        buff[index..][..p.len()].copy_from_slice(p);
        index += p.len();

        Ok(index)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(TX_INIT_HEADER_LEN + self.network_passphrase.len())
    }
}

impl<'a> Decode<'a> for TxInit<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a [`TxInit`] APDU from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < TX_INIT_HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        let u32_at = |i: usize| {
            u32::from_le_bytes([buff[i], buff[i + 1], buff[i + 2], buff[i + 3]])
        };

        let account_index = u32_at(0);
        let fee = u32_at(4);

        let mut s = [0u8; 8];
        s.copy_from_slice(&buff[8..16]);
        let sequence_number = u64::from_le_bytes(s);

        let time_bound_min = u32_at(16);
        let time_bound_max = u32_at(20);
        let num_operations = u32_at(24);

        let memo_type = MemoType::try_from(buff[28]).map_err(|_| ApduError::InvalidEncoding)?;
        let memo_len = buff[29];
        if memo_len as usize > MEMO_FIELD_LEN {
            return Err(ApduError::InvalidEncoding);
        }
        let passphrase_len = u16::from_le_bytes([buff[30], buff[31]]) as usize;

        let mut memo = [0u8; MEMO_FIELD_LEN];
        memo.copy_from_slice(&buff[32..64]);

        let mut source_account = [0u8; 32];
        source_account.copy_from_slice(&buff[64..96]);

        let mut index = TX_INIT_HEADER_LEN;

        if buff.len() < index + passphrase_len {
            return Err(ApduError::InvalidLength);
        }

        let network_passphrase = core::str::from_utf8(&buff[index..][..passphrase_len])
            .map_err(|_| ApduError::InvalidUtf8)?;
        index += passphrase_len;

        Ok((
            Self {
                account_index,
                fee,
                sequence_number,
                time_bound_min,
                time_bound_max,
                num_operations,
                memo_type,
                memo_len,
                memo,
                source_account,
                network_passphrase,
            },
            index,
        ))
    }
}
