// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Chunked message loading.
//!
//! Messages that do not fit in a single APDU (ie. a [`TxInit`][super::TxInit] with a
//! long network passphrase) are split into [`TxLoad`] chunks, each carrying the target
//! instruction, the total message length and the offset of the chunk within the message.
//!
//! The device responds to each partial chunk with a [`TxInfo`][super::TxInfo] containing
//! the next expected offset, and processes the complete message as the target instruction
//! once the final chunk is received. Offsets must be contiguous, any gap or repeat
//! fails the transaction.

use encdec::{Decode, Encode};
use ledger_proto::ApduStatic;

use crate::{ApduError, Instruction, XLM_APDU_CLA};

/// Default chunk data length for [`TxLoad`] APDUs
pub const CHUNK_LEN: usize = 192;

/// Length of the [`TxLoad`] header
pub const TX_LOAD_HEADER_LEN: usize = 8;

/// Load a chunk of a larger message
///
/// ## Encoding:
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |  TARGET_INS   |   RESERVED    |           TOTAL_LEN           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |            OFFSET             |           CHUNK_LEN           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// /                           CHUNK_DATA                          /
/// /                       (variable length)                       /
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, PartialEq, Debug)]
pub struct TxLoad<'a> {
    /// Instruction of the chunked message
    pub ins: u8,

    /// Total length of the chunked message
    pub total_len: u16,

    /// Offset of this chunk in the message
    pub offset: u16,

    /// Chunk data
    pub data: &'a [u8],
}

impl<'a> ApduStatic for TxLoad<'a> {
    const CLA: u8 = XLM_APDU_CLA;
    const INS: u8 = Instruction::TxLoad as u8;
}

impl<'a> TxLoad<'a> {
    /// Create a new [`TxLoad`] chunk
    pub fn new(ins: u8, total_len: u16, offset: u16, data: &'a [u8]) -> Self {
        Self {
            ins,
            total_len,
            offset,
            data,
        }
    }

    /// Split an encoded message into [`TxLoad`] chunks of at most `chunk_len` bytes
    pub fn chunks(ins: u8, message: &'a [u8], chunk_len: usize) -> Chunks<'a> {
        Chunks {
            ins,
            message,
            chunk_len: chunk_len.max(1),
            offset: 0,
        }
    }

    /// Check whether this is the final chunk of the message
    pub fn is_last(&self) -> bool {
        self.offset as usize + self.data.len() >= self.total_len as usize
    }
}

impl<'a> Encode for TxLoad<'a> {
    type Error = ApduError;

    /// Encode a [`TxLoad`] APDU into the provided buffer
    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let d = self.data;

        if d.len() > u16::MAX as usize || buff.len() < TX_LOAD_HEADER_LEN + d.len() {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.ins;
        buff[1] = 0;
        buff[2..4].copy_from_slice(&self.total_len.to_le_bytes());
        buff[4..6].copy_from_slice(&self.offset.to_le_bytes());
        buff[6..8].copy_from_slice(&(d.len() as u16).to_le_bytes());

        buff[TX_LOAD_HEADER_LEN..][..d.len()].copy_from_slice(d);

        Ok(TX_LOAD_HEADER_LEN + d.len())
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        Ok(TX_LOAD_HEADER_LEN + self.data.len())
    }
}

impl<'a> Decode<'a> for TxLoad<'a> {
    type Output = Self;
    type Error = ApduError;

    /// Decode a [`TxLoad`] APDU from the provided buffer
    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < TX_LOAD_HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        let ins = buff[0];
        let total_len = u16::from_le_bytes([buff[2], buff[3]]);
        let offset = u16::from_le_bytes([buff[4], buff[5]]);
        let chunk_len = u16::from_le_bytes([buff[6], buff[7]]) as usize;

        if buff.len() < TX_LOAD_HEADER_LEN + chunk_len {
            return Err(ApduError::InvalidLength);
        }

        let data = &buff[TX_LOAD_HEADER_LEN..][..chunk_len];

        Ok((
            Self {
                ins,
                total_len,
                offset,
                data,
            },
            TX_LOAD_HEADER_LEN + chunk_len,
        ))
    }
}

/// Iterator over [`TxLoad`] chunks of a message, see [`TxLoad::chunks`]
pub struct Chunks<'a> {
    ins: u8,
    message: &'a [u8],
    chunk_len: usize,
    offset: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = TxLoad<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.message.len() {
            return None;
        }

        let n = self.chunk_len.min(self.message.len() - self.offset);
        let c = TxLoad::new(
            self.ins,
            self.message.len() as u16,
            self.offset as u16,
            &self.message[self.offset..][..n],
        );

        self.offset += n;

        Some(c)
    }
}
