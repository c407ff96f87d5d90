// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Reassembly of messages delivered in [`TxLoad`][crate::apdu::tx::TxLoad] chunks

use heapless::Vec;

use super::{types::MAX_PASSPHRASE_LEN, Error};
use crate::apdu::tx::TX_INIT_HEADER_LEN;

/// Maximum reassembled message length (a [`TxInit`][crate::apdu::tx::TxInit]
/// with the longest supported passphrase)
pub const MAX_MESSAGE_LEN: usize = TX_INIT_HEADER_LEN + MAX_PASSPHRASE_LEN;

/// Chunk reassembly buffer
#[derive(Clone, PartialEq, Debug, Default)]
pub struct ChunkBuffer {
    ins: u8,
    total_len: u16,
    buff: Vec<u8, MAX_MESSAGE_LEN>,
}

impl ChunkBuffer {
    /// Create a new (empty) chunk buffer
    pub const fn new() -> Self {
        Self {
            ins: 0,
            total_len: 0,
            buff: Vec::new(),
        }
    }

    /// Check whether a message is partially loaded
    pub fn is_loading(&self) -> bool {
        !self.buff.is_empty()
    }

    /// Next expected chunk offset
    pub fn offset(&self) -> u16 {
        self.buff.len() as u16
    }

    /// Discard any partially loaded message
    pub fn clear(&mut self) {
        self.ins = 0;
        self.total_len = 0;
        self.buff.clear();
    }

    /// Append a chunk, returning `true` once the message is complete.
    ///
    /// Chunks must be contiguous, start at offset zero, and agree on the target
    /// instruction and total length.
    pub fn push(
        &mut self,
        ins: u8,
        total_len: u16,
        offset: u16,
        data: &[u8],
    ) -> Result<bool, Error> {
        if offset as usize != self.buff.len() {
            return Err(Error::InvalidOffset);
        }

        if self.buff.is_empty() {
            if total_len == 0 || total_len as usize > MAX_MESSAGE_LEN {
                return Err(Error::InvalidLength);
            }

            self.ins = ins;
            self.total_len = total_len;
        } else if ins != self.ins || total_len != self.total_len {
            return Err(Error::InvalidLength);
        }

        if self.buff.len() + data.len() > self.total_len as usize {
            return Err(Error::InvalidLength);
        }

        self.buff
            .extend_from_slice(data)
            .map_err(|_| Error::InvalidLength)?;

        Ok(self.buff.len() == self.total_len as usize)
    }

    /// Fetch the target instruction and loaded message
    pub fn message(&self) -> (u8, &[u8]) {
        (self.ins, &self.buff)
    }
}
