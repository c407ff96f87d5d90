// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction hash builder, reconstructs the canonical Stellar transaction
//! signature base from decoded transaction fields.
//!
//! All integers are serialised big-endian. Callers must apply updates in the exact
//! order of the transaction envelope, the hasher is append-only and cannot be rewound.

use byteorder::{BigEndian, ByteOrder};
use sha2::{digest::Update, Digest, Sha256};

use super::types::{Asset, Memo, TimeBounds};

/// Envelope type discriminant for transactions
pub const ENVELOPE_TYPE_TX: u32 = 2;

/// Public key type discriminant for ed25519 account ids
pub const PUBLIC_KEY_TYPE_ED25519: u32 = 0;

/// Streaming hasher with typed update primitives
pub struct TxHasher<H: Update = Sha256> {
    h: H,
}

impl TxHasher<Sha256> {
    /// Create a new (empty) SHA-256 transaction hasher
    pub fn new() -> Self {
        Self { h: Sha256::new() }
    }

    /// Finalise the hasher, returning the transaction digest
    pub fn finalize(self) -> [u8; 32] {
        self.h.finalize().into()
    }
}

impl Default for TxHasher<Sha256> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Update> TxHasher<H> {
    /// Create a transaction hasher over an arbitrary update sink
    pub fn from_inner(h: H) -> Self {
        Self { h }
    }

    /// Unwrap the underlying update sink
    pub fn into_inner(self) -> H {
        self.h
    }

    /// Append raw bytes
    pub fn update_bytes(&mut self, data: &[u8]) {
        self.h.update(data);
    }

    /// Append a big-endian u32
    pub fn update_u32(&mut self, v: u32) {
        let mut b = [0u8; 4];
        BigEndian::write_u32(&mut b, v);
        self.update_bytes(&b);
    }

    /// Append a big-endian u64
    pub fn update_u64(&mut self, v: u64) {
        let mut b = [0u8; 8];
        BigEndian::write_u64(&mut b, v);
        self.update_bytes(&b);
    }

    /// Append a boolean as a u32
    pub fn update_bool(&mut self, v: bool) {
        self.update_u32(v as u32);
    }

    /// Append a length-prefixed string.
    ///
    /// Note no alignment padding is applied.
    pub fn update_string(&mut self, s: &[u8]) {
        self.update_u32(s.len() as u32);
        self.update_bytes(s);
    }

    /// Append an ed25519 account id
    pub fn update_address(&mut self, public_key: &[u8; 32]) {
        self.update_u32(PUBLIC_KEY_TYPE_ED25519);
        self.update_bytes(public_key);
    }

    /// Append the network id (`SHA256(passphrase)`) and transaction envelope type
    pub fn update_network(&mut self, passphrase: &str) {
        let network_id = Sha256::digest(passphrase.as_bytes());

        self.update_bytes(&network_id);
        self.update_u32(ENVELOPE_TYPE_TX);
    }

    /// Append optional time bounds, 32-bit bounds are encoded as 64-bit values
    pub fn update_time_bounds(&mut self, time_bounds: Option<&TimeBounds>) {
        match time_bounds {
            Some(t) => {
                self.update_bool(true);
                self.update_u64(t.min as u64);
                self.update_u64(t.max as u64);
            }
            None => self.update_bool(false),
        }
    }

    /// Append a memo (type then value)
    pub fn update_memo(&mut self, memo: &Memo) {
        self.update_u32(memo.memo_type());

        match memo {
            Memo::None => (),
            Memo::Text(t) => self.update_string(t),
            Memo::Id(id) => self.update_u64(*id),
            Memo::Hash(h) | Memo::Return(h) => self.update_bytes(h),
        }
    }

    /// Append an asset (type, then code and raw issuer key for issued assets)
    pub fn update_asset(&mut self, asset: &Asset) {
        self.update_u32(asset.asset_type());

        match asset {
            Asset::Native => (),
            Asset::AlphaNum4 { code, issuer } => {
                self.update_bytes(code);
                self.update_bytes(issuer);
            }
            Asset::AlphaNum12 { code, issuer } => {
                self.update_bytes(code);
                self.update_bytes(issuer);
            }
        }
    }
}
