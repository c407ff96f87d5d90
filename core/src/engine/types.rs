// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction value types, decoded from request APDUs and hashed by the engine

use heapless::Vec;
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use ledger_xlm_apdu::tx::MEMO_FIELD_LEN;

/// Public network passphrase
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Test network passphrase
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Maximum network passphrase length
pub const MAX_PASSPHRASE_LEN: usize = 1024;

/// Maximum memo text length
pub const MAX_MEMO_TEXT_LEN: usize = 28;

/// Stellar network, classified from the transaction network passphrase
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum Network {
    /// Public (main) network
    Public,
    /// SDF test network
    Testnet,
    /// Any other (private) network
    Other,
}

impl Network {
    /// Classify a network by exact match of the passphrase
    pub fn from_passphrase(passphrase: &str) -> Self {
        match passphrase {
            PUBLIC_PASSPHRASE => Network::Public,
            TESTNET_PASSPHRASE => Network::Testnet,
            _ => Network::Other,
        }
    }

    /// Warning displayed with prompts for non-public networks
    pub fn warning(&self) -> Option<&'static str> {
        match self {
            Network::Public => None,
            Network::Testnet => Some("WRN:TN"),
            Network::Other => Some("WRN:PN"),
        }
    }
}

/// Transaction time bounds (unix seconds, zero for unbounded)
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct TimeBounds {
    pub min: u32,
    pub max: u32,
}

impl TimeBounds {
    /// Build time bounds, present only where either bound is set
    pub fn new(min: u32, max: u32) -> Option<Self> {
        match (min, max) {
            (0, 0) => None,
            _ => Some(Self { min, max }),
        }
    }
}

/// Transaction memo
#[derive(Clone, PartialEq, Debug)]
pub enum Memo {
    None,
    /// Text memo (at most [`MAX_MEMO_TEXT_LEN`] bytes for a valid transaction)
    Text(Vec<u8, MEMO_FIELD_LEN>),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

impl Memo {
    /// Memo type discriminant
    pub fn memo_type(&self) -> u32 {
        match self {
            Memo::None => 0,
            Memo::Text(_) => 1,
            Memo::Id(_) => 2,
            Memo::Hash(_) => 3,
            Memo::Return(_) => 4,
        }
    }
}

/// Payment asset
#[derive(Clone, PartialEq, Debug)]
pub enum Asset {
    /// Native XLM
    Native,
    /// Issued asset with a 1-4 character code
    AlphaNum4 { code: [u8; 4], issuer: [u8; 32] },
    /// Issued asset with a 5-12 character code
    AlphaNum12 { code: [u8; 12], issuer: [u8; 32] },
}

impl Asset {
    /// Asset type discriminant
    pub fn asset_type(&self) -> u32 {
        match self {
            Asset::Native => 0,
            Asset::AlphaNum4 { .. } => 1,
            Asset::AlphaNum12 { .. } => 2,
        }
    }

    /// Asset code for display (stripped of zero padding)
    pub fn code(&self) -> &[u8] {
        let c: &[u8] = match self {
            Asset::Native => return b"XLM",
            Asset::AlphaNum4 { code, .. } => code,
            Asset::AlphaNum12 { code, .. } => code,
        };

        let n = c.iter().position(|b| *b == 0).unwrap_or(c.len());
        &c[..n]
    }

    /// Check issued asset codes are non-empty ASCII alphanumerics followed only by zero padding
    pub fn is_valid(&self) -> bool {
        let c: &[u8] = match self {
            Asset::Native => return true,
            Asset::AlphaNum4 { code, .. } => code,
            Asset::AlphaNum12 { code, .. } => code,
        };

        let n = self.code().len();

        n > 0 && c[..n].iter().all(u8::is_ascii_alphanumeric) && c[n..].iter().all(|b| *b == 0)
    }

    /// Asset issuer, `None` for native assets
    pub fn issuer(&self) -> Option<&[u8; 32]> {
        match self {
            Asset::Native => None,
            Asset::AlphaNum4 { issuer, .. } | Asset::AlphaNum12 { issuer, .. } => Some(issuer),
        }
    }
}

/// Transaction operation
#[derive(Clone, PartialEq, Debug)]
pub struct Operation {
    /// Source account override
    pub source: Option<[u8; 32]>,

    /// Operation body
    pub body: OperationBody,
}

/// Operation bodies
#[derive(Clone, PartialEq, Debug)]
pub enum OperationBody {
    /// Create and fund a new account
    CreateAccount {
        destination: [u8; 32],
        starting_balance: u64,
    },
    /// Send an amount of an asset to a destination account
    Payment {
        destination: [u8; 32],
        asset: Asset,
        amount: u64,
    },
    /// Operation types without engine support, always rejected
    Unsupported(u8),
}

impl OperationBody {
    /// Operation type discriminant
    pub fn op_type(&self) -> u32 {
        match self {
            OperationBody::CreateAccount { .. } => 0,
            OperationBody::Payment { .. } => 1,
            OperationBody::Unsupported(t) => *t as u32,
        }
    }
}
