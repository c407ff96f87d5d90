// Copyright (c) 2022-2023 The MobileCoin Foundation

use byteorder::{ByteOrder, LittleEndian};
use encdec::{Decode, DecodeOwned};
use heapless::Vec;

use ledger_proto::{ApduError, ApduStatic};
use ledger_xlm_apdu::prelude::*;

use super::{
    session::TxHeader,
    types::{Asset, Memo, Operation, OperationBody, TimeBounds},
};

/// [`Engine`][super::Engine] input events, typically decoded from request [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Event<'a> {
    None,

    /// Fetch application information
    GetAppInfo,

    /// Fetch (and optionally display) an account public key
    GetPublicKey { account_index: u32, display: bool },

    /// Begin a transaction signing session
    TxInit(TxHeader<'a>),

    /// Display the transaction summary for review
    TxReview,

    /// Confirm and hash a transaction operation
    TxAddOperation(Operation),

    /// Load a chunk of a larger message
    TxLoad {
        ins: u8,
        total_len: u16,
        offset: u16,
        data: &'a [u8],
    },

    /// Sign the completed transaction
    TxSign,

    /// Abort the running transaction
    TxAbort,

    /// Fetch TX info / state
    TxGetInfo,
}

/// Helper for decoding APDUs to events
fn decode_event<'a, T>(buff: &'a [u8]) -> Result<Event<'a>, ApduError>
where
    T: Decode<'a, Error = ApduError>,
    Event<'a>: From<T::Output>,
{
    T::decode(buff).map(|(v, _n)| Event::from(v))
}

impl<'a> Event<'a> {
    /// Parse an incoming APDU to engine event
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn parse(ins: u8, buff: &'a [u8]) -> Result<Self, ApduError> {
        match ins {
            AppInfoReq::INS => AppInfoReq::decode_owned(buff).map(|(apdu, _n)| Event::from(apdu)),
            PublicKeyReq::INS => decode_event::<PublicKeyReq>(buff),

            TxInit::INS => decode_event::<TxInit>(buff),
            TxReview::INS => decode_event::<TxReview>(buff),
            TxOp::INS => decode_event::<TxOp>(buff),
            TxLoad::INS => decode_event::<TxLoad>(buff),
            TxSign::INS => decode_event::<TxSign>(buff),
            TxAbort::INS => decode_event::<TxAbort>(buff),
            TxInfoReq::INS => decode_event::<TxInfoReq>(buff),

            _ => Err(ApduError::InvalidEncoding),
        }
    }
}

impl<'a> From<AppInfoReq> for Event<'a> {
    fn from(_: AppInfoReq) -> Self {
        Event::GetAppInfo
    }
}

impl<'a> From<PublicKeyReq> for Event<'a> {
    fn from(a: PublicKeyReq) -> Self {
        Event::GetPublicKey {
            account_index: a.account_index,
            display: a.flags.contains(PublicKeyFlags::DISPLAY),
        }
    }
}

impl<'a> From<TxInit<'a>> for Event<'a> {
    fn from(a: TxInit<'a>) -> Self {
        // Note the client-claimed source account is ignored, the session
        // always signs with (and hashes) the derived account key
        let memo = match a.memo_type {
            MemoType::None => Memo::None,
            MemoType::Text => {
                let mut t = Vec::new();
                // Memo values are bounded by the field length
                let _ = t.extend_from_slice(a.memo_value());
                Memo::Text(t)
            }
            MemoType::Id => Memo::Id(LittleEndian::read_u64(&a.memo[..8])),
            MemoType::Hash => Memo::Hash(a.memo),
            MemoType::Return => Memo::Return(a.memo),
        };

        Event::TxInit(TxHeader {
            account_index: a.account_index,
            fee: a.fee,
            sequence_number: a.sequence_number,
            time_bounds: TimeBounds::new(a.time_bound_min, a.time_bound_max),
            memo,
            num_operations: a.num_operations,
            network_passphrase: a.network_passphrase,
        })
    }
}

impl<'a> From<TxOp> for Event<'a> {
    fn from(a: TxOp) -> Self {
        let body = match OperationType::try_from(a.op_type) {
            Ok(OperationType::CreateAccount) => OperationBody::CreateAccount {
                destination: a.destination,
                starting_balance: a.amount,
            },
            Ok(OperationType::Payment) => {
                let asset = match a.asset_type {
                    AssetType::Native => Asset::Native,
                    AssetType::AlphaNum4 => {
                        let mut code = [0u8; 4];
                        code.copy_from_slice(&a.asset_code[..4]);

                        Asset::AlphaNum4 {
                            code,
                            issuer: a.asset_issuer,
                        }
                    }
                    AssetType::AlphaNum12 => Asset::AlphaNum12 {
                        code: a.asset_code,
                        issuer: a.asset_issuer,
                    },
                };

                OperationBody::Payment {
                    destination: a.destination,
                    asset,
                    amount: a.amount,
                }
            }
            Err(_) => OperationBody::Unsupported(a.op_type),
        };

        Event::TxAddOperation(Operation {
            source: a.source().copied(),
            body,
        })
    }
}

impl<'a> From<TxLoad<'a>> for Event<'a> {
    fn from(a: TxLoad<'a>) -> Self {
        Event::TxLoad {
            ins: a.ins,
            total_len: a.total_len,
            offset: a.offset,
            data: a.data,
        }
    }
}

impl<'a> From<TxReview> for Event<'a> {
    fn from(_: TxReview) -> Self {
        Event::TxReview
    }
}

impl<'a> From<TxSign> for Event<'a> {
    fn from(_: TxSign) -> Self {
        Event::TxSign
    }
}

impl<'a> From<TxAbort> for Event<'a> {
    fn from(_: TxAbort) -> Self {
        Event::TxAbort
    }
}

impl<'a> From<TxInfoReq> for Event<'a> {
    fn from(_: TxInfoReq) -> Self {
        Event::TxGetInfo
    }
}
