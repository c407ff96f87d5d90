//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    app_info::{AppFlags, AppInfoReq, AppInfoResp},
    public_key::{PublicKeyFlags, PublicKeyReq, PublicKeyResp},
    state::TxState,
    tx::{
        AssetType, MemoType, OperationType, TxAbort, TxInfo, TxInfoReq, TxInit, TxLoad, TxOp,
        TxOpFlags, TxReview, TxSign, TxSignature,
    },
};
