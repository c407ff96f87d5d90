// Copyright (c) 2022-2023 The MobileCoin Foundation

use encdec::Encode;

use ledger_proto::ApduError;

use crate::apdu::{
    self,
    app_info::{AppFlags, AppInfoResp},
    XLM_PROTO_VERSION,
};

/// Application name reported via [`AppInfoResp`]
pub const APP_NAME: &str = "Stellar";

/// Application version reported via [`AppInfoResp`]
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// [`Engine`][super::Engine] outputs (in response to events), typically encoded to response [APDUs][crate::apdu]
#[derive(Clone, PartialEq, Debug)]
pub enum Output {
    None,

    /// Application information
    AppInfo { flags: AppFlags },

    /// Engine state
    State {
        state: super::State,
        /// Next expected chunk offset
        offset: u16,
        /// Confirmed operation count
        confirmed: u32,
        /// Declared operation count
        total: u32,
    },

    /// Account public key
    PublicKey {
        account_index: u32,
        public_key: [u8; 32],
    },

    /// Signed transaction
    TxSignature {
        public_key: [u8; 32],
        signature: [u8; 64],
    },
}

impl Output {
    /// Encode an [`Output`] object to a response [APDU]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        match self {
            Output::None => Ok(0),
            Output::AppInfo { flags } => {
                AppInfoResp::new(XLM_PROTO_VERSION, APP_NAME, APP_VERSION, *flags).encode(buff)
            }
            Output::State {
                state,
                offset,
                confirmed,
                total,
            } => apdu::tx::TxInfo::new(state.state(), *offset, *confirmed, *total).encode(buff),
            Output::PublicKey {
                account_index,
                public_key,
            } => apdu::public_key::PublicKeyResp::new(*account_index, *public_key).encode(buff),
            Output::TxSignature {
                public_key,
                signature,
            } => apdu::tx::TxSignature::new(*public_key, *signature).encode(buff),
        }
    }
}

impl PartialEq<super::State> for Output {
    fn eq(&self, other: &super::State) -> bool {
        match self {
            Output::State { state, .. } => state == other,
            _ => false,
        }
    }
}

impl crate::engine::State {
    /// Map [engine](crate::engine) states to [apdu][apdu::state::TxState] states for transmission
    pub fn state(&self) -> apdu::state::TxState {
        use crate::{apdu::state::TxState, engine::State};

        match self {
            State::Init => TxState::Init,
            State::Operations(_n) => TxState::Operations,
            State::Ready => TxState::Ready,
            State::Complete => TxState::Complete,
            State::Deny => TxState::Denied,
            State::Error => TxState::Error,
        }
    }
}
