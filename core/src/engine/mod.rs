// Copyright (c) 2022-2023 The MobileCoin Foundation

//! The [Engine] provides Stellar transaction signing for hardware wallets.
//!
//! This handles [Event] inputs and returns [Output] responses to the caller,
//! see [apdu][crate::apdu] for APDU protocol / encoding specifications.
//!
//! Platform support (key derivation and user confirmation) is provided via the [Driver] trait.

use strum::{Display, EnumIter, EnumString, EnumVariantNames};
use zeroize::Zeroizing;

use ledger_proto::ApduStatic;
use ledger_xlm_apdu::{
    app_info::AppFlags,
    tx::{TxInit, TxOp},
};

mod account;
pub use account::{account_path, AccountKeys, STELLAR_COIN_TYPE};

mod chunk;
pub use chunk::{ChunkBuffer, MAX_MESSAGE_LEN};

mod error;
pub use error::Error;

mod event;
pub use event::Event;

mod hasher;
pub use hasher::TxHasher;

mod output;
pub use output::{Output, APP_NAME, APP_VERSION};

mod prompt;
pub use prompt::{Line, Prompt, PromptKind, LINE_LEN, MAX_LINES};

mod session;
pub use session::{Session, TxHeader};

pub mod types;

/// Engine internal state enumeration
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum State {
    /// Idle state, no transaction running
    Init,
    /// Header confirmed, awaiting operations (with confirmed operation count)
    Operations(u32),
    /// All operations confirmed, ready to sign
    Ready,
    /// Transaction signed
    Complete,
    /// Transaction denied / aborted
    Deny,
    /// Transaction failed
    Error,
}

/// [`Driver`] trait provides platform support for [`Engine`] instances
pub trait Driver {
    /// SLIP-0010 derivation for ed25519 keys, returning `None` where
    /// root key material is unavailable (ie. the device is locked)
    fn slip10_derive_ed25519(&self, path: &[u32]) -> Option<Zeroizing<[u8; 32]>>;

    /// Display a prompt and block for user confirmation, returning `true` if accepted
    fn confirm(&mut self, prompt: &Prompt) -> bool;
}

impl<T: Driver> Driver for &mut T {
    fn slip10_derive_ed25519(&self, path: &[u32]) -> Option<Zeroizing<[u8; 32]>> {
        T::slip10_derive_ed25519(self, path)
    }

    fn confirm(&mut self, prompt: &Prompt) -> bool {
        T::confirm(self, prompt)
    }
}

/// [Engine] provides hardware-independent support for Stellar wallet operations
pub struct Engine<DRV: Driver> {
    state: State,

    session: Option<Session>,

    chunks: ChunkBuffer,

    drv: DRV,
}

impl<DRV: Driver> Engine<DRV> {
    /// Create a new engine instance with the provided driver
    pub const fn new(drv: DRV) -> Self {
        Self {
            state: State::Init,
            session: None,
            chunks: ChunkBuffer::new(),
            drv,
        }
    }

    /// Parse and handle an incoming request APDU
    pub fn apdu(&mut self, ins: u8, buff: &[u8]) -> Result<Output, Error> {
        match Event::parse(ins, buff) {
            Ok(evt) => self.update(&evt),
            Err(e) => {
                #[cfg(feature = "log")]
                log::error!("failed to parse apdu (ins: {:02x}): {:?}", ins, e);

                let e = Error::from(e);
                self.fail(&e);
                Err(e)
            }
        }
    }

    /// Handle incoming events.
    ///
    /// Any error while a transaction is in progress discards the session.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn update(&mut self, evt: &Event) -> Result<Output, Error> {
        #[cfg(feature = "log")]
        log::debug!("event: {:02x?}", evt);

        let r = match evt {
            Event::None => Ok(Output::None),
            Event::GetAppInfo => Ok(Output::AppInfo {
                flags: AppFlags::HAS_CHUNKED_LOAD | AppFlags::HAS_TX_REVIEW,
            }),
            Event::GetPublicKey {
                account_index,
                display,
            } => return self.get_public_key(*account_index, *display),
            _ => self.tx_update(evt),
        };

        if let Err(e) = &r {
            self.fail(e);
        }

        r
    }

    #[cfg_attr(feature = "noinline", inline(never))]
    fn tx_update(&mut self, evt: &Event) -> Result<Output, Error> {
        match (self.state, evt) {
            // Start a new transaction from any state
            (_, Event::TxInit(header)) => {
                if self.session.is_some() {
                    #[cfg(feature = "log")]
                    log::warn!("new transaction header, discarding session in progress");
                }

                self.session = None;
                self.chunks.clear();

                match Session::begin(&self.drv, header) {
                    Ok(s) => {
                        self.session = Some(s);
                        self.state = State::Operations(0);
                    }
                    Err(e) => {
                        self.state = State::Error;
                        return Err(e);
                    }
                }
            }

            // Review the transaction summary prior to any operation
            (State::Operations(0), Event::TxReview) => self.review()?,
            (_, Event::TxReview) => return Err(Error::UnexpectedEvent),

            // Confirm and hash an operation, once the summary is reviewed
            (State::Operations(_), Event::TxAddOperation(op)) => {
                let session = self.session.as_mut().ok_or(Error::NotSigning)?;

                session.add_operation(&mut self.drv, op)?;

                self.state = match session.is_complete() {
                    true => State::Ready,
                    false => State::Operations(session.confirmed()),
                };
            }
            (_, Event::TxAddOperation(_)) => return Err(Error::NotSigning),

            // Load a chunk of a larger message
            (_, Event::TxLoad {
                ins,
                total_len,
                offset,
                data,
            }) => {
                if *ins != TxInit::INS && *ins != TxOp::INS {
                    return Err(Error::UnexpectedEvent);
                }

                // Return progress until the final chunk is received
                if !self.chunks.push(*ins, *total_len, *offset, data)? {
                    return Ok(self.info());
                }

                // Process the complete message as the target instruction
                let chunks = core::mem::take(&mut self.chunks);
                let (ins, message) = chunks.message();

                let evt = Event::parse(ins, message)?;
                return self.tx_update(&evt);
            }

            // Sign the completed transaction
            (State::Ready, Event::TxSign) => return self.sign(),
            (State::Operations(_), Event::TxSign) => return Err(Error::IncompleteTransaction),
            (_, Event::TxSign) => return Err(Error::NotSigning),

            // Abort any transaction in progress
            (_, Event::TxAbort) => {
                if self.session.is_some() || self.chunks.is_loading() {
                    #[cfg(feature = "log")]
                    log::warn!("transaction aborted");

                    self.session = None;
                    self.chunks.clear();
                    self.state = State::Deny;
                }
            }

            // Fetch transaction state / information
            (_, Event::TxGetInfo) => (),

            // Handle unexpected events
            _e => {
                #[cfg(feature = "log")]
                log::error!("Unexpected event in state {:?}: {:02x?}", self.state, _e);

                return Err(Error::UnexpectedEvent);
            }
        }

        Ok(self.info())
    }

    /// Derive (and optionally display) an account public key.
    ///
    /// This does not interact with any transaction in progress.
    #[cfg_attr(feature = "noinline", inline(never))]
    fn get_public_key(&mut self, account_index: u32, display: bool) -> Result<Output, Error> {
        let public_key = AccountKeys::derive(&self.drv, account_index)?.public_key();

        if display && !self.drv.confirm(&Prompt::share_public_key(account_index, &public_key)) {
            return Err(Error::UserCancelled);
        }

        Ok(Output::PublicKey {
            account_index,
            public_key,
        })
    }

    /// Finalise the session and sign the transaction digest
    #[cfg_attr(feature = "noinline", inline(never))]
    fn sign(&mut self) -> Result<Output, Error> {
        let session = self.session.as_ref().ok_or(Error::NotSigning)?;

        let keys = AccountKeys::derive(&self.drv, session.account_index())?;
        let public_key = keys.public_key();

        if &public_key != session.signer() {
            #[cfg(feature = "log")]
            log::error!("derived key does not match session signer");

            return Err(Error::KeyMismatch);
        }

        let digest = match self.session.take() {
            Some(s) => s.finalize(),
            None => return Err(Error::NotSigning),
        };

        #[cfg(feature = "log")]
        log::debug!("signing digest: {:02x?}", digest);

        let signature = keys.sign(&digest);

        self.state = State::Complete;

        Ok(Output::TxSignature {
            public_key,
            signature,
        })
    }

    /// Present the transaction summary (fee, signer, memo and time bounds) for review.
    ///
    /// Rejection of any page aborts the transaction.
    #[cfg_attr(feature = "noinline", inline(never))]
    fn review(&mut self) -> Result<(), Error> {
        let session = self.session.as_mut().ok_or(Error::NotSigning)?;

        session.review(&mut self.drv)?;

        #[cfg(feature = "log")]
        log::debug!("transaction summary approved");

        Ok(())
    }

    /// Discard session state following an error
    fn fail(&mut self, e: &Error) {
        if self.session.is_none() && !self.chunks.is_loading() {
            return;
        }

        #[cfg(feature = "log")]
        log::warn!("discarding transaction: {:?}", e);

        self.session = None;
        self.chunks.clear();
        self.state = match e {
            Error::UserCancelled => State::Deny,
            _ => State::Error,
        };
    }

    /// Build a state output for the current engine state
    fn info(&self) -> Output {
        let (confirmed, total) = match &self.session {
            Some(s) => (s.confirmed(), s.num_operations()),
            None => (0, 0),
        };

        Output::State {
            state: self.state,
            offset: self.chunks.offset(),
            confirmed,
            total,
        }
    }

    /// Fetch current engine state
    pub fn state(&self) -> State {
        self.state
    }

    /// Fetch the active signing session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Fetch a reference to the engine driver
    pub fn driver(&self) -> &DRV {
        &self.drv
    }

    /// Fetch a mutable reference to the engine driver
    pub fn driver_mut(&mut self) -> &mut DRV {
        &mut self.drv
    }
}
