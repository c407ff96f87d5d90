// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing session.
//!
//! A [Session] is created from a transaction header, hashing the header fields
//! in envelope order, then accepts one operation at a time, each confirmed by the user
//! before being counted. Once all declared operations are confirmed the session may be
//! finalised to produce the transaction digest.

use heapless::Vec;

use super::{
    account::AccountKeys,
    hasher::TxHasher,
    prompt::{Line, Prompt},
    types::{
        Memo, Network, Operation, OperationBody, TimeBounds, MAX_MEMO_TEXT_LEN,
        MAX_PASSPHRASE_LEN,
    },
    Driver, Error,
};

/// Maximum number of review prompts
const MAX_REVIEW_PROMPTS: usize = 3;

/// Transaction header, used to start a signing [Session]
#[derive(Clone, PartialEq, Debug)]
pub struct TxHeader<'a> {
    /// Signing account index
    pub account_index: u32,
    /// Transaction fee (stroops)
    pub fee: u32,
    /// Source account sequence number
    pub sequence_number: u64,
    /// Optional time bounds
    pub time_bounds: Option<TimeBounds>,
    /// Transaction memo
    pub memo: Memo,
    /// Declared operation count
    pub num_operations: u32,
    /// Network passphrase
    pub network_passphrase: &'a str,
}

/// Active transaction signing session
pub struct Session {
    network: Network,
    account_index: u32,
    signer: [u8; 32],
    header: Line,

    num_operations: u32,
    confirmed: u32,
    reviewed: bool,

    fee: u32,
    memo: Memo,
    time_bounds: Option<TimeBounds>,

    hasher: TxHasher,
}

impl Session {
    /// Begin a signing session from a transaction header.
    ///
    /// The signing account is derived on-device and hashed as the transaction source,
    /// no user interaction is required.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn begin(drv: &impl Driver, h: &TxHeader) -> Result<Self, Error> {
        if h.num_operations == 0 {
            return Err(Error::InvalidOperationCount);
        }
        if h.network_passphrase.len() > MAX_PASSPHRASE_LEN {
            return Err(Error::PassphraseTooLong);
        }
        if let Memo::Text(t) = &h.memo {
            if t.len() > MAX_MEMO_TEXT_LEN {
                return Err(Error::MemoTooLong);
            }
        }

        let mut hasher = TxHasher::new();

        // Network id and envelope type
        hasher.update_network(h.network_passphrase);

        // Source account, always the derived signer
        let signer = AccountKeys::derive(drv, h.account_index)?.public_key();
        hasher.update_address(&signer);

        hasher.update_u32(h.fee);
        hasher.update_u64(h.sequence_number);
        hasher.update_time_bounds(h.time_bounds.as_ref());
        hasher.update_memo(&h.memo);
        hasher.update_u32(h.num_operations);

        let network = Network::from_passphrase(h.network_passphrase);

        #[cfg(feature = "log")]
        log::debug!(
            "begin session, account: {} network: {} operations: {}",
            h.account_index,
            network,
            h.num_operations
        );

        Ok(Self {
            network,
            account_index: h.account_index,
            signer,
            header: Prompt::signer_header(h.account_index, &signer),
            num_operations: h.num_operations,
            confirmed: 0,
            reviewed: false,
            fee: h.fee,
            memo: h.memo.clone(),
            time_bounds: h.time_bounds,
            hasher,
        })
    }

    /// Present the transaction summary (fee, signer, memo and time bounds) for confirmation.
    ///
    /// Operations are only accepted once the review is approved.
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn review(&mut self, drv: &mut impl Driver) -> Result<(), Error> {
        for p in &self.review_prompts() {
            self.confirm(drv, p)?;
        }

        self.reviewed = true;

        Ok(())
    }

    /// Confirm and hash a single operation
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn add_operation(&mut self, drv: &mut impl Driver, op: &Operation) -> Result<(), Error> {
        if !self.reviewed {
            #[cfg(feature = "log")]
            log::error!("operation received before transaction review");

            return Err(Error::UnexpectedEvent);
        }
        if self.confirmed >= self.num_operations {
            return Err(Error::NotSigning);
        }

        // Unsupported operations are rejected before any hashing
        if let OperationBody::Unsupported(_t) = op.body {
            #[cfg(feature = "log")]
            log::warn!("unsupported operation type: {}", _t);

            return Err(Error::UnsupportedOperationType);
        }

        if let OperationBody::Payment { asset, .. } = &op.body {
            if !asset.is_valid() {
                return Err(Error::InvalidEncoding);
            }
        }

        // Source account override
        match &op.source {
            Some(source) => {
                let p = Prompt::source_account(&self.header, self.network, source);
                self.confirm(drv, &p)?;

                self.hasher.update_address(source);
            }
            None => self.hasher.update_bool(false),
        }

        self.hasher.update_u32(op.body.op_type());

        let p = match &op.body {
            OperationBody::CreateAccount {
                destination,
                starting_balance,
            } => {
                self.hasher.update_address(destination);
                self.hasher.update_u64(*starting_balance);

                Prompt::create_account(&self.header, self.network, destination, *starting_balance)
            }
            OperationBody::Payment {
                destination,
                asset,
                amount,
            } => {
                self.hasher.update_address(destination);
                self.hasher.update_asset(asset);
                self.hasher.update_u64(*amount);

                Prompt::payment(&self.header, self.network, destination, asset, *amount)
            }
            OperationBody::Unsupported(_) => return Err(Error::UnsupportedOperationType),
        };

        self.confirm(drv, &p)?;

        self.confirmed += 1;

        // Trailing (empty) transaction extension follows the final operation
        if self.confirmed == self.num_operations {
            self.hasher.update_u32(0);
        }

        Ok(())
    }

    fn confirm(&self, drv: &mut impl Driver, p: &Prompt) -> Result<(), Error> {
        match drv.confirm(p) {
            true => Ok(()),
            false => {
                #[cfg(feature = "log")]
                log::warn!("{} rejected by user", p.kind);

                Err(Error::UserCancelled)
            }
        }
    }

    /// Build transaction review prompts (summary, memo, and time bounds where set)
    pub fn review_prompts(&self) -> Vec<Prompt, MAX_REVIEW_PROMPTS> {
        let mut prompts = Vec::new();

        let _ = prompts.push(Prompt::summary(
            &self.header,
            self.network,
            self.fee,
            self.num_operations,
            &self.signer,
        ));
        let _ = prompts.push(Prompt::memo(&self.header, self.network, &self.memo));

        if let Some(t) = &self.time_bounds {
            let _ = prompts.push(Prompt::time_bounds(&self.header, self.network, t));
        }

        prompts
    }

    /// Check whether the transaction summary has been approved
    pub fn is_reviewed(&self) -> bool {
        self.reviewed
    }

    /// Check whether all declared operations have been confirmed
    pub fn is_complete(&self) -> bool {
        self.confirmed == self.num_operations
    }

    /// Finalise the session, returning the transaction digest
    pub fn finalize(self) -> [u8; 32] {
        self.hasher.finalize()
    }

    /// Network classified from the session passphrase
    pub fn network(&self) -> Network {
        self.network
    }

    /// Signing account index
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Derived signing public key
    pub fn signer(&self) -> &[u8; 32] {
        &self.signer
    }

    /// Number of confirmed operations
    pub fn confirmed(&self) -> u32 {
        self.confirmed
    }

    /// Number of declared operations
    pub fn num_operations(&self) -> u32 {
        self.num_operations
    }
}
