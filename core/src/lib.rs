// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Stellar hardware wallet core
//!
//! This provides a common [Engine][engine] supporting Stellar transaction signing
//! for execution on hardware wallets.
//!
//! Interactions with the [Engine][engine] are performed via [Event][engine::Event]s and [Output][engine::Output]s,
//! see [ledger_xlm_apdu] for APDU objects and wire encodings.
//!
//! ## Operations
//!
//! Prior to interacting with a hardware wallet the client should issue an
//! [`AppInfoReq`][ledger_xlm_apdu::app_info::AppInfoReq] to fetch an
//! [`AppInfoResp`][ledger_xlm_apdu::app_info::AppInfoResp] containing application information
//! including the applet version, protocol version, and flags for available features.
//!
//! ### Requesting account public keys
//!
//! Account public keys can be requested via [`PublicKeyReq`][ledger_xlm_apdu::public_key::PublicKeyReq],
//! returning a [`PublicKeyResp`][ledger_xlm_apdu::public_key::PublicKeyResp] containing the ed25519
//! public key for the account derived at `m/44'/148'/index'`. Where the `DISPLAY` flag is set the
//! account address is shown to the user for approval prior to responding.
//!
//! ### Executing a transaction
//!
//! Transactions are signed by streaming the transaction header followed by each operation,
//! the device reconstructs the canonical transaction signature base from these fields and
//! requests user confirmation for each operation prior to hashing it.
//!
//! Unless otherwise documented each transaction operation returns a
//! [`TxInfo`][ledger_xlm_apdu::tx::TxInfo] response containing the current
//! [transaction state][ledger_xlm_apdu::state::TxState], the next expected chunk offset,
//! and the number of confirmed and declared operations.
//!
//! 1. Issue [`TxInit`][ledger_xlm_apdu::tx::TxInit] with the transaction header to start a transaction
//! 2. Issue [`TxReview`][ledger_xlm_apdu::tx::TxReview] to display the fee, signing account, memo,
//!    and time bounds for confirmation, operations are refused until this is approved
//! 3. Issue [`TxOp`][ledger_xlm_apdu::tx::TxOp] for each operation, each operation is confirmed by the user
//! 4. Issue [`TxSign`][ledger_xlm_apdu::tx::TxSign] once all operations are confirmed to fetch a
//!    [`TxSignature`][ledger_xlm_apdu::tx::TxSignature] containing the signing public key and signature
//!
//! Messages exceeding the APDU length (ie. headers with long network passphrases) may be
//! delivered in chunks via [`TxLoad`][ledger_xlm_apdu::tx::TxLoad].
//!
//! A transaction may be abandoned at any point via [`TxAbort`][ledger_xlm_apdu::tx::TxAbort],
//! and any failure or user rejection discards the transaction in progress.
//!

#![cfg_attr(not(feature = "std"), no_std)]

pub use ledger_xlm_apdu as apdu;

pub mod engine;

pub mod helpers;
