// Copyright (c) 2022-2023 The MobileCoin Foundation

//! User confirmation prompts.
//!
//! Prompts are rendered to owned bounded strings by the engine and passed to
//! [`Driver::confirm`][super::Driver::confirm], the platform is responsible only for
//! displaying the lines and collecting an accept / reject decision.

use core::fmt::{Arguments, Write};

use heapless::{String, Vec};
use strum::{Display, EnumIter, EnumString, EnumVariantNames};

use super::types::{Asset, Memo, Network, TimeBounds};
use crate::helpers::{encode_account, fmt_hex, fmt_stroops, fmt_timestamp, fmt_u64, line_break};

/// Maximum characters per prompt line
pub const LINE_LEN: usize = 40;

/// Maximum lines per prompt (excluding the header)
pub const MAX_LINES: usize = 6;

/// A single prompt line
pub type Line = String<LINE_LEN>;

/// Text memo row lengths
const MEMO_TEXT_ROWS: [usize; 2] = [19, 9];

/// Hash memo bytes per row
const MEMO_HASH_ROW: usize = 8;

/// Prompt kinds, allowing platforms to select layouts or icons
#[derive(Copy, Clone, PartialEq, Debug, EnumString, Display, EnumVariantNames, EnumIter)]
pub enum PromptKind {
    /// Share an account public key
    SharePublicKey,
    /// Confirm an operation source account override
    SourceAccount,
    /// Confirm a CreateAccount operation
    CreateAccount,
    /// Confirm a Payment operation
    Payment,
    /// Confirm transaction fee, operation count and signer
    Summary,
    /// Confirm transaction memo
    Memo,
    /// Confirm transaction time bounds
    TimeBounds,
}

/// Confirmation prompt
#[derive(Clone, PartialEq, Debug)]
pub struct Prompt {
    /// Prompt kind
    pub kind: PromptKind,

    /// Header line (signing account)
    pub header: Line,

    /// Prompt lines
    pub lines: Vec<Line, MAX_LINES>,

    /// Network the prompt applies to
    pub network: Network,
}

/// Render a line, truncating at the line capacity
fn line(args: Arguments) -> Line {
    let mut l = Line::new();
    let _ = l.write_fmt(args);
    l
}

/// Render an address prefix (first five characters)
fn address_prefix(public_key: &[u8; 32]) -> String<5> {
    let address = encode_account(public_key);

    let mut s = String::new();
    let _ = s.push_str(&address[..5]);
    s
}

impl Prompt {
    fn new(kind: PromptKind, header: &Line, network: Network) -> Self {
        Self {
            kind,
            header: header.clone(),
            lines: Vec::new(),
            network,
        }
    }

    /// Append a line, extra lines are dropped
    fn push(&mut self, l: Line) {
        let _ = self.lines.push(l);
    }

    /// Append a line-broken account address
    fn push_address(&mut self, public_key: &[u8; 32]) {
        let address = encode_account(public_key);

        for row in line_break(&address) {
            self.push(line(format_args!("{row}")));
        }
    }

    /// Build the signing account header (`Signing with #N (GABCD)`)
    pub fn signer_header(account_index: u32, public_key: &[u8; 32]) -> Line {
        line(format_args!(
            "Signing with #{} ({})",
            account_index as u64 + 1,
            address_prefix(public_key)
        ))
    }

    /// Fetch the network warning for display, if any
    pub fn warning(&self) -> Option<&'static str> {
        self.network.warning()
    }

    /// Build a prompt to share an account public key
    pub fn share_public_key(account_index: u32, public_key: &[u8; 32]) -> Self {
        let header = line(format_args!("Share public account ID?"));

        let mut p = Self::new(PromptKind::SharePublicKey, &header, Network::Public);
        p.push(line(format_args!(
            "Share account #{}?",
            account_index as u64 + 1
        )));
        p.push_address(public_key);
        p
    }

    /// Build a prompt confirming an operation source account override
    pub fn source_account(header: &Line, network: Network, source: &[u8; 32]) -> Self {
        let mut p = Self::new(PromptKind::SourceAccount, header, network);
        p.push(line(format_args!("Op src account OK?")));
        p.push_address(source);
        p
    }

    /// Build a prompt confirming a CreateAccount operation
    pub fn create_account(
        header: &Line,
        network: Network,
        destination: &[u8; 32],
        starting_balance: u64,
    ) -> Self {
        let mut p = Self::new(PromptKind::CreateAccount, header, network);
        p.push(line(format_args!("Create account: ")));
        p.push_address(destination);
        p.push(line(format_args!(
            "With {} XLM",
            fmt_stroops(starting_balance)
        )));
        p
    }

    /// Build a prompt confirming a Payment operation
    pub fn payment(
        header: &Line,
        network: Network,
        destination: &[u8; 32],
        asset: &Asset,
        amount: u64,
    ) -> Self {
        let mut p = Self::new(PromptKind::Payment, header, network);
        p.push(line(format_args!("Pay {}", fmt_stroops(amount))));

        let mut code = Line::new();
        for c in asset.code() {
            let _ = code.push(printable(*c));
        }

        match asset.issuer() {
            None => p.push(line(format_args!("{code} (native asset)"))),
            Some(issuer) => p.push(line(format_args!("{code} ({})", address_prefix(issuer)))),
        }

        let address = encode_account(destination);
        let rows = line_break(&address);
        p.push(line(format_args!("To: {}", rows[0])));
        p.push(line(format_args!("{}", rows[1])));
        p.push(line(format_args!("{}", rows[2])));

        p
    }

    /// Build the transaction summary prompt (fee, operation count, signer)
    pub fn summary(
        header: &Line,
        network: Network,
        fee: u32,
        num_operations: u32,
        signer: &[u8; 32],
    ) -> Self {
        let mut p = Self::new(PromptKind::Summary, header, network);
        p.push(line(format_args!(
            "Fee: {} XLM ({} {})",
            fmt_stroops(fee as u64),
            fmt_u64(num_operations as u64),
            if num_operations == 1 { "op" } else { "ops" },
        )));
        p.push(line(format_args!("Signing with:")));
        p.push_address(signer);
        p
    }

    /// Build the memo prompt
    pub fn memo(header: &Line, network: Network, memo: &Memo) -> Self {
        let mut p = Self::new(PromptKind::Memo, header, network);

        match memo {
            Memo::None => p.push(line(format_args!("[No Memo]"))),
            Memo::Text(t) => {
                p.push(line(format_args!("Memo (TEXT)")));

                let mut offset = 0;
                for n in MEMO_TEXT_ROWS {
                    let end = (offset + n).min(t.len());
                    if offset == end {
                        break;
                    }

                    let mut row = Line::new();
                    for c in &t[offset..end] {
                        let _ = row.push(printable(*c));
                    }
                    p.push(row);

                    offset = end;
                }
            }
            Memo::Id(id) => {
                p.push(line(format_args!("Memo (ID)")));
                p.push(line(format_args!("{}", fmt_u64(*id))));
            }
            Memo::Hash(h) | Memo::Return(h) => {
                match memo {
                    Memo::Hash(_) => p.push(line(format_args!("Memo (HASH)"))),
                    _ => p.push(line(format_args!("Memo (RETURN)"))),
                }

                for c in h.chunks(MEMO_HASH_ROW) {
                    p.push(line(format_args!("{}", fmt_hex::<16>(c))));
                }
            }
        }

        p
    }

    /// Build the time bounds prompt
    pub fn time_bounds(header: &Line, network: Network, time_bounds: &TimeBounds) -> Self {
        let mut p = Self::new(PromptKind::TimeBounds, header, network);
        p.push(line(format_args!("Confirm Time Bounds")));

        for (label, t) in [("Valid from:", time_bounds.min), ("Valid to:", time_bounds.max)] {
            p.push(line(format_args!("{label}")));

            match t {
                0 => p.push(line(format_args!("[no restriction]"))),
                _ => p.push(line(format_args!("{}", fmt_timestamp(t)))),
            }
        }

        p
    }
}

/// Map bytes to printable ASCII for display
fn printable(c: u8) -> char {
    match c {
        0x20..=0x7e => c as char,
        _ => '?',
    }
}
