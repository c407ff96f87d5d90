// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Formatting helpers for rendering transaction values

use core::fmt::Write;

use chrono::{DateTime, Datelike, Timelike, Utc};
use heapless::String;

mod strkey;
pub use strkey::*;

/// Stroops per XLM
pub const STROOPS_PER_XLM: u64 = 10_000_000;

/// Rendered decimal integer (fits `u64::MAX`)
pub type DecimalStr = String<20>;

/// Rendered XLM amount (fits `u64::MAX` stroops)
pub type AmountStr = String<24>;

/// Rendered UTC timestamp
pub type TimestampStr = String<32>;

/// Format an unsigned integer as a plain decimal string
pub fn fmt_u64(value: u64) -> DecimalStr {
    let mut s = DecimalStr::new();
    // Capacity fits any u64
    let _ = write!(s, "{value}");
    s
}

/// Format a stroop value as a fixed-point XLM amount.
///
/// Trailing fractional zeros are trimmed but at least one fractional digit
/// is always kept, such that `1_000_000_000` renders as `100.0`.
pub fn fmt_stroops(value: u64) -> AmountStr {
    let mut s = AmountStr::new();

    let _ = write!(
        s,
        "{}.{:07}",
        value / STROOPS_PER_XLM,
        value % STROOPS_PER_XLM
    );

    while s.ends_with('0') && !s.ends_with(".0") {
        s.pop();
    }

    s
}

/// Format unix seconds as a UTC timestamp (`%Y-%m-%d %H:%M:%S (UTC)`)
pub fn fmt_timestamp(secs: u32) -> TimestampStr {
    let mut s = TimestampStr::new();

    match DateTime::<Utc>::from_timestamp(secs as i64, 0) {
        Some(t) => {
            let _ = write!(
                s,
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02} (UTC)",
                t.year(),
                t.month(),
                t.day(),
                t.hour(),
                t.minute(),
                t.second()
            );
        }
        None => {
            let _ = s.push_str("[invalid time]");
        }
    }

    s
}

/// Format bytes as lower-case hex, truncating at the output capacity
pub fn fmt_hex<const N: usize>(data: &[u8]) -> String<N> {
    let mut s = String::new();

    for b in data {
        if write!(s, "{b:02x}").is_err() {
            break;
        }
    }

    s
}
