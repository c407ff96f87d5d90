// Copyright (c) 2022-2023 The MobileCoin Foundation

//! StrKey account address encoding
//!
//! Account addresses are `base32(version || public_key || crc16(version || public_key))`,
//! using the RFC4648 alphabet without padding, with the checksum stored little-endian.

use crc::{Crc, CRC_16_XMODEM};
use data_encoding::BASE32_NOPAD;
use heapless::String;

use crate::engine::Error;

/// StrKey version byte for ed25519 account ids (`G...` addresses)
pub const ACCOUNT_ID_VERSION: u8 = 6 << 3;

/// Encoded address length
pub const ADDRESS_LEN: usize = 56;

/// Length of the raw StrKey payload (version, key, checksum)
const PAYLOAD_LEN: usize = 35;

/// Row lengths for displaying an address over three lines
pub const ADDRESS_ROWS: [usize; 3] = [16, 20, 20];

/// Encoded account address
pub type Address = String<ADDRESS_LEN>;

/// A single displayed address row
pub type AddressRow = String<20>;

/// CRC16-XMODEM (poly `0x1021`, init `0x0000`, no reflection or final xor)
const XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Compute the StrKey checksum over the provided bytes
pub fn crc16(data: &[u8]) -> u16 {
    XMODEM.checksum(data)
}

/// Encode an ed25519 public key as a StrKey account address
pub fn encode_account(public_key: &[u8; 32]) -> Address {
    let mut payload = [0u8; PAYLOAD_LEN];
    payload[0] = ACCOUNT_ID_VERSION;
    payload[1..33].copy_from_slice(public_key);

    let crc = crc16(&payload[..33]);
    payload[33..].copy_from_slice(&crc.to_le_bytes());

    let mut encoded = [0u8; ADDRESS_LEN];
    BASE32_NOPAD.encode_mut(&payload, &mut encoded);

    // Base32 output is always ASCII and exactly fills the address
    let mut s = Address::new();
    for c in encoded {
        let _ = s.push(c as char);
    }
    s
}

/// Decode a StrKey account address to an ed25519 public key,
/// rejecting invalid lengths, versions, and checksums
pub fn decode_account(address: &str) -> Result<[u8; 32], Error> {
    if address.len() != ADDRESS_LEN {
        return Err(Error::InvalidEncoding);
    }

    let mut payload = [0u8; PAYLOAD_LEN];
    match BASE32_NOPAD.decode_len(address.len()) {
        Ok(PAYLOAD_LEN) => (),
        _ => return Err(Error::InvalidEncoding),
    }
    BASE32_NOPAD
        .decode_mut(address.as_bytes(), &mut payload)
        .map_err(|_| Error::InvalidEncoding)?;

    if payload[0] != ACCOUNT_ID_VERSION {
        return Err(Error::InvalidEncoding);
    }

    let crc = u16::from_le_bytes([payload[33], payload[34]]);
    if crc != crc16(&payload[..33]) {
        return Err(Error::InvalidEncoding);
    }

    let mut public_key = [0u8; 32];
    public_key.copy_from_slice(&payload[1..33]);

    Ok(public_key)
}

/// Split an address into rows for display
pub fn line_break(address: &str) -> [AddressRow; 3] {
    let mut rows: [AddressRow; 3] = Default::default();
    let mut offset = 0;

    for (row, len) in rows.iter_mut().zip(ADDRESS_ROWS) {
        let end = (offset + len).min(address.len());
        if let Some(s) = address.get(offset..end) {
            let _ = row.push_str(s);
        }
        offset = end;
    }

    rows
}
