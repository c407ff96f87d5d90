// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Application Information APDUs

use encdec::{Decode, DecodeOwned, Encode};

use super::{ApduError, ApduStatic, Instruction, XLM_APDU_CLA};

/// Fetch application info APDU
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct AppInfoReq {}

impl ApduStatic for AppInfoReq {
    const CLA: u8 = XLM_APDU_CLA;

    /// Application Info GET APDU is instruction `0x00`
    const INS: u8 = Instruction::GetAppInfo as u8;
}

impl Encode for AppInfoReq {
    type Error = ApduError;

    fn encode_len(&self) -> Result<usize, Self::Error> {
        Ok(0)
    }

    fn encode(&self, _buff: &mut [u8]) -> Result<usize, Self::Error> {
        Ok(0)
    }
}

impl DecodeOwned for AppInfoReq {
    type Output = Self;

    type Error = ApduError;

    fn decode_owned(_buff: &[u8]) -> Result<(Self::Output, usize), Self::Error> {
        Ok((Self {}, 0))
    }
}

/// Application information response APDU
///
/// Flags are fixed-length and precede the length-prefixed name and version strings.
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   PROTO_VER   |   RESERVED    |           APP_FLAGS           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |   NAME_LEN    |  VERSION_LEN  |            NAME...            /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+                               +
/// /                     NAME... | VERSION...                      /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct AppInfoResp<'a> {
    /// Protocol version (must be 1)
    pub proto: u8,

    /// Application name
    pub name: &'a str,

    /// Application version
    pub version: &'a str,

    /// Application flags
    pub flags: AppFlags,
}

bitflags::bitflags! {
    /// Application info flags
    pub struct AppFlags: u16 {
        /// Indicates app accepts chunked message delivery via `TxLoad`
        const HAS_CHUNKED_LOAD = 1 << 0;

        /// Indicates app presents a transaction summary for review
        const HAS_TX_REVIEW = 1 << 8;
    }
}

/// Fixed header length (protocol, reserved, flags, string lengths)
const APP_INFO_HEADER_LEN: usize = 6;

impl<'a> AppInfoResp<'a> {
    /// Create a new application info response APDU
    pub fn new(proto: u8, name: &'a str, version: &'a str, flags: AppFlags) -> Self {
        Self {
            proto,
            name,
            version,
            flags,
        }
    }
}

impl<'a> Encode for AppInfoResp<'a> {
    type Error = ApduError;

    fn encode(&self, buff: &mut [u8]) -> Result<usize, ApduError> {
        let n = self.encode_len()?;
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        buff[0] = self.proto;
        buff[1] = 0;
        buff[2..4].copy_from_slice(&self.flags.bits().to_le_bytes());
        buff[4] = self.name.len() as u8;
        buff[5] = self.version.len() as u8;

        let (name, version) = buff[APP_INFO_HEADER_LEN..n].split_at_mut(self.name.len());
        name.copy_from_slice(self.name.as_bytes());
        version.copy_from_slice(self.version.as_bytes());

        Ok(n)
    }

    fn encode_len(&self) -> Result<usize, ApduError> {
        // String lengths are encoded as single bytes
        if self.name.len() > u8::MAX as usize || self.version.len() > u8::MAX as usize {
            return Err(ApduError::InvalidLength);
        }

        Ok(APP_INFO_HEADER_LEN + self.name.len() + self.version.len())
    }
}

impl<'a> Decode<'a> for AppInfoResp<'a> {
    type Output = Self;
    type Error = ApduError;

    fn decode(buff: &'a [u8]) -> Result<(Self, usize), ApduError> {
        if buff.len() < APP_INFO_HEADER_LEN {
            return Err(ApduError::InvalidLength);
        }

        let flags = AppFlags::from_bits_truncate(u16::from_le_bytes([buff[2], buff[3]]));
        let (name_len, version_len) = (buff[4] as usize, buff[5] as usize);

        let n = APP_INFO_HEADER_LEN + name_len + version_len;
        if buff.len() < n {
            return Err(ApduError::InvalidLength);
        }

        let (name, version) = buff[APP_INFO_HEADER_LEN..n].split_at(name_len);

        Ok((
            Self {
                proto: buff[0],
                name: core::str::from_utf8(name).map_err(|_| ApduError::InvalidUtf8)?,
                version: core::str::from_utf8(version).map_err(|_| ApduError::InvalidUtf8)?,
                flags,
            },
            n,
        ))
    }
}
