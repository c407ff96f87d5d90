// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Tests for Stellar wallet integration.
//!
//! Generic over [Exchange] for reuse with engine, simulator or device transports.
//!

use core::fmt::Debug;

use async_trait::async_trait;
use encdec::{Decode, Encode};
use log::{debug, trace};

use ledger_proto::{ApduError, ApduStatic};
use ledger_xlm_apdu::{
    tx::{load::CHUNK_LEN, TxLoad},
    MAX_APDU_LEN,
};


pub mod public_key;

pub mod transaction;

/// Maximum encoded request length (a header with the longest supported passphrase)
pub const MAX_REQUEST_LEN: usize = 2048;

/// Transport abstraction, exchanging request and response APDU payloads
#[async_trait]
pub trait Exchange {
    type Error: Debug + Send;

    /// Issue a request with the provided instruction and payload,
    /// writing the response payload to `resp` and returning its length
    async fn exchange(&self, ins: u8, req: &[u8], resp: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Test flow errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// APDU encode / decode failed
    #[error("APDU encoding error: {0:?}")]
    Apdu(ApduError),

    /// Request rejected by the target
    #[error("request failed: {0}")]
    Request(String),
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        Error::Apdu(e)
    }
}

/// Issue a request APDU and decode the response.
///
/// Requests exceeding [MAX_APDU_LEN] are delivered as [TxLoad] chunks,
/// with the response to the final chunk returned.
pub async fn request<'b, T, REQ, RESP>(t: &T, req: &REQ, buff: &'b mut [u8]) -> Result<RESP, Error>
where
    T: Exchange + Sync,
    REQ: Encode<Error = ApduError> + ApduStatic + Debug,
    RESP: Decode<'b, Output = RESP, Error = ApduError> + Debug,
{
    debug!("cmd: {:?}", req);

    let mut req_buff = [0u8; MAX_REQUEST_LEN];
    let n = req.encode(&mut req_buff)?;

    trace!("encoded: {:02x?}", &req_buff[..n]);

    let resp_len = match n <= MAX_APDU_LEN {
        true => exchange(t, REQ::INS, &req_buff[..n], &mut *buff).await?,
        false => {
            let mut resp_len = 0;

            for c in TxLoad::chunks(REQ::INS, &req_buff[..n], CHUNK_LEN) {
                debug!("chunk: {} / {} bytes", c.offset as usize + c.data.len(), c.total_len);

                let mut chunk_buff = [0u8; MAX_APDU_LEN];
                let chunk_len = c.encode(&mut chunk_buff)?;

                resp_len = exchange(t, TxLoad::INS, &chunk_buff[..chunk_len], &mut *buff).await?;
            }

            resp_len
        }
    };

    let buff: &'b [u8] = buff;
    let (resp, _) = RESP::decode(&buff[..resp_len])?;

    debug!("resp: {:?}", resp);

    Ok(resp)
}

async fn exchange<T: Exchange + Sync>(
    t: &T,
    ins: u8,
    req: &[u8],
    resp: &mut [u8],
) -> Result<usize, Error> {
    t.exchange(ins, req, resp)
        .await
        .map_err(|e| Error::Request(format!("{e:?}")))
}

/// Helper to format byte arrays as hex
pub struct HexFmt<T: AsRef<[u8]>>(pub T);

impl<T: AsRef<[u8]>> core::fmt::Display for HexFmt<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in self.0.as_ref() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
