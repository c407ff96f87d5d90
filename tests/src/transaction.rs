// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Transaction signing tests

use std::future::Future;

use bip39::Seed;
use ed25519_dalek::{Signature, VerifyingKey};
use log::{debug, info};

use ledger_xlm_apdu::prelude::*;

use crate::{
    public_key::{seed, signing_key, MNEMONIC},
    request, Error, Exchange, HexFmt,
};

/// Public network passphrase
pub const PUBLIC_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";

/// Test network passphrase
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Transaction network
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Network {
    Public,
    Testnet,
    /// Private network with a passphrase long enough to require chunked delivery
    Private,
}

impl Network {
    pub fn passphrase(&self) -> String {
        match self {
            Network::Public => PUBLIC_PASSPHRASE.to_string(),
            Network::Testnet => TESTNET_PASSPHRASE.to_string(),
            Network::Private => "Private Network ; ".repeat(17),
        }
    }
}

/// Memo expectation
#[derive(Clone, PartialEq, Debug)]
pub enum MemoExpectation<'a> {
    None,
    Text(&'a str),
    Id(u64),
    Hash([u8; 32]),
    Return([u8; 32]),
}

/// Asset expectation, issuers are referenced by account index
#[derive(Clone, PartialEq, Debug)]
pub enum AssetExpectation<'a> {
    Native,
    Credit { code: &'a str, issuer: u32 },
}

/// Operation expectation, accounts are referenced by index
#[derive(Clone, PartialEq, Debug)]
pub enum OpExpectation<'a> {
    CreateAccount {
        source: Option<u32>,
        destination: u32,
        starting_balance: u64,
    },
    Payment {
        source: Option<u32>,
        destination: u32,
        asset: AssetExpectation<'a>,
        amount: u64,
    },
}

/// Transaction expectation, with the resulting digest and signature
pub struct TransactionExpectation<'a> {
    pub account_index: u32,
    pub network: Network,
    pub fee: u32,
    pub sequence_number: u64,
    pub time_bounds: (u32, u32),
    pub memo: MemoExpectation<'a>,
    pub operations: &'a [OpExpectation<'a>],
    pub digest: &'a str,
    pub signature: &'a str,
}

pub const TRANSACTIONS: &[TransactionExpectation<'static>] = &[
    TransactionExpectation {
        account_index: 0,
        network: Network::Public,
        fee: 100,
        sequence_number: 1,
        time_bounds: (0, 0),
        memo: MemoExpectation::None,
        operations: &[OpExpectation::CreateAccount {
            source: None,
            destination: 1,
            starting_balance: 50_000_000,
        }],
        digest: "8c0a7c13e00075b581b568178e728063f18be77c03af1fe7aac75f6a16f0ae60",
        signature: "926640f76b6c4830f71dca02121dd4dfae809ba97cf3a8155bde2dcfb916b27ad622dcec8d1978863d884ea8c107ebb6a91c2c97b5e3440cb80e202090170008",
    },
    TransactionExpectation {
        account_index: 1,
        network: Network::Testnet,
        fee: 200,
        sequence_number: 4294967301,
        time_bounds: (1_600_000_000, 1_700_000_000),
        memo: MemoExpectation::Text("payment ref 42"),
        operations: &[
            OpExpectation::Payment {
                source: Some(2),
                destination: 0,
                asset: AssetExpectation::Native,
                amount: 12_345_678,
            },
            OpExpectation::Payment {
                source: None,
                destination: 0,
                asset: AssetExpectation::Credit {
                    code: "USDC",
                    issuer: 2,
                },
                amount: 1_000_000_000,
            },
        ],
        digest: "a2460aa0e220997fdd81581d360d1f6abfe7c6c8af1c7de0ed1e71602760d177",
        signature: "cf515678d44d317a7cc8c332d9258211158bada39f6b17a3f5ac24736c107e8b5ca2fd24d0e753bdbf0be658c2dfaa5bd4a8d8427a2edaeaeebb2b9a3368e10b",
    },
    TransactionExpectation {
        account_index: 2,
        network: Network::Private,
        fee: 100,
        sequence_number: 7,
        time_bounds: (0, 1_700_000_000),
        memo: MemoExpectation::Id(1234567890123),
        operations: &[OpExpectation::Payment {
            source: None,
            destination: 0,
            asset: AssetExpectation::Credit {
                code: "STELLARTOKEN",
                issuer: 1,
            },
            amount: 1,
        }],
        digest: "5181b8806900d8c41efbaa022ce1b8bf7dc4f0b7b8993350a63b2b1e81531ade",
        signature: "50d1c521907955c3d310cdfa7decda60d1c8afc12948c58420065fbcba928eb77e94908caad2cf1832adbe4c6034ef76bb965428c7fb628dd67bc14c6915760c",
    },
    TransactionExpectation {
        account_index: 0,
        network: Network::Public,
        fee: 300,
        sequence_number: 99,
        time_bounds: (0, 0),
        memo: MemoExpectation::Return([0x11; 32]),
        operations: &[OpExpectation::CreateAccount {
            source: Some(1),
            destination: 2,
            starting_balance: 10_000_000_000,
        }],
        digest: "a4dcf554833dab92e23832ef63efd3945c3963288eb97fc204e19b0ff5e330d4",
        signature: "3d899472c0c309e0fe93af7a0e0f7fe3ce0e7070a6590b3c4a46ebef461bdc0d9422a97da5ccb414b78d0247d26daa970964503c7c9fa6be83716ccf878e1500",
    },
    TransactionExpectation {
        account_index: 0,
        network: Network::Public,
        fee: 100,
        sequence_number: 2,
        time_bounds: (0, 0),
        memo: MemoExpectation::Hash([
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19, 20, 21, 22, 23,
            24, 25, 26, 27, 28, 29, 30, 31,
        ]),
        operations: &[OpExpectation::Payment {
            source: None,
            destination: 1,
            asset: AssetExpectation::Credit {
                code: "EUR",
                issuer: 2,
            },
            amount: 250,
        }],
        digest: "5267c803b1fe3ee53c21beb6170f2436f2f3fdc767a0f7700576a4efec824494",
        signature: "168bd9f80bcd90b52784716591fefb3c09607e270ff1fe2daeb5ff4aa9aa9c7772e5f31e22a8dd7546ca286b4215766d698ddc7475db7054279954fd0bb0c505",
    },
];

impl<'a> TransactionExpectation<'a> {
    pub fn seed(&self) -> Seed {
        seed(MNEMONIC)
    }

    /// Public key for an account index
    pub fn account(&self, seed: &Seed, account_index: u32) -> [u8; 32] {
        signing_key(seed, account_index).verifying_key().to_bytes()
    }

    /// Build the transaction header APDU
    pub fn tx_init<'p>(&self, seed: &Seed, passphrase: &'p str) -> anyhow::Result<TxInit<'p>> {
        let (min, max) = self.time_bounds;

        let init = TxInit::new(
            self.account_index,
            passphrase,
            self.fee,
            self.sequence_number,
            self.operations.len() as u32,
        )
        .with_time_bounds(min, max)
        .with_source_account(self.account(seed, self.account_index));

        let init = match &self.memo {
            MemoExpectation::None => Ok(init),
            MemoExpectation::Text(t) => init.with_memo(MemoType::Text, t.as_bytes()),
            MemoExpectation::Id(id) => Ok(init.with_memo_id(*id)),
            MemoExpectation::Hash(h) => init.with_memo(MemoType::Hash, h),
            MemoExpectation::Return(h) => init.with_memo(MemoType::Return, h),
        };

        init.map_err(|e| Error::Apdu(e).into())
    }

    /// Build operation APDUs
    pub fn tx_ops(&self, seed: &Seed) -> anyhow::Result<Vec<TxOp>> {
        let mut ops = Vec::with_capacity(self.operations.len());

        for o in self.operations {
            let (op, source) = match o {
                OpExpectation::CreateAccount {
                    source,
                    destination,
                    starting_balance,
                } => (
                    TxOp::create_account(self.account(seed, *destination), *starting_balance),
                    source,
                ),
                OpExpectation::Payment {
                    source,
                    destination,
                    asset: AssetExpectation::Native,
                    amount,
                } => (
                    TxOp::payment_native(self.account(seed, *destination), *amount),
                    source,
                ),
                OpExpectation::Payment {
                    source,
                    destination,
                    asset: AssetExpectation::Credit { code, issuer },
                    amount,
                } => (
                    TxOp::payment(
                        self.account(seed, *destination),
                        code.as_bytes(),
                        self.account(seed, *issuer),
                        *amount,
                    )
                    .map_err(Error::Apdu)?,
                    source,
                ),
            };

            let op = match source {
                Some(s) => op.with_source(self.account(seed, *s)),
                None => op,
            };

            ops.push(op);
        }

        Ok(ops)
    }

    pub fn digest(&self) -> [u8; 32] {
        let mut d = [0u8; 32];
        hex::decode_to_slice(self.digest, &mut d).unwrap();
        d
    }

    pub fn signature(&self) -> [u8; 64] {
        let mut s = [0u8; 64];
        hex::decode_to_slice(self.signature, &mut s).unwrap();
        s
    }
}

/// Send the transaction header, checking the returned state
async fn tx_init<T>(t: &T, tx: &TransactionExpectation<'_>, seed: &Seed) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
{
    let passphrase = tx.network.passphrase();
    let init = tx.tx_init(seed, &passphrase)?;

    debug!("Initialising transaction ({:?} network)", tx.network);

    let mut buff = [0u8; 64];
    let i: TxInfo = request(t, &init, &mut buff).await?;

    assert_eq!(
        i,
        TxInfo::new(TxState::Operations, 0, 0, tx.operations.len() as u32)
    );

    Ok(())
}

/// Request review of the transaction summary, returning the resulting state
pub async fn tx_review<T>(t: &T) -> Result<TxInfo, Error>
where
    T: Exchange + Send + Sync,
{
    debug!("Reviewing transaction summary");

    let mut buff = [0u8; 64];
    request(t, &TxReview, &mut buff).await
}

/// Fetch the current transaction state
pub async fn tx_info<T>(t: &T) -> anyhow::Result<TxInfo>
where
    T: Exchange + Send + Sync,
{
    let mut buff = [0u8; 64];
    let i = request(t, &TxInfoReq, &mut buff).await?;
    Ok(i)
}

/// Execute a transaction, checking the resulting signature against the expectation
pub async fn test<'a, T, F>(
    t: T,
    approve: impl Fn() -> F,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
    F: Future<Output = ()>,
{
    let seed = tx.seed();
    let signer = tx.account(&seed, tx.account_index);
    let ops = tx.tx_ops(&seed)?;
    let total = ops.len() as u32;

    info!("Starting transaction (signer: {})", HexFmt(&signer));

    // Summary and operations are confirmed as they are received
    approve().await;

    tx_init(&t, tx, &seed).await?;

    let i = tx_review(&t).await?;
    assert_eq!(i, TxInfo::new(TxState::Operations, 0, 0, total));

    for (i, op) in ops.iter().enumerate() {
        debug!("Adding operation {} / {}", i + 1, total);

        let mut buff = [0u8; 64];
        let r: TxInfo = request(&t, op, &mut buff).await?;

        let confirmed = i as u32 + 1;
        let state = match confirmed == total {
            true => TxState::Ready,
            false => TxState::Operations,
        };
        assert_eq!(r, TxInfo::new(state, 0, confirmed, total));
    }

    debug!("Signing transaction");

    let mut buff = [0u8; 128];
    let r: TxSignature = request(&t, &TxSign, &mut buff).await?;

    info!("Transaction complete! validating signature");

    assert_eq!(r.public_key, signer, "signer mismatch");

    let k = VerifyingKey::from_bytes(&r.public_key)?;
    k.verify_strict(&tx.digest(), &Signature::from_bytes(&r.signature))?;

    assert_eq!(
        HexFmt(&r.signature).to_string(),
        tx.signature,
        "signature mismatch"
    );

    let i = tx_info(&t).await?;
    assert_eq!(i.state, TxState::Complete);

    Ok(())
}

/// Execute a transaction with operations rejected by the user,
/// checking the session is discarded
pub async fn test_reject<'a, T, F1, F2>(
    t: T,
    approve: impl Fn() -> F1,
    reject: impl Fn() -> F2,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
    F1: Future<Output = ()>,
    F2: Future<Output = ()>,
{
    let seed = tx.seed();
    let ops = tx.tx_ops(&seed)?;

    approve().await;

    tx_init(&t, tx, &seed).await?;
    tx_review(&t).await?;

    reject().await;

    // The first operation prompt is rejected
    let mut buff = [0u8; 64];
    let r = request::<_, _, TxInfo>(&t, &ops[0], &mut buff).await;
    assert!(r.is_err(), "rejected operation returned {r:?}");

    let i = tx_info(&t).await?;
    assert_eq!(i, TxInfo::new(TxState::Denied, 0, 0, 0));

    // Signing is unavailable without a session
    let mut buff = [0u8; 128];
    let r = request::<_, _, TxSignature>(&t, &TxSign, &mut buff).await;
    assert!(r.is_err(), "signing without session returned {r:?}");

    Ok(())
}

/// Reject the transaction summary, checking the session is discarded
/// before any operation is displayed
pub async fn test_review_reject<'a, T, F>(
    t: T,
    reject: impl Fn() -> F,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
    F: Future<Output = ()>,
{
    let seed = tx.seed();
    let ops = tx.tx_ops(&seed)?;

    reject().await;

    // Headers never block on user input
    tx_init(&t, tx, &seed).await?;

    let r = tx_review(&t).await;
    assert!(r.is_err(), "rejected review returned {r:?}");

    let i = tx_info(&t).await?;
    assert_eq!(i, TxInfo::new(TxState::Denied, 0, 0, 0));

    // Operations are rejected without a session
    let mut buff = [0u8; 64];
    let r = request::<_, _, TxInfo>(&t, &ops[0], &mut buff).await;
    assert!(r.is_err(), "operation without session returned {r:?}");

    Ok(())
}

/// Send operations without reviewing the transaction summary,
/// checking these are refused and no signature is available
pub async fn test_unreviewed<'a, T, F>(
    t: T,
    approve: impl Fn() -> F,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
    F: Future<Output = ()>,
{
    let seed = tx.seed();
    let ops = tx.tx_ops(&seed)?;

    approve().await;

    tx_init(&t, tx, &seed).await?;

    let mut buff = [0u8; 64];
    let r = request::<_, _, TxInfo>(&t, &ops[0], &mut buff).await;
    assert!(r.is_err(), "unreviewed operation returned {r:?}");

    let i = tx_info(&t).await?;
    assert_eq!(i, TxInfo::new(TxState::Error, 0, 0, 0));

    let mut buff = [0u8; 128];
    let r = request::<_, _, TxSignature>(&t, &TxSign, &mut buff).await;
    assert!(r.is_err(), "signing unreviewed transaction returned {r:?}");

    Ok(())
}

/// Abort a transaction part way through, then check a subsequent transaction succeeds
pub async fn test_abort<'a, T, F>(
    t: T,
    approve: impl Fn() -> F,
    tx: &TransactionExpectation<'a>,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
    F: Future<Output = ()>,
{
    let seed = tx.seed();

    approve().await;

    tx_init(&t, tx, &seed).await?;

    debug!("Aborting transaction");

    let mut buff = [0u8; 64];
    let i: TxInfo = request(&t, &TxAbort, &mut buff).await?;
    assert_eq!(i, TxInfo::new(TxState::Denied, 0, 0, 0));

    // Operations are rejected without a session
    let ops = tx.tx_ops(&seed)?;
    let r = request::<_, _, TxInfo>(&t, &ops[0], &mut buff).await;
    assert!(r.is_err(), "operation without session returned {r:?}");

    // Aborting again is a no-op
    let i: TxInfo = request(&t, &TxAbort, &mut buff).await?;
    assert_eq!(i.state, TxState::Denied);

    // A new transaction starts cleanly
    test(t, approve, tx).await
}
