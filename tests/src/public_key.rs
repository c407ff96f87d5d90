// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Account public key tests

use bip39::{Language, Mnemonic, Seed};
use ed25519_dalek::SigningKey;
use log::info;

use ledger_xlm_apdu::prelude::*;

use crate::{request, Exchange, HexFmt};

/// SEP-0005 reference mnemonic
pub const MNEMONIC: &str =
    "illness spike retreat truth genius clock brain pass fit cave bargain toe";

/// Account expectation, address and public key for an account index
pub struct AccountExpectation<'a> {
    pub account_index: u32,
    pub address: &'a str,
    pub public_key: &'a str,
}

impl<'a> AccountExpectation<'a> {
    /// Decode the expected public key
    pub fn public_key(&self) -> [u8; 32] {
        let mut k = [0u8; 32];
        hex::decode_to_slice(self.public_key, &mut k).unwrap();
        k
    }
}

/// Accounts derived from [MNEMONIC] at `m/44'/148'/index'`
pub const ACCOUNTS: &[AccountExpectation<'static>] = &[
    AccountExpectation {
        account_index: 0,
        address: "GDRXE2BQUC3AZNPVFSCEZ76NJ3WWL25FYFK6RGZGIEKWE4SOOHSUJUJ6",
        public_key: "e3726830a0b60cb5f52c844cffcd4eed65eba5c155e89b26411562724e71e544",
    },
    AccountExpectation {
        account_index: 1,
        address: "GBAW5XGWORWVFE2XTJYDTLDHXTY2Q2MO73HYCGB3XMFMQ562Q2W2GJQX",
        public_key: "416edcd6746d5293579a7039ac67bcf1a8698efecf81183bbb0ac877da86ada3",
    },
    AccountExpectation {
        account_index: 2,
        address: "GAY5PRAHJ2HIYBYCLZXTHID6SPVELOOYH2LBPH3LD4RUMXUW3DOYTLXW",
        public_key: "31d7c4074e8e8c07025e6f33a07e93ea45b9d83e96179f6b1f23465e96d8dd89",
    },
];

/// Build the BIP-0039 seed for a mnemonic phrase (with an empty passphrase)
pub fn seed(mnemonic: &str) -> Seed {
    let m = Mnemonic::from_phrase(mnemonic, Language::English).unwrap();
    Seed::new(&m, "")
}

/// Derive the account signing key for the provided seed and index
pub fn signing_key(seed: &Seed, account_index: u32) -> SigningKey {
    const H: u32 = 1 << 31;

    let k = slip10_ed25519::derive_ed25519_private_key(
        seed.as_bytes(),
        &[44 | H, 148 | H, account_index | H],
    );

    SigningKey::from_bytes(&k)
}

/// Fetch account public keys and check these match local derivation
pub async fn test<T>(
    t: T,
    accounts: &[AccountExpectation<'_>],
    display: bool,
) -> anyhow::Result<()>
where
    T: Exchange + Send + Sync,
{
    let seed = seed(MNEMONIC);

    let flags = match display {
        true => PublicKeyFlags::DISPLAY,
        false => PublicKeyFlags::empty(),
    };

    for a in accounts {
        info!("requesting account {} ({})", a.account_index, a.address);

        // Check local derivation matches the reference vectors
        let expected = signing_key(&seed, a.account_index).verifying_key().to_bytes();
        assert_eq!(expected, a.public_key(), "local derivation mismatch");

        let mut buff = [0u8; 64];
        let r: PublicKeyResp =
            request(&t, &PublicKeyReq::new(a.account_index, flags), &mut buff).await?;

        info!("received public key: {}", HexFmt(&r.public_key));

        assert_eq!(r.account_index, a.account_index);
        assert_eq!(r.public_key, expected);
    }

    Ok(())
}
