// Copyright (c) 2022-2023 The MobileCoin Foundation

//! Account key derivation, keys are derived via SLIP-0010 at `m/44'/148'/index'`

use ed25519_dalek::{Signer, SigningKey};

use super::{Driver, Error};

/// SLIP-0044 coin type for Stellar
pub const STELLAR_COIN_TYPE: u32 = 148;

/// BIP-0044 purpose
const PURPOSE: u32 = 44;

/// Hardened derivation flag
const HARDENED: u32 = 1 << 31;

/// Build the (fully hardened) derivation path for the provided account index
pub const fn account_path(account_index: u32) -> [u32; 3] {
    [
        PURPOSE | HARDENED,
        STELLAR_COIN_TYPE | HARDENED,
        account_index | HARDENED,
    ]
}

/// Ed25519 keys for a derived account.
///
/// The signing key is zeroized on drop.
pub struct AccountKeys {
    account_index: u32,
    signing_key: SigningKey,
}

impl AccountKeys {
    /// Derive account keys for the provided index via the platform [Driver]
    #[cfg_attr(feature = "noinline", inline(never))]
    pub fn derive(drv: &impl Driver, account_index: u32) -> Result<Self, Error> {
        let path = account_path(account_index);

        let seed = match drv.slip10_derive_ed25519(&path) {
            Some(s) => s,
            None => {
                #[cfg(feature = "log")]
                log::error!("key derivation unavailable for account {}", account_index);

                return Err(Error::DerivationUnavailable);
            }
        };

        // Seed is zeroized on drop
        let signing_key = SigningKey::from_bytes(&seed);

        Ok(Self {
            account_index,
            signing_key,
        })
    }

    /// Fetch the account index
    pub fn account_index(&self) -> u32 {
        self.account_index
    }

    /// Fetch the account public key
    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Sign a transaction digest
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 64] {
        self.signing_key.sign(digest).to_bytes()
    }
}
