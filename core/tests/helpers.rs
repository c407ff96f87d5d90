#![allow(unused)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bip39::Seed;
use log::{debug, trace};
use zeroize::Zeroizing;

use ledger_xlm_core::{
    apdu::MAX_APDU_LEN,
    engine::{Driver, Engine, Error, Prompt, PromptKind},
};
use ledger_xlm_tests::Exchange;

#[derive(Clone)]
pub struct TestEngine {
    pub engine: Arc<Mutex<Engine<TestDriver>>>,
}

impl TestEngine {
    pub fn new(engine: Engine<TestDriver>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Approve (or reject) subsequent prompts
    pub fn approve(&self, approve: bool) {
        let mut e = self.engine.lock().unwrap();
        e.driver_mut().approve = approve;
    }

    /// Lock (or unlock) root key material
    pub fn lock(&self, locked: bool) {
        let mut e = self.engine.lock().unwrap();
        e.driver_mut().locked = locked;
    }

    /// Fetch and clear prompts displayed so far
    pub fn take_prompts(&self) -> Vec<Prompt> {
        let mut e = self.engine.lock().unwrap();
        core::mem::take(&mut e.driver_mut().prompts)
    }

    /// Fetch kinds of prompts displayed so far
    pub fn prompt_kinds(&self) -> Vec<PromptKind> {
        let e = self.engine.lock().unwrap();
        e.driver().prompts.iter().map(|p| p.kind).collect()
    }
}

#[async_trait]
impl Exchange for TestEngine {
    type Error = Error;

    async fn exchange(&self, ins: u8, req: &[u8], resp: &mut [u8]) -> Result<usize, Self::Error> {
        debug!("cmd: {:02x} ({} bytes)", ins, req.len());

        assert!(
            req.len() <= MAX_APDU_LEN,
            "encoded command maximum length exceeded for ins {ins:02x} ({} bytes)",
            req.len()
        );

        trace!("encoded: {:02x?}", req);

        // Decode and handle request APDU
        let mut engine = self.engine.lock().unwrap();
        let r = engine.apdu(ins, req)?;

        // Encode output to response APDU
        let n = r.encode(resp).unwrap();

        assert!(
            n < 250,
            "encoded response maximum length exceeded for: {r:?} ({n} bytes)"
        );

        debug!("resp: {:?}", r);

        Ok(n)
    }
}

/// Driver implementation for test use
pub struct TestDriver {
    /// BIP39 Mnemonic derived seed
    pub seed: [u8; 64],
    /// Root key material unavailable
    pub locked: bool,
    /// Approve (or reject) prompts
    pub approve: bool,
    /// Prompts displayed
    pub prompts: Vec<Prompt>,
}

impl TestDriver {
    pub fn new(seed: Seed) -> Self {
        let mut b = [0u8; 64];
        b.copy_from_slice(seed.as_bytes());
        Self {
            seed: b,
            locked: false,
            approve: false,
            prompts: vec![],
        }
    }
}

impl Driver for TestDriver {
    fn slip10_derive_ed25519(&self, path: &[u32]) -> Option<Zeroizing<[u8; 32]>> {
        match self.locked {
            true => None,
            false => Some(Zeroizing::new(slip10_ed25519::derive_ed25519_private_key(
                &self.seed, path,
            ))),
        }
    }

    fn confirm(&mut self, prompt: &Prompt) -> bool {
        debug!(
            "prompt: {} '{}' {:?} (approve: {})",
            prompt.kind, prompt.header, prompt.lines, self.approve
        );

        self.prompts.push(prompt.clone());
        self.approve
    }
}

/// Build a test engine for the provided mnemonic
pub fn test_engine(mnemonic: &str) -> TestEngine {
    let seed = ledger_xlm_tests::public_key::seed(mnemonic);
    TestEngine::new(Engine::new(TestDriver::new(seed)))
}

pub async fn approve_tx(e: &TestEngine) {
    debug!("Approve transaction");
    e.approve(true);
}

pub async fn reject_tx(e: &TestEngine) {
    debug!("Reject transaction");
    e.approve(false);
}
