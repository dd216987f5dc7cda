//! Word source backed by the ChaCha20 keystream.

use super::RandomSource;
use crate::error::Result;
use chacha20::cipher::{NewCipher, StreamCipher, StreamCipherSeek};
use chacha20::{ChaCha20, Key, Nonce};
use sha3::{Digest, Sha3_512};

const BLOCK_BYTES: usize = 64;
const BLOCK_WORDS: usize = BLOCK_BYTES / 4;

/// Expands a 32-bit seed into a 256-bit key and 96-bit nonce with SHA3-512,
/// then serves the keystream one little-endian word at a time.
#[derive(Clone)]
pub struct ChaCha20Source {
    key: [u8; 32],
    nonce: [u8; 12],
    block_counter: u64,
    block: [u32; BLOCK_WORDS],
    next_word: usize,
}

impl ChaCha20Source {
    pub fn new(seed: u32) -> Self {
        let mut source = Self {
            key: [0; 32],
            nonce: [0; 12],
            block_counter: 0,
            block: [0; BLOCK_WORDS],
            next_word: BLOCK_WORDS,
        };
        source.set_seed(seed);
        source
    }

    fn refill(&mut self) {
        let mut cipher = ChaCha20::new(Key::from_slice(&self.key), Nonce::from_slice(&self.nonce));
        cipher.seek(self.block_counter * BLOCK_BYTES as u64);

        let mut keystream = [0u8; BLOCK_BYTES];
        cipher.apply_keystream(&mut keystream);
        for (word, bytes) in self.block.iter_mut().zip(keystream.chunks_exact(4)) {
            *word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        self.block_counter += 1;
        self.next_word = 0;
    }
}

impl RandomSource for ChaCha20Source {
    fn generate(&mut self) -> u32 {
        if self.next_word >= BLOCK_WORDS {
            self.refill();
        }
        let word = self.block[self.next_word];
        self.next_word += 1;
        word
    }

    fn set_seed(&mut self, seed: u32) {
        let digest = Sha3_512::digest(seed.to_be_bytes());
        self.key.copy_from_slice(&digest[..32]);
        self.nonce.copy_from_slice(&digest[32..44]);
        self.block_counter = 0;
        self.next_word = BLOCK_WORDS;
    }

    fn duplicate(&self) -> Result<Box<dyn RandomSource>> {
        Ok(Box::new(self.clone()))
    }

    fn name(&self) -> &'static str {
        "chacha20"
    }
}
