//! CubeHash implementation
//!
//! CubeHash keeps a 1024-bit state of 32 little-endian words. Message blocks
//! of `b` bytes are xored into the front of the state, each followed by `r`
//! rounds. Initialization and finalization run `i` and `f` extra rounds.

use super::traits::{HasherFactory, IncrementalHasher};
use super::HashParameters;
use crate::digest::Digest;
use crate::error::ValidationError;
use crate::Result;

const STATE_WORDS: usize = 32;
const MAX_BLOCK_BYTES: usize = 128;
const MAX_OUTPUT_BITS: u32 = 512;

/// Round / block configuration selected by a revision number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CubeHashVariant {
    pub init_rounds: u32,
    pub rounds: u32,
    pub block_bytes: usize,
    pub final_rounds: u32,
}

impl CubeHashVariant {
    /// Parameter set for a revision, if the revision is known
    ///
    /// 1: CubeHash8/1, 2: CubeHash16/32 with 10r setup and teardown,
    /// 3: CubeHash16+16/32+32.
    pub fn for_revision(revision: u32) -> Option<Self> {
        match revision {
            1 => Some(Self {
                init_rounds: 80,
                rounds: 8,
                block_bytes: 1,
                final_rounds: 80,
            }),
            2 => Some(Self {
                init_rounds: 160,
                rounds: 16,
                block_bytes: 32,
                final_rounds: 160,
            }),
            3 => Some(Self {
                init_rounds: 16,
                rounds: 16,
                block_bytes: 32,
                final_rounds: 32,
            }),
            _ => None,
        }
    }
}

/// Check a revision / output length pair without building a hasher
pub(crate) fn validate(params: HashParameters) -> Result<CubeHashVariant> {
    let variant = CubeHashVariant::for_revision(params.revision).ok_or_else(|| {
        ValidationError::invalid_parameters(
            params.revision,
            params.output_bits,
            "unknown revision (expected 1, 2 or 3)",
        )
    })?;

    if params.output_bits == 0
        || params.output_bits > MAX_OUTPUT_BITS
        || params.output_bits % 8 != 0
    {
        return Err(ValidationError::invalid_parameters(
            params.revision,
            params.output_bits,
            "output length must be a multiple of 8 between 8 and 512",
        )
        .into());
    }

    Ok(variant)
}

/// Streaming CubeHash state
#[derive(Clone)]
pub struct CubeHash {
    state: [u32; STATE_WORDS],
    variant: CubeHashVariant,
    output_bytes: usize,
    block: [u8; MAX_BLOCK_BYTES],
    buffered: usize,
}

impl std::fmt::Debug for CubeHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CubeHash")
            .field("variant", &self.variant)
            .field("output_bytes", &self.output_bytes)
            .field("buffered", &self.buffered)
            .finish()
    }
}

impl CubeHash {
    /// Create a hasher for the given parameters
    pub fn new(params: HashParameters) -> Result<Self> {
        let variant = validate(params)?;
        let output_bytes = (params.output_bits / 8) as usize;

        let mut state = [0u32; STATE_WORDS];
        state[0] = output_bytes as u32;
        state[1] = variant.block_bytes as u32;
        state[2] = variant.rounds;
        permute(&mut state, variant.init_rounds);

        Ok(Self {
            state,
            variant,
            output_bytes,
            block: [0; MAX_BLOCK_BYTES],
            buffered: 0,
        })
    }

    /// Feed message bytes
    pub fn update(&mut self, mut data: &[u8]) {
        let block_bytes = self.variant.block_bytes;

        while !data.is_empty() {
            let take = (block_bytes - self.buffered).min(data.len());
            self.block[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];

            if self.buffered == block_bytes {
                self.absorb_block();
            }
        }
    }

    /// Pad, run the finalization rounds and return the digest
    pub fn finalize(mut self) -> Digest {
        let block_bytes = self.variant.block_bytes;
        self.block[self.buffered] = 0x80;
        self.block[self.buffered + 1..block_bytes].fill(0);
        self.buffered = block_bytes;
        self.absorb_block();

        self.state[31] ^= 1;
        permute(&mut self.state, self.variant.final_rounds);

        let bytes: Vec<u8> = self
            .state
            .iter()
            .flat_map(|word| word.to_le_bytes())
            .take(self.output_bytes)
            .collect();
        Digest::new(bytes)
    }

    fn absorb_block(&mut self) {
        for (index, byte) in self.block[..self.buffered].iter().enumerate() {
            self.state[index / 4] ^= u32::from(*byte) << (8 * (index % 4));
        }
        self.buffered = 0;
        permute(&mut self.state, self.variant.rounds);
    }
}

fn permute(x: &mut [u32; STATE_WORDS], rounds: u32) {
    for _ in 0..rounds {
        round(x);
    }
}

fn round(x: &mut [u32; STATE_WORDS]) {
    for i in 0..16 {
        x[i + 16] = x[i + 16].wrapping_add(x[i]);
    }
    for word in x.iter_mut().take(16) {
        *word = word.rotate_left(7);
    }
    for i in 0..8 {
        x.swap(i, i + 8);
    }
    for i in 0..16 {
        x[i] ^= x[i + 16];
    }
    for i in [16, 17, 20, 21, 24, 25, 28, 29] {
        x.swap(i, i + 2);
    }
    for i in 0..16 {
        x[i + 16] = x[i + 16].wrapping_add(x[i]);
    }
    for word in x.iter_mut().take(16) {
        *word = word.rotate_left(11);
    }
    for i in [0, 1, 2, 3, 8, 9, 10, 11] {
        x.swap(i, i + 4);
    }
    for i in 0..16 {
        x[i] ^= x[i + 16];
    }
    for i in (16..32).step_by(2) {
        x.swap(i, i + 1);
    }
}

impl IncrementalHasher for CubeHash {
    fn update(&mut self, data: &[u8]) {
        CubeHash::update(self, data);
    }

    fn finalize(self: Box<Self>) -> Digest {
        CubeHash::finalize(*self)
    }
}

/// Factory for the built-in CubeHash hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct CubeHashFactory;

impl HasherFactory for CubeHashFactory {
    fn name(&self) -> &'static str {
        "CubeHash"
    }

    fn create(&self, params: HashParameters) -> Result<Box<dyn IncrementalHasher>> {
        Ok(Box::new(CubeHash::new(params)?))
    }
}
