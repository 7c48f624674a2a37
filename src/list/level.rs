// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Level generation for the skip list.
//!
//! A node's level is drawn from a geometric distribution: start at 1 and keep
//! adding one for as long as a fair coin comes up `true`. The coin is a
//! [`BitSource`], so production code can flip a live RNG while tests replay a
//! fixed script and get the exact same tower heights every run.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_core::RngCore;

/// Upper bound on a drawn level. 32 levels covers far more entries than fit in memory.
pub const MAX_LEVEL: usize = 32;

/// Anything that can answer "give me the next boolean".
pub trait BitSource {
    /// Consume and return the next bit.
    fn next_bool(&mut self) -> bool;
}

impl<B: BitSource + ?Sized> BitSource for Box<B> {
    fn next_bool(&mut self) -> bool {
        return (**self).next_bool();
    }
}

/// Draw a level >= 1: one plus the number of leading `true`s.
pub fn random_level<B: BitSource + ?Sized>(bits: &mut B) -> usize {
    let mut level = 1;
    while level < MAX_LEVEL && bits.next_bool() {
        level += 1;
    }
    return level;
}

/// Live bits from any [`RngCore`], buffered one 64-bit word at a time.
pub struct RandomBits<R> {
    rng: R,
    word: u64,
    left: u32,
}

impl<R: RngCore> RandomBits<R> {
    pub fn new(rng: R) -> RandomBits<R> {
        return RandomBits {
            rng,
            word: 0,
            left: 0,
        };
    }
}

impl RandomBits<StdRng> {
    /// A source seeded from the operating system.
    pub fn from_entropy() -> RandomBits<StdRng> {
        return RandomBits::new(StdRng::from_entropy());
    }

    /// A reproducible source: the same seed always yields the same bits.
    pub fn seeded(seed: u64) -> RandomBits<StdRng> {
        return RandomBits::new(StdRng::seed_from_u64(seed));
    }
}

impl<R: RngCore> BitSource for RandomBits<R> {
    fn next_bool(&mut self) -> bool {
        if self.left == 0 {
            self.word = self.rng.next_u64();
            self.left = u64::BITS;
        }
        let bit = self.word & 1 == 1;
        self.word >>= 1;
        self.left -= 1;
        bit
    }
}

/// A replayable script of bits.
///
/// Bits are handed out in the order they were queued. Once the script runs dry
/// every draw answers `false`, which pins further levels at 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBits {
    script: VecDeque<bool>,
}

impl ScriptedBits {
    pub fn new<I: IntoIterator<Item = bool>>(bits: I) -> ScriptedBits {
        return ScriptedBits {
            script: bits.into_iter().collect(),
        };
    }

    /// Queue more bits after whatever is still pending.
    pub fn extend<I: IntoIterator<Item = bool>>(&mut self, bits: I) {
        self.script.extend(bits);
    }

    /// Bits not yet consumed.
    pub fn remaining(&self) -> usize {
        return self.script.len();
    }
}

impl BitSource for ScriptedBits {
    fn next_bool(&mut self) -> bool {
        return self.script.pop_front().unwrap_or(false);
    }
}
