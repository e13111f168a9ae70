//! Short code generation.
//!
//! Codes are drawn from `[A-Za-z0-9]` using the thread-local RNG, which is
//! seeded from the operating system.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Default length of generated codes.
pub const DEFAULT_CODE_LENGTH: usize = 8;

/// Source of candidate short codes.
///
/// Candidates are not guaranteed unique; the caller resolves collisions
/// against the store.
pub trait CodeGenerator: Send + Sync {
    /// Produces one candidate code.
    fn generate(&self) -> String;
}

/// Random alphanumeric codes of a fixed length.
///
/// With 62 symbols and the default length of 8 there are about 2.2e14
/// possible codes.
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(self.length)
            .map(char::from)
            .collect()
    }
}
