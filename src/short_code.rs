//! Short code allocation
//!
//! Codes are drawn from a lowercase alphabet without look-alike characters (`0`/`o`,
//! `1`/`l`/`i`), so a code read aloud or typed from print survives case changes.

use std::iter;

/// Symbols a short code is made of
pub const ALPHABET: &[u8] = b"23456789abcdefghjkmnpqrstuvwxyz";

/// Default length of a new short code, 31^7 is roughly 2.7 * 10^10 codes
pub const DEFAULT_LENGTH: usize = 7;

/// Default number of candidates drawn before giving up
pub const DEFAULT_ATTEMPTS: usize = 5;

/// Shortest configurable code length
pub const MIN_LENGTH: usize = 4;

/// Longest code accepted, for new and already issued codes
pub const MAX_LENGTH: usize = 32;

/// Draws short code candidates
///
/// Only produces candidates, uniqueness is decided by the storage when the collection is
/// inserted. Every candidate costs one attempt, the iterator ends when the budget is spent.
#[derive(Clone, Debug)]
pub struct ShortCodeAllocator {
    /// Symbols to draw from
    alphabet: &'static [u8],

    /// Length of every code
    length: usize,

    /// Candidates per allocation
    max_attempts: usize,
}

impl Default for ShortCodeAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH, DEFAULT_ATTEMPTS)
    }
}

impl ShortCodeAllocator {
    /// Create an allocator for the default alphabet
    ///
    /// Length is clamped to `MIN_LENGTH..=MAX_LENGTH`, at least one attempt is made
    pub fn new(length: usize, max_attempts: usize) -> Self {
        Self {
            alphabet: ALPHABET,
            length: length.clamp(MIN_LENGTH, MAX_LENGTH),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Create an allocator with a custom alphabet, used to force collisions
    #[cfg(test)]
    pub fn with_alphabet(alphabet: &'static [u8], length: usize, max_attempts: usize) -> Self {
        Self {
            alphabet,
            length,
            max_attempts,
        }
    }

    /// Number of candidates handed out per allocation
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Draw a single random code
    pub fn generate(&self) -> String {
        iter::repeat_with(|| self.alphabet[rand::random_range(0..self.alphabet.len())] as char)
            .take(self.length)
            .collect()
    }

    /// The bounded sequence of candidates for one allocation
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.max_attempts).map(|_| self.generate())
    }
}

/// Normalize a short code as typed or scanned
///
/// Surrounding slashes are ignored and the code is lowercased. Returns `None` for anything
/// that can never have been issued.
pub fn normalize_short_code(raw: &str) -> Option<String> {
    let short_code = raw.trim().trim_matches('/').to_ascii_lowercase();

    if short_code.is_empty()
        || short_code.len() > MAX_LENGTH
        || !short_code.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return None;
    }

    Some(short_code)
}
