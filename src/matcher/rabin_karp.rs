//! Rabin-Karp search with a polynomial rolling hash.
//!
//! The modulus is deliberately small, so hash collisions are frequent. Every
//! hash hit is confirmed by a direct comparison before it is reported.

use super::{matches_at, SearchStats, Symbol};

/// Hash base (alphabet size assumption)
pub const BASE: i64 = 256;

/// Hash modulus (small prime)
pub const MODULUS: i64 = 101;

/// Rolling hash state for one pattern length.
///
/// `window_hash` always equals the hash of the current text window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingHash {
    /// BASE^(m-1) mod MODULUS, the weight of the outgoing symbol
    multiplier: i64,
    pattern_hash: i64,
    window_hash: i64,
}

impl RollingHash {
    /// Hash `pattern` and the first window of `text`.
    ///
    /// Returns `None` when `text` is shorter than `pattern`.
    pub fn new<S: Symbol>(text: &[S], pattern: &[S]) -> Option<Self> {
        let m = pattern.len();
        let first_window = text.get(..m)?;
        let mut multiplier = 1;
        for _ in 1..m {
            multiplier = (multiplier * BASE) % MODULUS;
        }

        Some(Self {
            multiplier,
            pattern_hash: hash_of(pattern),
            window_hash: hash_of(first_window),
        })
    }

    pub fn pattern_hash(&self) -> i64 {
        self.pattern_hash
    }

    pub fn window_hash(&self) -> i64 {
        self.window_hash
    }

    pub fn multiplier(&self) -> i64 {
        self.multiplier
    }

    /// True when the current window may equal the pattern
    #[inline]
    pub fn is_candidate(&self) -> bool {
        self.pattern_hash == self.window_hash
    }

    /// Slide the window one symbol right: drop `outgoing`, append `incoming`
    #[inline]
    pub fn roll<S: Symbol>(&mut self, outgoing: S, incoming: S) {
        let without = self.window_hash - outgoing.code() as i64 * self.multiplier;
        let mut hash = (BASE * without + incoming.code() as i64) % MODULUS;
        if hash < 0 {
            hash += MODULUS;
        }
        self.window_hash = hash;
    }
}

/// Polynomial hash of `symbols` mod [`MODULUS`], computed by Horner's rule
pub fn hash_of<S: Symbol>(symbols: &[S]) -> i64 {
    symbols
        .iter()
        .fold(0, |hash, &s| (BASE * hash + s.code() as i64) % MODULUS)
}

/// Find all occurrences of `pattern` in `text`
pub fn search<S: Symbol>(text: &[S], pattern: &[S]) -> Vec<usize> {
    search_with_stats(text, pattern).0
}

/// Find all occurrences of `pattern` in `text`, counting the work done
pub fn search_with_stats<S: Symbol>(text: &[S], pattern: &[S]) -> (Vec<usize>, SearchStats) {
    let mut stats = SearchStats::default();
    let n = text.len();
    let m = pattern.len();

    if m == 0 {
        return (Vec::new(), stats);
    }
    let Some(mut hash) = RollingHash::new(text, pattern) else {
        return (Vec::new(), stats);
    };
    let mut positions = Vec::new();
    let last = n - m;

    for i in 0..=last {
        stats.windows += 1;

        if hash.is_candidate() {
            stats.hash_hits += 1;
            stats.comparisons += verify_cost(&text[i..i + m], pattern);
            if matches_at(text, pattern, i) {
                positions.push(i);
            } else {
                stats.spurious_hits += 1;
            }
        }

        if i < last {
            hash.roll(text[i], text[i + m]);
        }
    }

    (positions, stats)
}

/// Symbol comparisons a left-to-right verification performs
fn verify_cost<S: Symbol>(window: &[S], pattern: &[S]) -> usize {
    window
        .iter()
        .zip(pattern)
        .position(|(a, b)| a != b)
        .map_or(pattern.len(), |mismatch| mismatch + 1)
}
