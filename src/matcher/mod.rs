//! Exact substring matching.
//!
//! Three interchangeable scanners share one contract: given a text and a
//! pattern, return every offset where the pattern starts, in ascending order.
//! Overlapping occurrences are reported.
//!
//! - [`boyer_moore`] - right-to-left window comparison with the bad-character rule
//! - [`kmp`] - single pass driven by the failure function (LPS array)
//! - [`rabin_karp`] - rolling polynomial hash with direct verification
//!
//! ```
//! use fxs::matcher::{Algorithm, kmp};
//!
//! assert_eq!(kmp::search(b"aaaa", b"aa"), vec![0, 1, 2]);
//! assert_eq!(Algorithm::RabinKarp.search(b"abcabc", b"bc"), vec![1, 4]);
//! ```

pub mod boyer_moore;
pub mod kmp;
pub mod rabin_karp;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// An element of a text or pattern.
///
/// `code` maps the symbol to the non-negative integer used by the rolling hash.
pub trait Symbol: Copy + Eq + Hash {
    fn code(self) -> u32;
}

impl Symbol for u8 {
    #[inline]
    fn code(self) -> u32 {
        self as u32
    }
}

impl Symbol for char {
    #[inline]
    fn code(self) -> u32 {
        self as u32
    }
}

/// Work counters collected during a single search call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    /// Symbol-to-symbol comparisons between text and pattern
    pub comparisons: usize,
    /// Alignments of the pattern against the text that were examined
    pub windows: usize,
    /// Windows whose rolling hash equalled the pattern hash (Rabin-Karp only)
    pub hash_hits: usize,
    /// Hash hits rejected by direct comparison (Rabin-Karp only)
    pub spurious_hits: usize,
}

/// Substring search algorithm selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    #[default]
    BoyerMoore,
    Kmp,
    RabinKarp,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::BoyerMoore, Algorithm::Kmp, Algorithm::RabinKarp];

    /// Human-readable algorithm name
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::BoyerMoore => "Boyer-Moore",
            Algorithm::Kmp => "KMP",
            Algorithm::RabinKarp => "Rabin-Karp",
        }
    }

    /// Find every occurrence of `pattern` in `text`
    pub fn search<S: Symbol>(&self, text: &[S], pattern: &[S]) -> Vec<usize> {
        match self {
            Algorithm::BoyerMoore => boyer_moore::search(text, pattern),
            Algorithm::Kmp => kmp::search(text, pattern),
            Algorithm::RabinKarp => rabin_karp::search(text, pattern),
        }
    }

    /// Like [`Algorithm::search`], also returning work counters
    pub fn search_with_stats<S: Symbol>(&self, text: &[S], pattern: &[S]) -> (Vec<usize>, SearchStats) {
        match self {
            Algorithm::BoyerMoore => boyer_moore::search_with_stats(text, pattern),
            Algorithm::Kmp => kmp::search_with_stats(text, pattern),
            Algorithm::RabinKarp => rabin_karp::search_with_stats(text, pattern),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Algorithm::BoyerMoore => "boyer-moore",
            Algorithm::Kmp => "kmp",
            Algorithm::RabinKarp => "rabin-karp",
        };
        f.write_str(id)
    }
}

impl FromStr for Algorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "bm" | "boyer-moore" | "boyermoore" => Ok(Algorithm::BoyerMoore),
            "kmp" | "knuth-morris-pratt" => Ok(Algorithm::Kmp),
            "rk" | "rabin-karp" | "rabinkarp" => Ok(Algorithm::RabinKarp),
            other => bail!("unknown algorithm '{}' (expected bm, kmp or rk)", other),
        }
    }
}

/// Search a string by Unicode scalar values.
///
/// Returned positions are character offsets, not byte offsets.
pub fn search_str(algorithm: Algorithm, text: &str, pattern: &str) -> Vec<usize> {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();
    algorithm.search(&text, &pattern)
}

/// Run all three scanners and return their common result.
///
/// Fails if any scanner disagrees with Boyer-Moore.
pub fn verify_agreement<S: Symbol + Sync>(text: &[S], pattern: &[S]) -> Result<Vec<usize>> {
    let (bm, (kmp, rk)) = rayon::join(
        || boyer_moore::search(text, pattern),
        || {
            rayon::join(
                || kmp::search(text, pattern),
                || rabin_karp::search(text, pattern),
            )
        },
    );

    let mut disagreeing = Vec::new();
    if kmp != bm {
        disagreeing.push(Algorithm::Kmp.name());
    }
    if rk != bm {
        disagreeing.push(Algorithm::RabinKarp.name());
    }
    if !disagreeing.is_empty() {
        bail!(
            "{} disagree with Boyer-Moore ({} matches)",
            disagreeing.join(" and "),
            bm.len()
        );
    }

    Ok(bm)
}

/// Check that `pattern` occurs at `pos` in `text`
#[inline]
pub(crate) fn matches_at<S: Symbol>(text: &[S], pattern: &[S], pos: usize) -> bool {
    text.get(pos..pos + pattern.len()) == Some(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KMP_TEXT: &[u8] = b"ABAAABCDABABCABCABCABC";
    const KMP_PATTERN: &[u8] = b"ABABCABCABCABC";

    #[test]
    fn test_classic_kmp_scenario_all_algorithms() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.search(KMP_TEXT, KMP_PATTERN), vec![15], "{}", algorithm.name());
        }
    }

    #[test]
    fn test_algorithm_from_str() {
        assert_eq!("bm".parse::<Algorithm>().unwrap(), Algorithm::BoyerMoore);
        assert_eq!("Boyer-Moore".parse::<Algorithm>().unwrap(), Algorithm::BoyerMoore);
        assert_eq!("kmp".parse::<Algorithm>().unwrap(), Algorithm::Kmp);
        assert_eq!("RK".parse::<Algorithm>().unwrap(), Algorithm::RabinKarp);
        assert!("naive".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_algorithm_display_roundtrips_through_from_str() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn test_algorithm_serde_names() {
        let json = serde_json::to_string(&Algorithm::RabinKarp).unwrap();
        assert_eq!(json, "\"rabin-karp\"");
        let parsed: Algorithm = serde_json::from_str("\"kmp\"").unwrap();
        assert_eq!(parsed, Algorithm::Kmp);
    }

    #[test]
    fn test_search_str_uses_char_offsets() {
        // Multi-byte characters before the match shift byte offsets but not char offsets
        let text = "алгоритм та алгоритми";
        for algorithm in Algorithm::ALL {
            assert_eq!(search_str(algorithm, text, "алгоритм"), vec![0, 12]);
        }
    }

    #[test]
    fn test_verify_agreement() {
        let found = verify_agreement(b"abracadabra", b"abra").unwrap();
        assert_eq!(found, vec![0, 7]);
    }

    #[test]
    fn test_matches_at_bounds() {
        assert!(matches_at(b"abc", b"bc", 1));
        assert!(!matches_at(b"abc", b"bc", 2));
        assert!(!matches_at(b"abc", b"abcd", 0));
    }
}
