//! Knuth-Morris-Pratt search.

use super::{SearchStats, Symbol};

/// Build the failure function (LPS array) for `pattern`.
///
/// Entry `i` is the length of the longest proper prefix of `pattern[..=i]`
/// that is also a suffix of it.
pub fn failure_function<S: Symbol>(pattern: &[S]) -> Vec<usize> {
    let m = pattern.len();
    let mut lps = vec![0; m];
    let mut length = 0;
    let mut i = 1;

    while i < m {
        if pattern[i] == pattern[length] {
            length += 1;
            lps[i] = length;
            i += 1;
        } else if length != 0 {
            length = lps[length - 1];
        } else {
            lps[i] = 0;
            i += 1;
        }
    }

    lps
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

    if m == 0 || m > n {
        return (Vec::new(), stats);
    }

    let lps = failure_function(pattern);
    let mut positions = Vec::new();
    let mut i = 0; // text index
    let mut j = 0; // pattern index

    while i < n {
        stats.comparisons += 1;
        if pattern[j] == text[i] {
            i += 1;
            j += 1;
            if j == m {
                stats.windows += 1;
                positions.push(i - j);
                j = lps[j - 1];
            }
        } else if j > 0 {
            stats.windows += 1;
            j = lps[j - 1];
        } else {
            stats.windows += 1;
            i += 1;
        }
    }

    (positions, stats)
}
