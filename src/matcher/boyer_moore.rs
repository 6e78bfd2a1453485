//! Boyer-Moore search using only the bad-character rule.
//!
//! After a full match the window advances by one position rather than by a
//! good-suffix shift, so overlapping matches are never skipped.

use super::{SearchStats, Symbol};
use rustc_hash::FxHashMap;

/// Symbols with a code below this are stored in a flat array.
const DIRECT_SLOTS: usize = 256;

/// Last index of each symbol in the pattern.
///
/// Bytes (and chars below U+0100) live in a flat array; wider symbols fall
/// back to a hash map.
pub struct BadCharTable<S: Symbol> {
    direct: [isize; DIRECT_SLOTS],
    wide: FxHashMap<S, isize>,
}

impl<S: Symbol> BadCharTable<S> {
    /// Build the table. Later occurrences overwrite earlier ones, so each
    /// entry holds the rightmost index of its symbol.
    pub fn build(pattern: &[S]) -> Self {
        let mut table = Self {
            direct: [-1; DIRECT_SLOTS],
            wide: FxHashMap::default(),
        };

        for (i, &symbol) in pattern.iter().enumerate() {
            let code = symbol.code() as usize;
            if code < DIRECT_SLOTS {
                table.direct[code] = i as isize;
            } else {
                table.wide.insert(symbol, i as isize);
            }
        }

        table
    }

    /// Rightmost index of `symbol` in the pattern, or -1 if absent
    #[inline]
    pub fn last_index(&self, symbol: S) -> isize {
        let code = symbol.code() as usize;
        if code < DIRECT_SLOTS {
            self.direct[code]
        } else {
            self.wide.get(&symbol).copied().unwrap_or(-1)
        }
    }
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

    let table = BadCharTable::build(pattern);
    let mut positions = Vec::new();
    let mut i = 0;

    while i <= n - m {
        stats.windows += 1;

        // j counts remaining unmatched symbols; the compared index is j - 1
        let mut j = m;
        while j > 0 {
            stats.comparisons += 1;
            if pattern[j - 1] != text[i + j - 1] {
                break;
            }
            j -= 1;
        }

        if j == 0 {
            positions.push(i);
            i += 1;
        } else {
            let mismatch = (j - 1) as isize;
            let last = table.last_index(text[i + j - 1]);
            i += (mismatch - last).max(1) as usize;
        }
    }

    (positions, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bad_char_table_last_index_wins() {
        let table = BadCharTable::build(b"abcab");
        assert_eq!(table.last_index(b'a'), 3);
        assert_eq!(table.last_index(b'b'), 4);
        assert_eq!(table.last_index(b'c'), 2);
        assert_eq!(table.last_index(b'z'), -1);
    }

    #[test]
    fn test_bad_char_table_wide_symbols() {
        let pattern: Vec<char> = "ключ к".chars().collect();
        let table = BadCharTable::build(&pattern);
        assert_eq!(table.last_index('к'), 5);
        assert_eq!(table.last_index('ч'), 3);
        assert_eq!(table.last_index(' '), 4);
        assert_eq!(table.last_index('я'), -1);
    }

    #[test]
    fn test_search_basic() {
        assert_eq!(search(b"here is a simple example", b"example"), vec![17]);
        assert_eq!(search(b"abcabcabc", b"abc"), vec![0, 3, 6]);
    }

    #[test]
    fn test_search_overlapping() {
        assert_eq!(search(b"aaaa", b"aa"), vec![0, 1, 2]);
    }

    #[test]
    fn test_search_edge_cases() {
        assert_eq!(search(b"abc", b""), Vec::<usize>::new());
        assert_eq!(search(b"", b""), Vec::<usize>::new());
        assert_eq!(search(b"abc", b"abc"), vec![0]);
        assert_eq!(search(b"abc", b"abcd"), Vec::<usize>::new());
        assert_eq!(search(b"abc", b"xyz"), Vec::<usize>::new());
    }

    #[test]
    fn test_absent_symbol_skips_whole_pattern() {
        // 'x' is absent, so the first mismatch jumps the window past it
        let (found, stats) = search_with_stats(b"xxxxxxxxabc", b"abc");
        assert_eq!(found, vec![8]);
        assert_eq!(stats.windows, 4);
    }

    #[test]
    fn test_match_advances_by_one() {
        // Every alignment after a match is examined, even when it cannot match
        let (found, stats) = search_with_stats(b"abcd", b"abc");
        assert_eq!(found, vec![0]);
        assert_eq!(stats.windows, 2);
    }
}
