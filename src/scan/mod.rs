//! Applying a matcher to files on disk.
//!
//! Directories are walked with gitignore rules, files are memory-mapped and
//! searched as raw bytes in parallel. Each match is reported with its line
//! and column.

pub mod walker;

pub use walker::{collect_targets, compile_glob, ScanTarget};

use crate::matcher::Algorithm;
use crate::utils::{decode_line, is_binary, LineIndex};
use anyhow::{Context, Result};
use memmap2::Mmap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A single occurrence of the pattern in a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMatch {
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// Byte column within `line` (0-based)
    pub column: usize,
    /// Byte offset within the file
    pub offset: usize,
    /// Matched line without its terminator, lossily decoded
    pub line: String,
}

/// Counters for a completed scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub matches: usize,
}

/// Matches and counters from [`scan_paths`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    pub matches: Vec<FileMatch>,
    pub summary: ScanSummary,
}

/// Knobs for a file scan
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub algorithm: Algorithm,
    /// Only scan walked files whose name or relative path matches this glob
    pub glob: Option<String>,
    pub max_file_size: u64,
    pub skip_binary: bool,
    /// Stop after this many matches per file
    pub max_count: Option<usize>,
    /// Print per-file diagnostics on stderr
    pub verbose: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::default(),
            glob: None,
            max_file_size: 64 * 1024 * 1024,
            skip_binary: true,
            max_count: None,
            verbose: false,
        }
    }
}

/// Outcome of scanning one file
enum FileOutcome {
    Scanned(Vec<FileMatch>),
    Skipped,
    Failed,
}

/// Search every file under `roots` for `pattern`.
///
/// A missing root is an error; unreadable files are counted in
/// [`ScanSummary::files_failed`] and the scan continues.
pub fn scan_paths(roots: &[PathBuf], pattern: &[u8], options: &ScanOptions) -> Result<ScanReport> {
    let glob = compile_glob(options.glob.as_deref())?;

    let mut targets = Vec::new();
    for root in roots {
        targets.extend(collect_targets(root, glob.as_ref())?);
    }

    if options.verbose {
        eprintln!(
            "fxs: scanning {} files with {}",
            targets.len(),
            options.algorithm.name()
        );
    }

    let skipped = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let per_file: Vec<Vec<FileMatch>> = targets
        .par_iter()
        .filter_map(|target| match scan_file(target, pattern, options) {
            FileOutcome::Scanned(matches) => Some(matches),
            FileOutcome::Skipped => {
                skipped.fetch_add(1, Ordering::Relaxed);
                None
            }
            FileOutcome::Failed => {
                failed.fetch_add(1, Ordering::Relaxed);
                None
            }
        })
        .collect();

    let files_skipped = skipped.load(Ordering::Relaxed);
    let files_failed = failed.load(Ordering::Relaxed);
    let files_scanned = per_file.len();

    // Targets are sorted and par_iter().collect() preserves order
    let matches: Vec<FileMatch> = per_file.into_iter().flatten().collect();

    let summary = ScanSummary {
        files_scanned,
        files_skipped,
        files_failed,
        matches: matches.len(),
    };

    if options.verbose {
        eprintln!(
            "fxs: {} matches in {} files ({} skipped, {} unreadable)",
            summary.matches, summary.files_scanned, summary.files_skipped, summary.files_failed
        );
    } else if files_failed > 0 {
        eprintln!("({} files could not be read)", files_failed);
    }

    Ok(ScanReport { matches, summary })
}

fn scan_file(target: &ScanTarget, pattern: &[u8], options: &ScanOptions) -> FileOutcome {
    let content = match map_file(&target.full_path) {
        Ok(content) => content,
        Err(e) => {
            if options.verbose {
                eprintln!("fxs: {:#}", e);
            }
            return FileOutcome::Failed;
        }
    };

    let Some(content) = content else {
        return FileOutcome::Scanned(Vec::new());
    };

    if content.len() as u64 > options.max_file_size {
        if options.verbose {
            eprintln!("fxs: skipping {} (too large)", target.display_path.display());
        }
        return FileOutcome::Skipped;
    }

    if options.skip_binary && is_binary(&content) {
        if options.verbose {
            eprintln!("fxs: skipping {} (binary)", target.display_path.display());
        }
        return FileOutcome::Skipped;
    }

    FileOutcome::Scanned(find_in_content(
        &target.display_path,
        &content,
        pattern,
        options.algorithm,
        options.max_count,
    ))
}

/// Memory-map a file. Empty files map to `None`.
fn map_file(path: &Path) -> Result<Option<Mmap>> {
    let file = File::open(path).with_context(|| format!("{}: failed to open", path.display()))?;
    let len = file
        .metadata()
        .with_context(|| format!("{}: failed to stat", path.display()))?
        .len();
    if len == 0 {
        return Ok(None);
    }
    let mmap = unsafe { Mmap::map(&file) }
        .with_context(|| format!("{}: failed to map", path.display()))?;
    Ok(Some(mmap))
}

/// Search an in-memory buffer and resolve each hit to its line
pub fn find_in_content(
    path: &Path,
    content: &[u8],
    pattern: &[u8],
    algorithm: Algorithm,
    max_count: Option<usize>,
) -> Vec<FileMatch> {
    let mut offsets = algorithm.search(content, pattern);
    if let Some(limit) = max_count {
        offsets.truncate(limit);
    }

    if offsets.is_empty() {
        return Vec::new();
    }

    let lines = LineIndex::new(content);
    offsets
        .into_iter()
        .map(|offset| {
            let (line_number, raw_column) = lines.locate(offset);
            let (line, column) = decode_line(lines.line(line_number), raw_column);
            FileMatch {
                path: path.to_path_buf(),
                line_number,
                column,
                offset,
                line,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options(algorithm: Algorithm) -> ScanOptions {
        ScanOptions {
            algorithm,
            ..ScanOptions::default()
        }
    }

    #[test]
    fn test_find_in_content_lines_and_columns() {
        let content = b"fn main() {\n    let main = 1;\n}\n";
        let found = find_in_content(Path::new("m.rs"), content, b"main", Algorithm::Kmp, None);

        assert_eq!(found.len(), 2);
        assert_eq!((found[0].line_number, found[0].column, found[0].offset), (1, 3, 3));
        assert_eq!(found[0].line, "fn main() {");
        assert_eq!((found[1].line_number, found[1].column), (2, 8));
        assert_eq!(found[1].line, "    let main = 1;");
    }

    #[test]
    fn test_find_in_content_column_points_into_decoded_line() {
        let content = b"\xff\xff needle here\n";
        let found = find_in_content(Path::new("cp1251.txt"), content, b"needle", Algorithm::Kmp, None);

        assert_eq!(found.len(), 1);
        let m = &found[0];
        assert_eq!(m.offset, 3);
        assert_eq!(&m.line[m.column..m.column + b"needle".len()], "needle");
    }

    #[test]
    fn test_find_in_content_max_count() {
        let found = find_in_content(Path::new("x"), b"aaaa", b"a", Algorithm::RabinKarp, Some(2));
        assert_eq!(found.iter().map(|m| m.offset).collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_scan_paths_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("one.txt"), "алгоритм сортування\nінший алгоритм\n").unwrap();
        fs::write(dir.path().join("two.txt"), "нічого тут\n").unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();
        fs::write(dir.path().join("blob.bin"), [0u8; 64]).unwrap();

        let pattern = "алгоритм".as_bytes();
        for algorithm in Algorithm::ALL {
            let report = scan_paths(&[dir.path().to_path_buf()], pattern, &options(algorithm)).unwrap();
            assert_eq!(report.summary.matches, 2);
            assert_eq!(report.summary.files_scanned, 3);
            assert_eq!(report.summary.files_skipped, 1);
            assert_eq!(report.summary.files_failed, 0);
            assert_eq!(report.matches[1].line_number, 2);
            assert_eq!(report.matches[1].column, "інший ".len());
        }
    }

    #[test]
    fn test_scan_paths_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("big.txt"), "needle ".repeat(100)).unwrap();

        let opts = ScanOptions {
            max_file_size: 10,
            ..ScanOptions::default()
        };
        let report = scan_paths(&[dir.path().to_path_buf()], b"needle", &opts).unwrap();
        assert!(report.matches.is_empty());
        assert_eq!(report.summary.files_skipped, 1);
    }

    #[test]
    fn test_scan_paths_missing_root() {
        let missing = PathBuf::from("/no/such/dir/for/fxs");
        assert!(scan_paths(&[missing], b"x", &ScanOptions::default()).is_err());
    }
}
