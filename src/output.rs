//! Output formatting for search results (ripgrep-like for files)

use crate::matcher::{Algorithm, SearchStats};
use crate::scan::{FileMatch, ScanReport};
use crate::utils::ColorMode;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

impl ColorMode {
    /// Resolve to a termcolor choice; `Auto` only colors a terminal
    pub fn choice(self) -> ColorChoice {
        match self {
            ColorMode::Auto => {
                if std::io::IsTerminal::is_terminal(&std::io::stdout()) {
                    ColorChoice::Auto
                } else {
                    ColorChoice::Never
                }
            }
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}

/// Print file matches as `path:line:column:content`, one per line.
///
/// With `heading`, the path is printed once above each file's matches.
/// `pattern_len` bytes are highlighted at each match column.
pub fn print_file_matches(
    matches: &[FileMatch],
    pattern_len: usize,
    color: ColorMode,
    heading: bool,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color.choice());
    let mut current_file: Option<&Path> = None;

    for m in matches {
        let is_new_file = current_file.map(|p| p != m.path).unwrap_or(true);

        if is_new_file {
            if heading {
                if current_file.is_some() {
                    // Blank line between files
                    writeln!(stdout)?;
                }
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
                writeln!(stdout, "{}", m.path.display())?;
                stdout.reset()?;
            }
            current_file = Some(&m.path);
        }

        if !heading {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            write!(stdout, "{}", m.path.display())?;
            stdout.reset()?;
            write!(stdout, ":")?;
        }

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", m.line_number)?;
        stdout.reset()?;
        write!(stdout, ":{}:", m.column + 1)?;

        print_highlighted(&mut stdout, &m.line, m.column, m.column + pattern_len)?;
    }

    Ok(())
}

/// Print a line with `[start, end)` highlighted
fn print_highlighted(stdout: &mut StandardStream, content: &str, start: usize, end: usize) -> io::Result<()> {
    let bytes = content.as_bytes();
    let safe_start = floor_char_boundary(content, start.min(bytes.len()));
    let safe_end = floor_char_boundary(content, end.min(bytes.len())).max(safe_start);

    if safe_start > 0 {
        write!(stdout, "{}", &content[..safe_start])?;
    }

    if safe_end > safe_start {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
        write!(stdout, "{}", &content[safe_start..safe_end])?;
        stdout.reset()?;
    }

    if safe_end < content.len() {
        write!(stdout, "{}", &content[safe_end..])?;
    }

    writeln!(stdout)
}

fn floor_char_boundary(s: &str, mut index: usize) -> usize {
    while index > 0 && !s.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Print only filenames (for -l flag)
pub fn print_files_only(matches: &[FileMatch], color: ColorMode) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color.choice());
    let mut seen_files = std::collections::HashSet::new();

    for m in matches {
        if seen_files.insert(m.path.as_path()) {
            stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
            writeln!(stdout, "{}", m.path.display())?;
            stdout.reset()?;
        }
    }

    Ok(())
}

/// Print match count per file (for -c flag)
pub fn print_match_counts(matches: &[FileMatch], color: ColorMode) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color.choice());

    for (path, count) in match_counts(matches) {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", path.display())?;
        stdout.reset()?;
        write!(stdout, ":")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        writeln!(stdout, "{}", count)?;
        stdout.reset()?;
    }

    Ok(())
}

/// Per-file match counts, sorted by path
pub fn match_counts(matches: &[FileMatch]) -> Vec<(&Path, usize)> {
    let mut counts: std::collections::BTreeMap<&Path, usize> = std::collections::BTreeMap::new();
    for m in matches {
        *counts.entry(&m.path).or_insert(0) += 1;
    }
    counts.into_iter().collect()
}

/// Result of searching an inline text
#[derive(Debug, Serialize)]
pub struct TextResult {
    pub algorithm: Algorithm,
    pub positions: Vec<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SearchStats>,
}

/// Print inline-text results, one line per algorithm
pub fn print_text_results(results: &[TextResult], color: ColorMode) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(color.choice());

    for result in results {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
        write!(stdout, "{}", result.algorithm.name())?;
        stdout.reset()?;

        let positions: Vec<String> = result.positions.iter().map(|p| p.to_string()).collect();
        writeln!(stdout, ": [{}]", positions.join(", "))?;

        if let Some(stats) = &result.stats {
            writeln!(
                stdout,
                "  comparisons={} windows={} hash_hits={} spurious_hits={}",
                stats.comparisons, stats.windows, stats.hash_hits, stats.spurious_hits
            )?;
        }
    }

    Ok(())
}

/// Write any serializable value as pretty JSON to stdout
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, value)?;
    writeln!(lock)
}

/// JSON shape for a file scan
#[derive(Debug, Serialize)]
pub struct JsonScan<'a> {
    pub algorithm: Algorithm,
    pub pattern: &'a str,
    #[serde(flatten)]
    pub report: &'a ScanReport,
}
