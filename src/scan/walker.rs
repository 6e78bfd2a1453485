use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A file selected for scanning
#[derive(Debug, Clone)]
pub struct ScanTarget {
    /// Path used to open the file
    pub full_path: PathBuf,
    /// Path shown in results
    pub display_path: PathBuf,
}

/// Compile an optional glob filter
pub fn compile_glob(glob: Option<&str>) -> Result<Option<GlobMatcher>> {
    glob.map(|g| {
        Glob::new(g)
            .map(|glob| glob.compile_matcher())
            .with_context(|| format!("Invalid glob: {}", g))
    })
    .transpose()
}

/// Expand `root` into the files to scan.
///
/// A file root is returned as-is (the glob does not apply to explicitly named
/// files). A directory is walked honouring `.gitignore`, skipping hidden
/// entries and common build directories.
pub fn collect_targets(root: &Path, glob: Option<&GlobMatcher>) -> Result<Vec<ScanTarget>> {
    let metadata = root
        .metadata()
        .with_context(|| format!("{}: cannot access", root.display()))?;

    if metadata.is_file() {
        return Ok(vec![ScanTarget {
            full_path: root.to_path_buf(),
            display_path: root.to_path_buf(),
        }]);
    }

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            // Skip common non-source directories
            !matches!(
                name.as_ref(),
                ".git" | "node_modules" | "target" | "__pycache__" | ".venv" | "venv"
            )
        })
        .build();

    let mut targets: Vec<ScanTarget> = walker
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let full_path = entry.into_path();
            let rel_path = full_path.strip_prefix(root).ok()?.to_path_buf();
            if let Some(matcher) = glob {
                let name_matches = rel_path
                    .file_name()
                    .is_some_and(|name| matcher.is_match(name));
                if !name_matches && !matcher.is_match(&rel_path) {
                    return None;
                }
            }
            let display_path = if root == Path::new(".") {
                rel_path
            } else {
                full_path.clone()
            };
            Some(ScanTarget {
                full_path,
                display_path,
            })
        })
        .collect();

    targets.sort_by(|a, b| a.display_path.cmp(&b.display_path));
    Ok(targets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_compile_glob() {
        assert!(compile_glob(None).unwrap().is_none());
        let matcher = compile_glob(Some("*.rs")).unwrap().unwrap();
        assert!(matcher.is_match("main.rs"));
        assert!(!matcher.is_match("main.py"));
        assert!(compile_glob(Some("[")).is_err());
    }

    #[test]
    fn test_collect_targets_walks_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "fn a() {}").unwrap();
        fs::write(dir.path().join("b.txt"), "text").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.rs"), "fn c() {}").unwrap();
        fs::create_dir(dir.path().join("target")).unwrap();
        fs::write(dir.path().join("target").join("skip.rs"), "fn skip() {}").unwrap();

        let all = collect_targets(dir.path(), None).unwrap();
        assert_eq!(all.len(), 3);

        let glob = compile_glob(Some("*.rs")).unwrap();
        let rust = collect_targets(dir.path(), glob.as_ref()).unwrap();
        let names: Vec<_> = rust
            .iter()
            .map(|t| t.full_path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.rs", "c.rs"]);
    }

    #[test]
    fn test_collect_targets_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("only.txt");
        fs::write(&file, "content").unwrap();

        let targets = collect_targets(&file, compile_glob(Some("*.rs")).unwrap().as_ref()).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].display_path, file);
    }

    #[test]
    fn test_collect_targets_missing_path() {
        let err = collect_targets(Path::new("/definitely/not/here"), None).unwrap_err();
        assert_eq!(err.to_string(), "/definitely/not/here: cannot access");

        let io_err = err.root_cause().downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io_err.kind(), std::io::ErrorKind::NotFound);
    }
}
