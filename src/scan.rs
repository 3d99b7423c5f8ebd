//! Directory scanning around the per-file extractor.
//!
//! Files are collected with `walkdir`, then scanned in parallel with rayon.
//! A file that fails to read or lex is recorded in [`ScanReport::failures`]
//! and the batch carries on; only an internal lexer error stops it.

use crate::error::{ErrorKind, LexError, ScanError};
use crate::issue::Issue;
use crate::lexer::Family;
use rayon::prelude::*;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Bytes inspected when deciding whether a file is binary
const BINARY_PROBE_LEN: usize = 8 * 1024;

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Annotation to look for (default: "@TODO")
    pub annotation: String,
    /// Scan files with no known grammar using the `#` fallback
    pub attempt_default: bool,
    /// Descend into dot-files and dot-directories
    pub include_hidden: bool,
    /// Drop comments whose annotation already carries an issue number
    pub skip_reported: bool,
    /// Worker threads; `None` uses rayon's global pool
    pub jobs: Option<usize>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            annotation: "@TODO".to_string(),
            attempt_default: true,
            include_hidden: false,
            skip_reported: false,
            jobs: None,
        }
    }
}

/// Issues found by a scan plus the files that could not be scanned
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
    pub issues: Vec<Issue>,
    #[serde(serialize_with = "serialize_failures")]
    pub failures: Vec<ScanError>,
    pub files_scanned: usize,
    pub files_skipped: usize,
}

impl ScanReport {
    /// Issues keyed by file path, in path order
    pub fn group_by_file(&self) -> BTreeMap<&str, Vec<&Issue>> {
        let mut groups: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.file_path.as_str()).or_default().push(issue);
        }
        groups
    }
}

#[derive(Serialize)]
struct FailureRecord {
    path: String,
    message: String,
}

#[allow(clippy::ptr_arg)]
fn serialize_failures<S: Serializer>(
    failures: &Vec<ScanError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(failures.iter().map(|failure| FailureRecord {
        path: failure.path().display().to_string(),
        message: failure.to_string(),
    }))
}

enum FileOutcome {
    Scanned(Vec<Issue>),
    Skipped,
    Failed(ScanError),
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|name| name.starts_with('.'))
}

fn is_binary(bytes: &[u8]) -> bool {
    bytes.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}

/// Collect the regular files under `root`, sorted by name within each directory.
pub fn collect_files(root: &Path, options: &ScanOptions) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| options.include_hidden || entry.depth() == 0 || !is_hidden(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(DirEntry::into_path)
        .collect()
}

/// Extract issues from one file's bytes.
///
/// Fails with [`ErrorKind::UnsupportedLanguage`] when the path has no known
/// grammar and `attempt_default` is off.
pub fn scan_source(
    path: &Path,
    source: &[u8],
    options: &ScanOptions,
) -> Result<Vec<Issue>, LexError> {
    let family = Family::for_path(path);
    if family == Family::Default && !options.attempt_default {
        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        return Err(LexError::unsupported(extension).with_file(path.display().to_string()));
    }

    let comments = crate::extract(source, family, &options.annotation)
        .map_err(|err| err.with_file(path.display().to_string()))?;
    debug!(path = %path.display(), %family, comments = comments.len(), "scanned file");

    Ok(comments
        .into_iter()
        .filter(|comment| !(options.skip_reported && comment.is_reported()))
        .map(|comment| Issue::from_comment(comment, path, source))
        .collect())
}

fn scan_file(path: &Path, options: &ScanOptions) -> FileOutcome {
    let source = match fs::read(path) {
        Ok(source) => source,
        Err(source) => {
            return FileOutcome::Failed(ScanError::Io { path: path.to_path_buf(), source });
        }
    };
    if is_binary(&source) {
        debug!(path = %path.display(), "skipping binary file");
        return FileOutcome::Skipped;
    }

    match scan_source(path, &source, options) {
        Ok(issues) => FileOutcome::Scanned(issues),
        Err(error) if error.kind == ErrorKind::UnsupportedLanguage => {
            debug!(path = %path.display(), "no comment grammar, skipping");
            FileOutcome::Skipped
        }
        Err(error) if error.is_internal() => {
            FileOutcome::Failed(ScanError::Internal { path: path.to_path_buf(), error })
        }
        Err(error) => FileOutcome::Failed(ScanError::Lex { path: path.to_path_buf(), error }),
    }
}

/// Scan `paths` in parallel. Results keep the order of `paths`.
pub fn scan_paths(paths: &[PathBuf], options: &ScanOptions) -> Result<ScanReport, ScanError> {
    let run = || paths.par_iter().map(|path| scan_file(path, options)).collect::<Vec<_>>();
    let outcomes = match options.jobs {
        Some(jobs) => match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(run),
            Err(err) => {
                warn!(error = %err, jobs, "could not build thread pool, using the global pool");
                run()
            }
        },
        None => run(),
    };

    let mut report = ScanReport::default();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Scanned(issues) => {
                report.files_scanned += 1;
                report.issues.extend(issues);
            }
            FileOutcome::Skipped => report.files_skipped += 1,
            FileOutcome::Failed(failure @ ScanError::Internal { .. }) => return Err(failure),
            FileOutcome::Failed(failure) => {
                warn!(path = %failure.path().display(), error = %failure, "failed to scan file");
                report.failures.push(failure);
            }
        }
    }

    info!(
        issues = report.issues.len(),
        scanned = report.files_scanned,
        skipped = report.files_skipped,
        failed = report.failures.len(),
        "scan finished"
    );
    Ok(report)
}

/// Scan a single file or every file under a directory.
pub fn scan(root: &Path, options: &ScanOptions) -> Result<ScanReport, ScanError> {
    let paths = if root.is_file() {
        vec![root.to_path_buf()]
    } else {
        collect_files(root, options)
    };
    debug!(root = %root.display(), files = paths.len(), "collected files");
    scan_paths(&paths, options)
}
