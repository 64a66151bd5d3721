//! Packaging of filtered source trees into a zip archive
//!
//! This module handles:
//! - Walking each filter's `base_path/relative_path` subtree
//! - Selecting files by base-name globs (see [`filter`])
//! - Writing them under archive-relative names with a bounded copy (see [`copy`])
//!
//! All filters of a deployment write into one archive which is finished
//! exactly once.

pub mod copy;
pub mod filter;

use std::collections::HashSet;
use std::fmt::Display;
use std::fs::{self, File, Metadata};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::Filter;
use crate::error::{LapdError, Result};
use crate::progress::ProgressReporter;
use copy::{CopyError, SINGLE_FILE_BYTE_LIMIT, copy_bounded};
use filter::NameFilter;

/// Interpreter bytecode caches never shipped
const PYCACHE_DIR: &str = "__pycache__";

/// Files at least this large need zip64 extensions
const LARGE_FILE_THRESHOLD: u64 = u32::MAX as u64;

/// What was written to the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Local path of the archive
    pub path: PathBuf,
    /// Number of files packaged
    pub entries: usize,
    /// Uncompressed bytes packaged
    pub bytes: u64,
    /// Size of the finished archive on disk
    pub size: u64,
}

/// Build the archive at `output` from `filters`
pub fn build_archive(
    filters: &[Filter],
    output: &Path,
    progress: &mut dyn ProgressReporter,
) -> Result<ArchiveSummary> {
    build_archive_with_limit(filters, output, SINGLE_FILE_BYTE_LIMIT, progress)
}

fn build_archive_with_limit(
    filters: &[Filter],
    output: &Path,
    limit: u64,
    progress: &mut dyn ProgressReporter,
) -> Result<ArchiveSummary> {
    ensure_parent_dir(output)?;

    let file = File::create(output).map_err(|e| archive_failed(output, e))?;
    let resolved = dunce::canonicalize(output).map_err(|e| archive_failed(output, e))?;
    let mut writer = ArchiveWriter {
        zip: ZipWriter::new(file),
        path: output.to_path_buf(),
        resolved,
        seen: HashSet::new(),
        entries: 0,
        bytes: 0,
        limit,
    };

    let result = filters
        .iter()
        .try_for_each(|filter| writer.add_filter(filter, progress))
        .and_then(|()| writer.finish());

    match result {
        Ok(_) => progress.finish(),
        Err(_) => progress.abandon(),
    }
    result
}

/// Archive-relative name of `path`: `base` removed, `/` separated
///
/// Only normal components are kept, so entries can never point outside the
/// extraction directory. `None` if a component is not valid UTF-8.
pub fn archive_entry_name(path: &Path, base: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let parts = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_str()),
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

fn is_pycache(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name() == PYCACHE_DIR
}

fn ensure_parent_dir(output: &Path) -> Result<()> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent).map_err(|e| LapdError::DirCreateFailed {
                path: parent.display().to_string(),
                reason: e.to_string(),
            })
        }
        _ => Ok(()),
    }
}

fn archive_failed(path: &Path, reason: impl Display) -> LapdError {
    LapdError::ArchiveFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

struct ArchiveWriter {
    zip: ZipWriter<File>,
    path: PathBuf,
    /// Canonical form of `path`, never read back into the archive
    resolved: PathBuf,
    seen: HashSet<String>,
    entries: usize,
    bytes: u64,
    limit: u64,
}

impl ArchiveWriter {
    fn add_filter(&mut self, filter: &Filter, progress: &mut dyn ProgressReporter) -> Result<()> {
        let (include, exclude) = filter
            .compile()
            .map_err(|message| LapdError::ConfigInvalid { message })?;
        let names = NameFilter::new(include, exclude);

        let base = Path::new(&filter.base_path);
        let root = base.join(&filter.relative_path);
        info!(root = %root.display(), "adding files");
        progress.start_filter(&root.display().to_string());

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_pycache(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().map(|p| p.display().to_string());
                    warn!(path = ?path, "skipping unreadable entry: {err}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if !names.should_include(&entry.file_name().to_string_lossy()) {
                continue;
            }
            if self.is_output(entry.path()) {
                debug!(path = %entry.path().display(), "skipping the archive being written");
                continue;
            }

            let entry_name = archive_entry_name(entry.path(), base).ok_or_else(|| {
                LapdError::FileReadFailed {
                    path: entry.path().display().to_string(),
                    reason: "file name is not valid UTF-8".to_string(),
                }
            })?;
            self.add_file(entry.path(), &entry_name)?;
            progress.add_file(&entry_name);
        }

        Ok(())
    }

    fn is_output(&self, path: &Path) -> bool {
        path.file_name() == self.resolved.file_name()
            && dunce::canonicalize(path).is_ok_and(|p| p == self.resolved)
    }

    fn add_file(&mut self, source: &Path, entry_name: &str) -> Result<()> {
        if !self.seen.insert(entry_name.to_string()) {
            return Err(LapdError::ArchiveEntryCollision {
                entry: entry_name.to_string(),
                source_path: source.display().to_string(),
            });
        }

        let read_failed = |e: std::io::Error| LapdError::FileReadFailed {
            path: source.display().to_string(),
            reason: e.to_string(),
        };
        let mut file = File::open(source).map_err(read_failed)?;
        let metadata = file.metadata().map_err(read_failed)?;

        self.zip
            .start_file(entry_name, entry_options(&metadata))
            .map_err(|e| archive_failed(&self.path, e))?;

        let copied = copy_bounded(&mut file, &mut self.zip, self.limit).map_err(|e| match e {
            CopyError::TooLarge { limit } => LapdError::FileTooLarge {
                path: source.display().to_string(),
                limit,
            },
            CopyError::Read(e) => read_failed(e),
            CopyError::Write(e) => archive_failed(&self.path, e),
        })?;

        debug!(entry = entry_name, bytes = copied, "added file");
        self.entries += 1;
        self.bytes += copied;
        Ok(())
    }

    fn finish(mut self) -> Result<ArchiveSummary> {
        let file = self
            .zip
            .finish()
            .map_err(|e| archive_failed(&self.path, e))?;
        let size = file
            .metadata()
            .map_err(|e| archive_failed(&self.path, e))?
            .len();
        drop(file);

        info!(
            path = %self.path.display(),
            entries = self.entries,
            bytes = self.bytes,
            size,
            "archive written"
        );
        Ok(ArchiveSummary {
            path: self.path,
            entries: self.entries,
            bytes: self.bytes,
            size,
        })
    }
}

fn entry_options(metadata: &Metadata) -> FileOptions {
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .large_file(metadata.len() >= LARGE_FILE_THRESHOLD);
    with_permissions(options, metadata)
}

#[cfg(unix)]
fn with_permissions(options: FileOptions, metadata: &Metadata) -> FileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn with_permissions(options: FileOptions, _metadata: &Metadata) -> FileOptions {
    options
}
