//! Writing generated code to disk
//!
//! Output goes either to a whole generated file or to a named region of a
//! hand-maintained file:
//!
//! ```text
//! fn to_access() -> HashMap<&'static str, OpAccess> {
//!     // GENERATOR-BEGIN: OpAccessDict
//!     ...replaced on every run...
//!     // GENERATOR-END: OpAccessDict
//! }
//! ```
//!
//! Files are only written when their content changes, through a temporary
//! file in the same directory that is persisted over the target. A failed
//! generation or patch leaves the target untouched.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use tempfile::NamedTempFile;

use crate::error::{GenError, GenResult, RegionError, RegionErrorKind};
use crate::lang::Language;
use crate::writer::CodeWriter;

/// Whether outputs are written or only compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Write,
    /// Compute every output, write nothing, report stale files
    Check,
}

/// What happened to one output file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Updated,
    Unchanged,
    /// Check mode only: the file differs from the generated content
    Stale,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
            Self::Stale => "stale",
        }
    }

    /// Returns true if the file was written
    pub fn is_write(self) -> bool {
        matches!(self, Self::Created | Self::Updated)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

pub fn begin_marker(comment: &str, region: &str) -> String {
    format!("{comment} GENERATOR-BEGIN: {region}")
}

pub fn end_marker(comment: &str, region: &str) -> String {
    format!("{comment} GENERATOR-END: {region}")
}

/// Location of a region's markers, as line indices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RegionSpan {
    begin: usize,
    end: usize,
}

fn locate_region(lines: &[&str], comment: &str, region: &str) -> Result<RegionSpan, RegionErrorKind> {
    let begin_marker = begin_marker(comment, region);
    let end_marker = end_marker(comment, region);
    let find = |marker: &str| -> Vec<usize> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.trim() == marker)
            .map(|(index, _)| index)
            .collect()
    };

    let begins = find(&begin_marker);
    let ends = find(&end_marker);
    let begin = match begins.as_slice() {
        [] => return Err(RegionErrorKind::NotFound),
        [begin] => *begin,
        _ => return Err(RegionErrorKind::Ambiguous),
    };
    match ends.as_slice() {
        [] => Err(RegionErrorKind::Unterminated),
        [end] if *end > begin => Ok(RegionSpan { begin, end: *end }),
        [_] => Err(RegionErrorKind::Unterminated),
        _ => Err(RegionErrorKind::Ambiguous),
    }
}

/// Replace the body of `region` in `content`, leaving everything else as is
///
/// The body is indented with the begin marker's indentation and written with
/// its line ending.
pub fn patch_region(
    content: &str,
    comment: &str,
    region: &str,
    body: &str,
) -> Result<String, RegionErrorKind> {
    let lines: Vec<&str> = content.split_inclusive('\n').collect();
    let span = locate_region(&lines, comment, region)?;
    Ok(splice(&lines, span, body))
}

fn splice(lines: &[&str], span: RegionSpan, body: &str) -> String {
    let marker = lines[span.begin];
    let indent = &marker[..marker.len() - marker.trim_start().len()];
    let newline = if marker.ends_with("\r\n") { "\r\n" } else { "\n" };

    let mut out = String::with_capacity(lines.iter().map(|l| l.len()).sum::<usize>() + body.len());
    for line in &lines[..=span.begin] {
        out.push_str(line);
    }
    for line in body.lines() {
        if !line.is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push_str(newline);
    }
    for line in &lines[span.end..] {
        out.push_str(line);
    }
    out
}

fn read_existing(path: &Path) -> GenResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(GenError::io(path, err)),
    }
}

/// Replace `path` with `content` through a temporary file next to it
fn persist(path: &Path, content: &str) -> GenResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| GenError::io(dir, err))?;
    let mut file = NamedTempFile::new_in(dir).map_err(|err| GenError::io(dir, err))?;
    file.write_all(content.as_bytes())
        .map_err(|err| GenError::io(file.path(), err))?;
    // a replaced file keeps its permissions
    match fs::metadata(path) {
        Ok(existing) => fs::set_permissions(file.path(), existing.permissions())
            .map_err(|err| GenError::io(file.path(), err))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(GenError::io(path, err)),
    }
    file.persist(path)
        .map_err(|err| GenError::io(path, err.error))?;
    Ok(())
}

/// Write `content` to `path` unless it is already there
pub fn write_file(path: &Path, content: &str, mode: OutputMode) -> GenResult<FileOutcome> {
    let existing = read_existing(path)?;
    let status = match (existing, mode) {
        (Some(old), _) if old == content => FileStatus::Unchanged,
        (_, OutputMode::Check) => FileStatus::Stale,
        (existing, OutputMode::Write) => {
            persist(path, content)?;
            if existing.is_some() {
                FileStatus::Updated
            } else {
                FileStatus::Created
            }
        }
    };
    Ok(outcome(path, status))
}

fn outcome(path: &Path, status: FileStatus) -> FileOutcome {
    if status == FileStatus::Stale {
        warn!("{} is out of date", path.display());
    } else {
        debug!("{}: {status}", path.display());
    }
    FileOutcome {
        path: path.to_path_buf(),
        status,
    }
}

/// Where and how one generator unit writes its output
#[derive(Clone, Copy)]
pub struct Output<'a> {
    pub lang: &'a dyn Language,
    pub mode: OutputMode,
    /// Header lines placed at the top of whole generated files
    pub header: Option<&'a str>,
}

impl<'a> Output<'a> {
    pub fn new(lang: &'a dyn Language, mode: OutputMode) -> Self {
        Self {
            lang,
            mode,
            header: None,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: Option<&'a str>) -> Self {
        self.header = header;
        self
    }

    /// Generate a complete file
    pub fn whole_file(
        &self,
        path: &Path,
        generate: impl FnOnce(&mut CodeWriter) -> GenResult<()>,
    ) -> GenResult<FileOutcome> {
        let mut w = CodeWriter::new();
        self.lang.write_file_header(&mut w, self.header);
        generate(&mut w)?;
        write_file(path, w.as_str(), self.mode)
    }

    /// Regenerate the body of `region` in an existing file
    ///
    /// The markers are validated before `generate` runs; the generator only
    /// sees its own writer.
    pub fn region(
        &self,
        path: &Path,
        region: &str,
        generate: impl FnOnce(&mut CodeWriter) -> GenResult<()>,
    ) -> GenResult<FileOutcome> {
        let region_error = |kind| RegionError {
            path: path.to_path_buf(),
            region: region.to_string(),
            kind,
        };
        let content = read_existing(path)?.ok_or_else(|| region_error(RegionErrorKind::NotFound))?;
        let lines: Vec<&str> = content.split_inclusive('\n').collect();
        let span = locate_region(&lines, self.lang.line_comment(), region).map_err(region_error)?;
        debug!(
            "region {region} in {}: lines {}..{}",
            path.display(),
            span.begin + 1,
            span.end + 1
        );

        let mut w = CodeWriter::new();
        self.lang.write_region_notice(&mut w);
        generate(&mut w)?;
        let patched = splice(&lines, span, w.as_str());

        let status = if patched == content {
            FileStatus::Unchanged
        } else if self.mode == OutputMode::Check {
            FileStatus::Stale
        } else {
            persist(path, &patched)?;
            FileStatus::Updated
        };
        Ok(outcome(path, status))
    }
}
