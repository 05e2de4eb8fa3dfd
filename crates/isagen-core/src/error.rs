//! Error types shared by the generation pipeline
//!
//! Every error in here is fatal for a generation run. The inputs are static
//! data owned by the same build, so a failure points at a defect in a table or
//! a documentation string and is never retried.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::data::DataError;
use crate::markup::MarkupError;

/// Result type used throughout the generator
pub type GenResult<T> = Result<T, GenError>;

/// Any failure that aborts a generation run
#[derive(Error, Debug)]
pub enum GenError {
    #[error(transparent)]
    Coverage(#[from] CoverageError),

    #[error(transparent)]
    Markup(#[from] MarkupError),

    #[error(transparent)]
    Region(#[from] RegionError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("value {value} of `{symbol}` does not fit in `{ty}`")]
    ValueOutOfRange {
        symbol: String,
        value: u32,
        ty: &'static str,
    },

    /// A documentation string of `symbol` failed to tokenize or render
    #[error("documentation of `{symbol}`: {source}")]
    Documentation {
        symbol: String,
        #[source]
        source: Box<GenError>,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GenError {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the documented symbol to a markup or reference failure
    #[must_use]
    pub fn in_documentation_of(self, symbol: &str) -> Self {
        Self::Documentation {
            symbol: symbol.to_string(),
            source: Box::new(self),
        }
    }

    /// Name of the error kind, used when reporting a failed unit
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Coverage(_) => "CoverageError",
            Self::Markup(_) => "MarkupError",
            Self::Region(_) => "RegionError",
            Self::Reference(_) => "ReferenceError",
            Self::Data(_) => "DataError",
            Self::ValueOutOfRange { .. } => "ValueOutOfRange",
            Self::Documentation { source, .. } => source.kind(),
            Self::Io { .. } => "IoError",
        }
    }

    /// The innermost error, looking through documentation context
    pub fn root(&self) -> &GenError {
        match self {
            Self::Documentation { source, .. } => source.root(),
            other => other,
        }
    }
}

/// A data table does not cover an enumeration exactly once per symbol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageError {
    /// The enumeration that must be covered
    pub group: String,
    /// The data table that was checked
    pub table: String,
    /// Symbols without a row, in ordinal order
    pub missing: Vec<String>,
    /// Symbols with more than one row
    pub duplicates: Vec<String>,
    /// Row keys that are not members of the enumeration
    pub unknown: Vec<String>,
}

impl CoverageError {
    /// Returns true if the checked table matched the enumeration
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty() && self.unknown.is_empty()
    }
}

impl fmt::Display for CoverageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "table `{}` does not cover enumeration `{}`",
            self.table, self.group
        )?;
        let sections = [
            ("missing", &self.missing),
            ("duplicated", &self.duplicates),
            ("unknown", &self.unknown),
        ];
        for (label, names) in sections {
            if !names.is_empty() {
                write!(f, "; {label}: {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for CoverageError {}

/// Why a named region could not be patched
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionErrorKind {
    #[error("begin marker not found")]
    NotFound,
    #[error("marker appears more than once")]
    Ambiguous,
    #[error("no end marker after the begin marker")]
    Unterminated,
}

/// A region could not be located in its target file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("region `{region}` in {}: {kind}", .path.display())]
pub struct RegionError {
    pub path: PathBuf,
    pub region: String,
    pub kind: RegionErrorKind,
}

/// A symbol reference names something the catalogue does not contain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error("unknown symbol group `{0}`")]
    UnknownGroup(String),

    #[error("symbol group `{group}` has no member `{member}`")]
    UnknownMember { group: String, member: String },
}
