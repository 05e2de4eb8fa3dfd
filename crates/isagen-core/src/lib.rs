//! isagen core - source generator for instruction-set metadata
//!
//! This crate provides the generation pipeline:
//! - Data: symbol groups and data tables loaded from `isa.toml`
//! - Markup: tokenizer for documentation strings
//! - Doc: rendering of markup into native doc comments
//! - Lang: identifier policy and syntax of each output language
//! - Emit: table-driven declarations
//! - Output: whole-file writer and region file patcher
//! - Registry: generator units, coverage validation and dispatch

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration file handling
pub mod config;

/// Instruction-set metadata loading
pub mod data;

/// Doc comment rendering
pub mod doc;

/// Table-driven emitters
pub mod emit;

/// Error types shared by the pipeline
pub mod error;

/// Output languages
pub mod lang;

/// Documentation markup tokenizer
pub mod markup;

/// Whole-file writer and region patcher
pub mod output;

/// Generator registry and dispatcher
pub mod registry;

pub mod symbols;

pub mod tables;

/// Test utilities - sample metadata and generation trees
pub mod testutil;

/// Built-in generator units
pub mod units;

pub mod writer;

pub use config::{GeneratorOptions, CONFIG_FILE};
pub use data::IsaData;
pub use error::{GenError, GenResult};
pub use lang::{language, Language, TargetLanguage};
pub use markup::TypeKeyTable;
pub use output::{FileOutcome, FileStatus, OutputMode};
pub use registry::{DispatchError, GenContext, Registry, RunReport, Selection};
