//! Generator registry and dispatcher
//!
//! The registry is a static catalogue of generator units keyed by output
//! language and logical name. The dispatcher selects units, validates the
//! coverage of every table they read, and only then runs them.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use log::{debug, info};
use thiserror::Error;

use crate::config::GeneratorOptions;
use crate::data::IsaData;
use crate::doc::{check_catalog, DocContext};
use crate::emit::Emitter;
use crate::error::{CoverageError, GenError, GenResult};
use crate::lang::{language, Language, TargetLanguage};
use crate::markup::TypeKeyTable;
use crate::output::{FileOutcome, FileStatus, Output, OutputMode};
use crate::symbols::SymbolGroup;
use crate::tables::IsaTables;

/// Everything a generator unit may read during a run
#[derive(Debug, Clone, Copy)]
pub struct GenContext<'a> {
    pub options: &'a GeneratorOptions,
    pub data: &'a IsaData,
    pub types: &'a TypeKeyTable,
    pub mode: OutputMode,
}

impl<'a> GenContext<'a> {
    pub fn docs(&self) -> DocContext<'a> {
        DocContext {
            types: self.types,
            catalog: &self.data.catalog,
        }
    }

    pub fn emitter<'s>(&'s self, lang: &'s dyn Language) -> Emitter<'s> {
        Emitter::new(lang, self.docs())
    }

    pub fn output<'s>(&'s self, lang: &'s dyn Language) -> Output<'s> {
        Output::new(lang, self.mode).with_header(self.options.header.as_deref())
    }

    /// Look up a symbol group the unit depends on
    pub fn group(&self, name: &str) -> GenResult<&'a SymbolGroup> {
        Ok(self.data.catalog.group(name)?)
    }

    /// Directory receiving generated sources of `target`
    pub fn source_dir(&self, target: TargetLanguage) -> &'a Path {
        match target {
            TargetLanguage::Rust => &self.options.rust.dir,
            TargetLanguage::CSharp => &self.options.csharp.dir,
        }
    }

    /// Directory of the hand-written tests of `target`
    pub fn tests_dir(&self, target: TargetLanguage) -> &'a Path {
        match target {
            TargetLanguage::Rust => &self.options.rust.tests_dir,
            TargetLanguage::CSharp => &self.options.csharp.tests_dir,
        }
    }

    pub fn namespace(&self) -> &'a str {
        &self.options.csharp.namespace
    }
}

/// Keys of the rows of one data table
pub type KeysFn = fn(&IsaTables) -> Vec<&str>;

/// Symbols named by the rows of a unit's tables, as `(group, member)` pairs
pub type ReferencesFn = fn(&IsaTables) -> Vec<(&'static str, &str)>;

/// Generates the files of one unit; returns what happened to each file
pub type RunFn = fn(&GenContext<'_>, &dyn Language) -> GenResult<Vec<FileOutcome>>;

/// A unit's requirement that a data table covers an enumeration exactly
#[derive(Clone, Copy)]
pub struct Coverage {
    pub group: &'static str,
    pub table: &'static str,
    pub keys: KeysFn,
}

/// An immutable registration record
#[derive(Clone, Copy)]
pub struct GeneratorUnit {
    pub language: TargetLanguage,
    pub name: &'static str,
    pub coverage: Option<Coverage>,
    /// Row values that must resolve in other symbol groups
    pub references: Option<ReferencesFn>,
    /// Renders the documentation of catalogue symbols
    pub documented: bool,
    pub run: RunFn,
}

impl fmt::Debug for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coverage")
            .field("group", &self.group)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for GeneratorUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorUnit")
            .field("language", &self.language)
            .field("name", &self.name)
            .field("coverage", &self.coverage)
            .field("references", &self.references.is_some())
            .field("documented", &self.documented)
            .finish_non_exhaustive()
    }
}

/// Check that `keys` name every symbol of `group` exactly once
pub fn check_coverage(group: &SymbolGroup, table: &str, keys: &[&str]) -> Result<(), CoverageError> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for &key in keys {
        *counts.entry(key).or_default() += 1;
    }

    let mut symbols: Vec<_> = group.symbols().iter().collect();
    symbols.sort_by_key(|s| s.value);
    let count = |name: &str| counts.get(name).copied().unwrap_or(0);

    let mut seen = HashSet::new();
    let error = CoverageError {
        group: group.name.clone(),
        table: table.to_string(),
        missing: symbols
            .iter()
            .filter(|s| count(&s.name) == 0)
            .map(|s| s.name.clone())
            .collect(),
        duplicates: symbols
            .iter()
            .filter(|s| count(&s.name) > 1)
            .map(|s| s.name.clone())
            .collect(),
        unknown: keys
            .iter()
            .filter(|key| !group.contains(key) && seen.insert(**key))
            .map(|key| (*key).to_string())
            .collect(),
    };
    if error.is_empty() {
        Ok(())
    } else {
        Err(error)
    }
}

/// Which units a dispatch runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    /// Every unit of one language
    Language(TargetLanguage),
    /// One logical unit in every language
    Named(String),
    Unit {
        language: TargetLanguage,
        name: String,
    },
}

impl Selection {
    pub fn new(language: Option<TargetLanguage>, name: Option<&str>) -> Self {
        match (language, name) {
            (None, None) => Self::All,
            (Some(language), None) => Self::Language(language),
            (None, Some(name)) => Self::Named(name.to_string()),
            (Some(language), Some(name)) => Self::Unit {
                language,
                name: name.to_string(),
            },
        }
    }

    pub fn matches(&self, unit: &GeneratorUnit) -> bool {
        match self {
            Self::All => true,
            Self::Language(language) => unit.language == *language,
            Self::Named(name) => unit.name == name,
            Self::Unit { language, name } => unit.language == *language && unit.name == name,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::All => "all units".to_string(),
            Self::Language(language) => language.to_string(),
            Self::Named(name) => name.clone(),
            Self::Unit { language, name } => format!("{language}/{name}"),
        }
    }
}

/// A failed dispatch
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("no generator unit matches `{0}`")]
    UnknownUnit(String),

    #[error("generator {language}/{unit} failed: {source}")]
    Unit {
        language: TargetLanguage,
        unit: &'static str,
        #[source]
        source: GenError,
    },
}

impl DispatchError {
    /// Name of the error kind for reports
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownUnit(_) => "UnknownUnit",
            Self::Unit { source, .. } => source.kind(),
        }
    }

    fn unit(unit: &GeneratorUnit, source: GenError) -> Self {
        Self::Unit {
            language: unit.language,
            unit: unit.name,
            source,
        }
    }
}

/// Files produced by one unit
#[derive(Debug, Clone)]
pub struct UnitReport {
    pub language: TargetLanguage,
    pub unit: &'static str,
    pub files: Vec<FileOutcome>,
}

/// Outcome of a dispatch
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub units: Vec<UnitReport>,
}

impl RunReport {
    pub fn files(&self) -> impl Iterator<Item = &FileOutcome> {
        self.units.iter().flat_map(|u| u.files.iter())
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.files().filter(|f| f.status == status).count()
    }

    pub fn stale(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files().filter(|f| f.status == FileStatus::Stale)
    }

    /// Returns true if nothing is out of date
    pub fn is_clean(&self) -> bool {
        self.stale().next().is_none()
    }
}

/// The catalogue of generator units
#[derive(Debug, Clone, Default)]
pub struct Registry {
    units: Vec<GeneratorUnit>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in unit for every language
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        crate::units::register_builtin(&mut registry);
        registry
    }

    /// Add a unit; a (language, name) pair may only be registered once
    pub fn register(&mut self, unit: GeneratorUnit) {
        debug_assert!(
            !self
                .units
                .iter()
                .any(|u| u.language == unit.language && u.name == unit.name),
            "generator unit {}/{} is registered twice",
            unit.language,
            unit.name
        );
        self.units.push(unit);
    }

    pub fn units(&self) -> &[GeneratorUnit] {
        &self.units
    }

    /// Units matched by `selection`, in registration order
    pub fn select(&self, selection: &Selection) -> Result<Vec<&GeneratorUnit>, DispatchError> {
        let selected: Vec<_> = self.units.iter().filter(|u| selection.matches(u)).collect();
        if selected.is_empty() {
            return Err(DispatchError::UnknownUnit(selection.describe()));
        }
        Ok(selected)
    }

    /// Validate coverage, row references and documentation for every
    /// selected unit, then run them
    ///
    /// Nothing is written when any of these checks fails.
    pub fn dispatch(
        &self,
        ctx: &GenContext<'_>,
        selection: &Selection,
    ) -> Result<RunReport, DispatchError> {
        let selected = self.select(selection)?;

        let mut checked = HashSet::new();
        for unit in &selected {
            let Some(coverage) = unit.coverage else {
                continue;
            };
            if checked.insert((coverage.group, coverage.table)) {
                debug!("checking coverage of {} by {}", coverage.group, coverage.table);
                validate(ctx, &coverage).map_err(|err| DispatchError::unit(unit, err))?;
            }
        }

        for unit in &selected {
            if let Some(references) = unit.references {
                debug!("checking references of {}/{}", unit.language, unit.name);
                check_references(ctx, references)
                    .map_err(|err| DispatchError::unit(unit, err))?;
            }
        }

        if let Some(unit) = selected.iter().find(|u| u.documented) {
            debug!("checking documentation of {} symbol groups", ctx.data.catalog.len());
            check_catalog(ctx.docs()).map_err(|err| DispatchError::unit(unit, err))?;
        }

        let mut report = RunReport::default();
        for unit in selected {
            info!("running {}/{}", unit.language, unit.name);
            let files = (unit.run)(ctx, language(unit.language))
                .map_err(|err| DispatchError::unit(unit, err))?;
            report.units.push(UnitReport {
                language: unit.language,
                unit: unit.name,
                files,
            });
        }
        Ok(report)
    }
}

fn validate(ctx: &GenContext<'_>, coverage: &Coverage) -> GenResult<()> {
    let group = ctx.group(coverage.group)?;
    let keys = (coverage.keys)(&ctx.data.tables);
    check_coverage(group, coverage.table, &keys)?;
    Ok(())
}

fn check_references(ctx: &GenContext<'_>, references: ReferencesFn) -> GenResult<()> {
    for (group, member) in references(&ctx.data.tables) {
        ctx.data.catalog.resolve(group, member)?;
    }
    Ok(())
}
