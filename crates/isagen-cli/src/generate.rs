//! Implementation of the `isagen generate` and `isagen check` commands.

use anyhow::{Context, Result};
use isagen_core::{
    DispatchError, FileStatus, GenContext, GeneratorOptions, IsaData, OutputMode, Registry, RunReport,
    Selection, TargetLanguage, TypeKeyTable,
};
use log::info;
use std::path::Path;

/// Load the configuration and metadata, then dispatch the selected units.
///
/// Returns `Ok(false)` when a unit failed or, in check mode, when any
/// generated file is out of date.
pub fn run(
    config: &Path,
    lang: Option<TargetLanguage>,
    unit: Option<&str>,
    mode: OutputMode,
) -> Result<bool> {
    let options = load_options(config)?;
    let data = IsaData::load(&options.data)
        .with_context(|| format!("failed to load metadata from '{}'", options.data.display()))?;
    let types = TypeKeyTable::standard();
    info!(
        "loaded {} symbol groups from {}",
        data.catalog.len(),
        options.data.display()
    );

    let ctx = GenContext {
        options: &options,
        data: &data,
        types: &types,
        mode,
    };
    let selection = Selection::new(lang, unit);

    match Registry::builtin().dispatch(&ctx, &selection) {
        Ok(report) => Ok(print_report(&report, mode)),
        Err(err) => {
            report_failure(&err);
            Ok(false)
        }
    }
}

/// An explicit `--config` must exist; the default file is optional.
fn load_options(config: &Path) -> Result<GeneratorOptions> {
    if config.exists() {
        return GeneratorOptions::load(config)
            .with_context(|| format!("failed to load '{}'", config.display()));
    }
    if config == Path::new(isagen_core::CONFIG_FILE) {
        let cwd = std::env::current_dir().context("failed to read current directory")?;
        return Ok(GeneratorOptions::default().rooted_at(&cwd));
    }
    anyhow::bail!("config file '{}' not found", config.display())
}

fn report_failure(err: &DispatchError) {
    eprintln!("[{}] {err}", err.kind());
}

fn print_report(report: &RunReport, mode: OutputMode) -> bool {
    match mode {
        OutputMode::Write => {
            for file in report.files().filter(|f| f.status.is_write()) {
                println!("  {:<9} {}", file.status, file.path.display());
            }
            println!(
                "{} units: {} created, {} updated, {} unchanged",
                report.units.len(),
                report.count(FileStatus::Created),
                report.count(FileStatus::Updated),
                report.count(FileStatus::Unchanged),
            );
            true
        }
        OutputMode::Check => {
            let stale: Vec<_> = report.stale().collect();
            if stale.is_empty() {
                println!("{} units: all generated files are up to date", report.units.len());
                return true;
            }
            println!("Out of date:");
            for file in &stale {
                println!("  {}", file.path.display());
            }
            println!("Run `isagen generate` to update {} file(s).", stale.len());
            false
        }
    }
}
