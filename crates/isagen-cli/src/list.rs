//! Implementation of the `isagen list` command.

use isagen_core::{Registry, TargetLanguage};

pub fn print_units(lang: Option<TargetLanguage>) {
    let registry = Registry::builtin();
    for unit in registry
        .units()
        .iter()
        .filter(|u| lang.is_none() || lang == Some(u.language))
    {
        match unit.coverage {
            Some(coverage) => println!(
                "{}/{:<18} covers {} by {}",
                unit.language, unit.name, coverage.group, coverage.table
            ),
            None => println!("{}/{}", unit.language, unit.name),
        }
    }
}
