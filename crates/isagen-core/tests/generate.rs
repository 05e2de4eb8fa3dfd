//! End-to-end generation runs against a temporary output tree

use std::fs;
use std::path::{Path, PathBuf};

use isagen_core::tables::DictEntry;
use isagen_core::testutil;
use isagen_core::{
    DispatchError, FileStatus, GenContext, GeneratorOptions, IsaData, OutputMode, Registry,
    RunReport, Selection, TypeKeyTable,
};
use tempfile::TempDir;

struct Tree {
    _dir: TempDir,
    options: GeneratorOptions,
    types: TypeKeyTable,
}

impl Tree {
    fn new(data: &IsaData) -> Self {
        let dir = TempDir::new().unwrap();
        let options = testutil::options_in(dir.path());
        testutil::write_region_files(&options, data).unwrap();
        Self {
            _dir: dir,
            options,
            types: TypeKeyTable::standard(),
        }
    }

    fn run(&self, data: &IsaData, mode: OutputMode) -> Result<RunReport, DispatchError> {
        let ctx = GenContext {
            options: &self.options,
            data,
            types: &self.types,
            mode,
        };
        Registry::builtin().dispatch(&ctx, &Selection::All)
    }

    fn rust(&self, name: &str) -> PathBuf {
        self.options.rust.dir.join(name)
    }

    fn csharp(&self, name: &str) -> PathBuf {
        self.options.csharp.dir.join(name)
    }

    fn dicts(&self) -> PathBuf {
        self.options.csharp.tests_dir.join("InstructionInfoConstants.cs")
    }
}

fn bundled_isa() -> IsaData {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/isa.toml");
    IsaData::load(&path).unwrap()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

/// Lines outside the `Dicts` markers
fn outside_region(content: &str) -> Vec<&str> {
    let mut inside = false;
    let mut lines = Vec::new();
    for line in content.lines() {
        if line.contains("GENERATOR-END: Dicts") {
            inside = false;
        }
        if !inside {
            lines.push(line);
        }
        if line.contains("GENERATOR-BEGIN: Dicts") {
            inside = true;
        }
    }
    lines
}

#[test]
fn test_bundled_data_generates_every_unit() {
    let data = bundled_isa();
    let tree = Tree::new(&data);

    let report = tree.run(&data, OutputMode::Write).unwrap();
    assert_eq!(report.units.len(), 12);
    assert_eq!(report.count(FileStatus::Stale), 0);

    let op_counts = read(&tree.csharp("InstructionOpCounts.g.cs"));
    assert!(op_counts.contains("\t\t\t3,// EVEX_Vaddps_zmm_k1z_zmm_zmmm512b32_er\n"));

    let sizes = read(&tree.rust("instruction_memory_sizes.rs"));
    assert!(sizes.contains("pub(crate) static SIZES_NORMAL: [u8; IsaConstants::NUMBER_OF_CODE_VALUES] = ["));
    assert!(sizes.contains("pub(crate) static SIZES_BCST: [u8; IsaConstants::NUMBER_OF_CODE_VALUES] = ["));

    let code = read(&tree.csharp("Code.g.cs"));
    assert!(code.contains("/// <c>ADD r/m8, r8</c>"));
    assert!(code.contains("/// Loads a <see cref=\"float\"/> and pushes it as an <c>float80</c>."));

    let flags = read(&tree.csharp("InstrOpInfoFlags.g.cs"));
    assert!(flags.starts_with("// This file was generated by isagen\n\nusing System;\n"));
    assert!(flags.contains("[Flags]"));
}

#[test]
fn test_second_run_changes_nothing() {
    let data = bundled_isa();
    let tree = Tree::new(&data);
    tree.run(&data, OutputMode::Write).unwrap();
    let before = read(&tree.rust("code.rs"));

    let report = tree.run(&data, OutputMode::Write).unwrap();
    assert!(report.files().all(|f| f.status == FileStatus::Unchanged));
    assert_eq!(read(&tree.rust("code.rs")), before);

    let check = tree.run(&data, OutputMode::Check).unwrap();
    assert!(check.is_clean());
}

#[test]
fn test_check_reports_hand_edited_region() {
    let data = testutil::sample_isa().unwrap();
    let tree = Tree::new(&data);
    tree.run(&data, OutputMode::Write).unwrap();

    let path = tree.rust("code.rs");
    let generated = read(&path);
    let tampered = generated.replace("Push_r32 = 2,", "Push_r32 = 3,");
    assert_ne!(tampered, generated);
    fs::write(&path, &tampered).unwrap();

    let check = tree.run(&data, OutputMode::Check).unwrap();
    let stale: Vec<_> = check.stale().map(|f| f.path.clone()).collect();
    assert_eq!(stale, vec![path.clone()]);
    assert!(!check.is_clean());
    assert_eq!(read(&path), tampered);

    let report = tree.run(&data, OutputMode::Write).unwrap();
    assert_eq!(report.count(FileStatus::Updated), 1);
    assert_eq!(read(&path), generated);
}

#[test]
fn test_coverage_defect_writes_nothing() {
    let mut data = testutil::sample_isa().unwrap();
    data.tables.op_counts.retain(|row| row.code != "Add_r8_rm8");
    let tree = Tree::new(&data);

    let err = tree.run(&data, OutputMode::Write).unwrap_err();
    assert_eq!(err.kind(), "CoverageError");
    let message = err.to_string();
    assert!(message.contains("Add_r8_rm8"), "{message}");

    assert!(!tree.rust("isaconstants.rs").exists());
    assert!(!tree.csharp("IsaConstants.g.cs").exists());
    assert_eq!(read(&tree.rust("code.rs")), testutil::region_file("Code", ""));
}

#[test]
fn test_unknown_type_key_writes_nothing() {
    let text = testutil::SAMPLE_ISA.replace("`PUSH r32`", "`PUSH r32` of a <q256>");
    let data = IsaData::parse(&text).unwrap();
    let tree = Tree::new(&data);

    let err = tree.run(&data, OutputMode::Write).unwrap_err();
    assert_eq!(err.kind(), "MarkupError");
    let DispatchError::Unit { unit, source, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*unit, "enums");
    assert!(source.to_string().contains("Push_r32"), "{source}");

    assert!(!tree.rust("isaconstants.rs").exists());
    assert_eq!(read(&tree.rust("code.rs")), testutil::region_file("Code", ""));
}

#[test]
fn test_unknown_row_reference_writes_nothing() {
    let text = testutil::SAMPLE_ISA.replace("memory = \"UInt32\"", "memory = \"UInt64\"");
    let data = IsaData::parse(&text).unwrap();
    let tree = Tree::new(&data);

    let err = tree.run(&data, OutputMode::Write).unwrap_err();
    assert_eq!(err.kind(), "ReferenceError");
    let DispatchError::Unit { unit, source, .. } = &err else {
        panic!("unexpected error: {err}");
    };
    assert_eq!(*unit, "memory-sizes");
    assert!(source.to_string().contains("UInt64"), "{source}");

    assert!(!tree.rust("isaconstants.rs").exists());
    assert!(!tree.csharp("IsaConstants.g.cs").exists());
    assert_eq!(read(&tree.rust("code.rs")), testutil::region_file("Code", ""));
}

#[test]
fn test_dicts_region_repatch_keeps_hand_written_lines() {
    let mut data = testutil::sample_isa().unwrap();
    let tree = Tree::new(&data);
    tree.run(&data, OutputMode::Write).unwrap();
    let first = read(&tree.dicts());
    assert!(first.contains("\t\t\t{ \"r\", OpAccess.Read },\n"));

    data.tables.op_access.push(DictEntry {
        key: "rw".to_string(),
        value: "Write".to_string(),
    });
    let report = tree.run(&data, OutputMode::Write).unwrap();
    let updated: Vec<_> = report
        .files()
        .filter(|f| f.status == FileStatus::Updated)
        .map(|f| f.path.clone())
        .collect();
    assert_eq!(updated, vec![
        tree.options.rust.tests_dir.join("test_parser.rs"),
        tree.dicts(),
    ]);

    let second = read(&tree.dicts());
    assert!(second.contains("\t\t\t{ \"rw\", OpAccess.Write },\n"));
    assert_eq!(outside_region(&first), outside_region(&second));
}
