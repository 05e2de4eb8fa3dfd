//! Generator configuration (`isagen.toml`)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "isagen.toml";

/// Errors that can occur when loading the configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The complete isagen.toml configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorOptions {
    /// Instruction-set metadata file
    #[serde(default = "default_data")]
    pub data: PathBuf,

    /// Lines placed at the top of every whole generated file
    #[serde(default)]
    pub header: Option<String>,

    #[serde(default)]
    pub rust: RustOptions,

    #[serde(default)]
    pub csharp: CSharpOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RustOptions {
    /// Source directory receiving generated modules
    #[serde(default = "default_rust_dir")]
    pub dir: PathBuf,

    /// Directory of the hand-written test sources with generated regions
    #[serde(default = "default_rust_tests_dir", rename = "tests-dir")]
    pub tests_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CSharpOptions {
    #[serde(default = "default_csharp_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_csharp_tests_dir", rename = "tests-dir")]
    pub tests_dir: PathBuf,

    /// Namespace of every generated declaration
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_data() -> PathBuf {
    PathBuf::from("isa.toml")
}

fn default_rust_dir() -> PathBuf {
    PathBuf::from("rust/src")
}

fn default_rust_tests_dir() -> PathBuf {
    PathBuf::from("rust/src/tests")
}

fn default_csharp_dir() -> PathBuf {
    PathBuf::from("csharp/Intel")
}

fn default_csharp_tests_dir() -> PathBuf {
    PathBuf::from("csharp/Intel.Tests")
}

fn default_namespace() -> String {
    "Isa.Intel".to_string()
}

impl Default for RustOptions {
    fn default() -> Self {
        Self {
            dir: default_rust_dir(),
            tests_dir: default_rust_tests_dir(),
        }
    }
}

impl Default for CSharpOptions {
    fn default() -> Self {
        Self {
            dir: default_csharp_dir(),
            tests_dir: default_csharp_tests_dir(),
            namespace: default_namespace(),
        }
    }
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            data: default_data(),
            header: None,
            rust: RustOptions::default(),
            csharp: CSharpOptions::default(),
        }
    }
}

impl GeneratorOptions {
    /// Parse a configuration; relative paths are resolved against `base_dir`
    pub fn parse(content: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(content)?;
        Ok(options.rooted_at(base_dir))
    }

    /// Load a configuration file; relative paths are resolved against its directory
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::parse(&content, base_dir)
    }

    /// Resolve every relative path against `base_dir`
    #[must_use]
    pub fn rooted_at(mut self, base_dir: &Path) -> Self {
        for path in [
            &mut self.data,
            &mut self.rust.dir,
            &mut self.rust.tests_dir,
            &mut self.csharp.dir,
            &mut self.csharp.tests_dir,
        ] {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
        self
    }
}
