//! Line-oriented output sink for generated code

/// Default indentation: one tab, as used by the generated sources
const INDENT: &str = "\t";

/// Accumulates generated lines with the current indentation
///
/// Blank lines never carry indentation, so output is stable whatever the
/// nesting level.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    /// Output buffer
    output: String,
    /// Current indentation level
    indent_level: usize,
    /// Text of one indentation level
    indent_unit: String,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::with_indent(INDENT)
    }

    /// Create a writer indenting with `unit` instead of a tab
    #[must_use]
    pub fn with_indent(unit: &str) -> Self {
        Self {
            output: String::new(),
            indent_level: 0,
            indent_unit: unit.to_string(),
        }
    }

    /// Write one line at the current indentation
    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if text.is_empty() {
            self.blank();
            return;
        }
        for _ in 0..self.indent_level {
            self.output.push_str(&self.indent_unit);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn blank(&mut self) {
        self.output.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Run `f` one level deeper
    pub fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.indent();
        let result = f(self);
        self.dedent();
        result
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}
