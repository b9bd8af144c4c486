//! Lowers the IR line to a textual LLVM module.

pub mod escape;
#[cfg(feature = "llvm")]
pub mod native;

#[cfg(test)]
pub mod test;

pub use escape::{escape, unescape};

use crate::error::{Error, Result};
use crate::ir::OutputDirective;

use tracing::{debug, info};

use std::fs;
use std::path::Path;

/// The only external symbol a generated module references.
pub const OUTPUT_ROUTINE: &str = "puts";

pub struct ModuleWriter {
    triple: String,
    source_filename: String,
}

impl ModuleWriter {
    pub fn new(triple: impl Into<String>) -> Self {
        ModuleWriter {
            triple: triple.into(),
            source_filename: "scheil.scir".to_string(),
        }
    }

    pub fn with_source_filename(mut self, name: impl Into<String>) -> Self {
        self.source_filename = name.into();
        self
    }

    /// A module whose `main` prints `directive.text` and returns 0.
    ///
    /// The text is stored as one private constant of `len + 1` bytes
    /// (trailing NUL) and handed to [`OUTPUT_ROUTINE`] by address.
    pub fn generate(&self, directive: &OutputDirective) -> String {
        let bytes = directive.text.as_bytes();
        let size = bytes.len() + 1;

        format!(
            r#"; ModuleID = 'scheil'
source_filename = "{source}"
target triple = "{triple}"

@.str = private unnamed_addr constant [{size} x i8] c"{text}\00", align 1

declare i32 @{routine}(ptr)

define i32 @main() {{
entry:
  %call = call i32 @{routine}(ptr @.str)
  ret i32 0
}}
"#,
            source = escape(self.source_filename.as_bytes()),
            triple = escape(self.triple.as_bytes()),
            text = escape(bytes),
            routine = OUTPUT_ROUTINE,
        )
    }
}

/// Code generator stage: `ir_path` to `module_path`. Malformed IR leaves
/// `module_path` untouched.
pub fn codegen_file(ir_path: &Path, module_path: &Path, triple: &str) -> Result<String> {
    let ir = fs::read_to_string(ir_path).map_err(|e| Error::io(ir_path, e))?;
    let directive = OutputDirective::parse(&ir, ir_path)?;

    let source_filename = ir_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let module = ModuleWriter::new(triple)
        .with_source_filename(source_filename)
        .generate(&directive);

    debug!(path = %module_path.display(), triple, "writing llvm module");
    fs::write(module_path, &module).map_err(|e| Error::io(module_path, e))?;

    info!(bytes = directive.text.len(), "generated {}", module_path.display());
    Ok(module)
}
