//! Runs the stages in order over on-disk artifacts, then the backend.

pub mod toolchain;


use crate::codegen::codegen_file;
use crate::config::{Backend, Config, Emit};
use crate::diagnostics::{self, Diagnostic};
use crate::error::{Error, Result};
use crate::lexer::lex_file;
use crate::parser::parse_file;

use toolchain::ClangOutput;
use tracing::{debug, info, warn};

use std::env::consts::EXE_EXTENSION;
use std::fs;
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "sc";

/// Every file a build of `source` may create, all beside the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub source: PathBuf,
    pub tokens: PathBuf,
    pub ir: PathBuf,
    pub module: PathBuf,
    pub object: PathBuf,
    pub assembly: PathBuf,
    pub executable: PathBuf,
}

impl Artifacts {
    pub fn for_source(source: &Path) -> Self {
        Artifacts {
            source: source.to_path_buf(),
            tokens: source.with_extension("sctk"),
            ir: source.with_extension("scir"),
            module: source.with_extension("ll"),
            object: source.with_extension(if cfg!(windows) { "obj" } else { "o" }),
            assembly: source.with_extension("s"),
            executable: source.with_extension(EXE_EXTENSION),
        }
    }

    pub fn default_output(&self, emit: Emit) -> &Path {
        match emit {
            Emit::Exe => &self.executable,
            Emit::Obj => &self.object,
            Emit::Asm => &self.assembly,
            Emit::LlvmIr => &self.module,
        }
    }
}

pub struct Driver {
    config: Config,
}

impl Driver {
    pub fn new(config: Config) -> Self {
        Driver { config }
    }

    fn check_source(&self, source: &Path) -> Result<()> {
        if !source.is_file() {
            return Err(Error::InvalidInput(format!(
                "file {} does not exist",
                source.display()
            )));
        }
        if source.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
            warn!(
                "{} does not have the .{} extension",
                source.display(),
                SOURCE_EXTENSION
            );
        }
        Ok(())
    }

    /// Tokenizer stage only. Returns the number of diagnostics reported.
    pub fn lex(&self, source: &Path) -> Result<usize> {
        self.check_source(source)?;
        let artifacts = Artifacts::for_source(source);
        let (text, lexed) = lex_file(source, &artifacts.tokens)?;
        emit_diagnostics(source, &text, &lexed.diagnostics);
        Ok(lexed.diagnostics.len())
    }

    /// Binder stage only, reading the token stream `lex` left beside `source`.
    pub fn parse(&self, source: &Path) -> Result<usize> {
        let artifacts = Artifacts::for_source(source);
        let (stream, bound) = parse_file(&artifacts.tokens, &artifacts.ir)?;
        emit_diagnostics(&artifacts.tokens, &stream, &bound.diagnostics);
        Ok(bound.diagnostics.len())
    }

    /// Code generator stage only. Returns the module path.
    pub fn codegen(&self, source: &Path) -> Result<PathBuf> {
        let artifacts = Artifacts::for_source(source);
        codegen_file(&artifacts.ir, &artifacts.module, &self.config.target_triple)?;
        Ok(artifacts.module)
    }

    /// The whole pipeline. Intermediates are removed only after success, so
    /// a failed build leaves them for inspection.
    pub fn build(&self, source: &Path) -> Result<PathBuf> {
        let artifacts = Artifacts::for_source(source);
        let output = self
            .config
            .output
            .clone()
            .unwrap_or_else(|| artifacts.default_output(self.config.emit).to_path_buf());

        self.lex(source)?;
        self.parse(source)?;
        let module = self.codegen(source)?;

        self.lower(&artifacts, &module, &output)?;

        if !self.config.keep_intermediates {
            self.clean(&artifacts, &output);
        }
        info!("built {} {}", self.config.emit, output.display());
        Ok(output)
    }

    fn lower(&self, artifacts: &Artifacts, module: &Path, output: &Path) -> Result<()> {
        let tools = &self.config.tools;

        match (self.config.emit, self.config.backend) {
            (Emit::LlvmIr, _) => {
                if module != output {
                    fs::copy(module, output).map_err(|e| Error::io(output, e))?;
                }
                Ok(())
            }

            (Emit::Obj, Backend::Llc) => toolchain::compile_to_object(tools, module, output),
            (Emit::Asm, Backend::Llc) => toolchain::compile_to_assembly(tools, module, output),
            (Emit::Exe, Backend::Llc) => {
                toolchain::compile_to_object(tools, module, &artifacts.object)?;
                toolchain::link(tools, &artifacts.object, output)
            }

            (Emit::Obj, Backend::Clang) => {
                toolchain::compile_direct(tools, module, output, ClangOutput::Object)
            }
            (Emit::Asm, Backend::Clang) => {
                toolchain::compile_direct(tools, module, output, ClangOutput::Assembly)
            }
            (Emit::Exe, Backend::Clang) => {
                toolchain::compile_direct(tools, module, output, ClangOutput::Executable)
            }

            #[cfg(feature = "llvm")]
            (emit, Backend::InProcess) => {
                use crate::codegen::native::{FileKind, emit as emit_native};

                let text = fs::read_to_string(module).map_err(|e| Error::io(module, e))?;
                let triple = &self.config.target_triple;
                match emit {
                    Emit::Asm => emit_native(&text, triple, output, FileKind::Assembly),
                    Emit::Obj => emit_native(&text, triple, output, FileKind::Object),
                    _ => {
                        emit_native(&text, triple, &artifacts.object, FileKind::Object)?;
                        toolchain::link(tools, &artifacts.object, output)
                    }
                }
            }
        }
    }

    fn clean(&self, artifacts: &Artifacts, output: &Path) {
        let mut doomed = vec![&artifacts.tokens, &artifacts.ir];
        if artifacts.module != output {
            doomed.push(&artifacts.module);
        }
        if self.config.emit == Emit::Exe && self.config.backend != Backend::Clang {
            doomed.push(&artifacts.object);
        }

        for path in doomed {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "removed"),
                Err(e) => warn!(path = %path.display(), "could not remove: {}", e),
            }
        }
    }
}

fn emit_diagnostics(file: &Path, text: &str, found: &[Diagnostic]) {
    if found.is_empty() {
        return;
    }
    let name = file.display().to_string();
    if let Err(e) = diagnostics::report(&name, text, found) {
        warn!("could not print diagnostics: {}", e);
    }
}
