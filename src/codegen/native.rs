//! In-process backend: hands the textual module to LLVM through inkwell.

use crate::error::{Error, Result};

use inkwell::OptimizationLevel;
use inkwell::context::Context;
use inkwell::memory_buffer::MemoryBuffer;
use inkwell::targets::{
    CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple,
};
use tracing::debug;

use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Object,
    Assembly,
}

pub fn host_triple() -> String {
    TargetMachine::get_default_triple()
        .as_str()
        .to_string_lossy()
        .into_owned()
}

fn backend(e: impl ToString) -> Error {
    Error::Backend(e.to_string())
}

/// Parses and verifies `module_text`, then writes an object or assembly
/// file for `triple` to `out`.
pub fn emit(module_text: &str, triple: &str, out: &Path, kind: FileKind) -> Result<()> {
    Target::initialize_all(&InitializationConfig::default());

    let context = Context::create();
    let buffer = MemoryBuffer::create_from_memory_range_copy(module_text.as_bytes(), "scheil");
    let module = context.create_module_from_ir(buffer).map_err(backend)?;
    module.verify().map_err(backend)?;

    let target_triple = TargetTriple::create(triple);
    let target = Target::from_triple(&target_triple).map_err(backend)?;
    let machine = target
        .create_target_machine(
            &target_triple,
            "generic",
            "",
            OptimizationLevel::None,
            RelocMode::PIC,
            CodeModel::Default,
        )
        .ok_or_else(|| backend(format!("no target machine for {}", triple)))?;
    module.set_data_layout(&machine.get_target_data().get_data_layout());

    let file_type = match kind {
        FileKind::Object => FileType::Object,
        FileKind::Assembly => FileType::Assembly,
    };
    debug!(?kind, path = %out.display(), "llvm emit");
    machine
        .write_to_file(&module, file_type, out)
        .map_err(backend)
}
