//! External backend and linker invocations. All calls block until the tool
//! exits; its exit status is the only completion signal.

use crate::config::Tools;
use crate::error::{Error, Result};

use tracing::{debug, info};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

fn locate(tool: &str) -> Result<PathBuf> {
    which::which(tool).map_err(|_| Error::ToolNotFound {
        tool: tool.to_string(),
    })
}

fn run(tool: &str, program: &Path, args: &[&OsStr]) -> Result<()> {
    debug!(tool, program = %program.display(), ?args, "running");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| Error::io(program, e))?;

    if !output.status.success() {
        return Err(Error::ToolFailed {
            tool: tool.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    info!(tool, "ok");
    Ok(())
}

fn llc(tools: &Tools, module: &Path, out: &Path, filetype: &str) -> Result<()> {
    let program = locate(&tools.llc)?;
    let filetype = format!("-filetype={}", filetype);
    run(
        &tools.llc,
        &program,
        &[
            OsStr::new(&filetype),
            OsStr::new("-relocation-model=pic"),
            OsStr::new("-o"),
            out.as_os_str(),
            module.as_os_str(),
        ],
    )
}

pub fn compile_to_object(tools: &Tools, module: &Path, out: &Path) -> Result<()> {
    llc(tools, module, out, "obj")
}

pub fn compile_to_assembly(tools: &Tools, module: &Path, out: &Path) -> Result<()> {
    llc(tools, module, out, "asm")
}

/// Links with the first linker in `tools.linkers` that exists.
pub fn link(tools: &Tools, object: &Path, executable: &Path) -> Result<()> {
    let Some((tool, program)) = tools
        .linkers
        .iter()
        .find_map(|tool| locate(tool).ok().map(|program| (tool, program)))
    else {
        return Err(Error::ToolNotFound {
            tool: tools.linkers.join(" / "),
        });
    };

    run(
        tool,
        &program,
        &[object.as_os_str(), OsStr::new("-o"), executable.as_os_str()],
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClangOutput {
    Executable,
    Object,
    Assembly,
}

/// `clang` straight from the module, skipping `llc`.
pub fn compile_direct(tools: &Tools, module: &Path, out: &Path, kind: ClangOutput) -> Result<()> {
    let program = locate(&tools.clang)?;
    let mut args = vec![OsStr::new("-Wno-override-module")];
    match kind {
        ClangOutput::Executable => {}
        ClangOutput::Object => args.push(OsStr::new("-c")),
        ClangOutput::Assembly => args.push(OsStr::new("-S")),
    }
    args.extend([module.as_os_str(), OsStr::new("-o"), out.as_os_str()]);
    run(&tools.clang, &program, &args)
}
