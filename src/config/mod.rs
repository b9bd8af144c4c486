
use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

/// How the `.ll` module becomes native code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `llc` to an object file, then the system C compiler links it.
    Llc,
    /// `clang` straight from the module to the executable.
    Clang,
    /// LLVM linked into this process; the system C compiler still links.
    #[cfg(feature = "llvm")]
    InProcess,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    Exe,
    Obj,
    Asm,
    LlvmIr,
}

impl Display for Emit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Emit::Exe => "executable",
            Emit::Obj => "object file",
            Emit::Asm => "assembly",
            Emit::LlvmIr => "llvm module",
        };
        write!(f, "{}", name)
    }
}

/// External programs the driver may run. Each is looked up on `PATH`
/// unless it is already a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
    pub llc: String,
    /// Linkers tried in order; the first one found is used.
    pub linkers: Vec<String>,
    pub clang: String,
}

impl Default for Tools {
    fn default() -> Self {
        Tools {
            llc: "llc".to_string(),
            linkers: vec!["cc".to_string(), "gcc".to_string(), "clang".to_string()],
            clang: "clang".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub target_triple: String,
    pub backend: Backend,
    pub emit: Emit,
    /// Final artifact path; derived from the source path when `None`.
    pub output: Option<PathBuf>,
    pub keep_intermediates: bool,
    pub tools: Tools,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            target_triple: host_triple(),
            backend: Backend::Llc,
            emit: Emit::Exe,
            output: None,
            keep_intermediates: false,
            tools: Tools::default(),
        }
    }
}

#[cfg(feature = "llvm")]
pub fn host_triple() -> String {
    crate::codegen::native::host_triple()
}

/// The triple of the platform this binary was built for.
#[cfg(not(feature = "llvm"))]
pub fn host_triple() -> String {
    use std::env::consts::{ARCH, OS};

    let arch = match (ARCH, OS) {
        ("aarch64", "macos") => "arm64",
        (arch, _) => arch,
    };
    match OS {
        "linux" => format!("{}-unknown-linux-gnu", arch),
        "macos" => format!("{}-apple-macosx", arch),
        "windows" if cfg!(target_env = "msvc") => format!("{}-pc-windows-msvc", arch),
        "windows" => format!("{}-pc-windows-gnu", arch),
        "freebsd" => format!("{}-unknown-freebsd", arch),
        other => format!("{}-unknown-{}", arch, other),
    }
}
