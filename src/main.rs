use scheil::config::{Backend, Config, Emit};
use scheil::driver::Driver;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use yansi::Paint;

use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "scheil")]
#[command(about = "Scheil compiler: .sc source to a native executable")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every stage and the native backend
    Build {
        /// Source file (.sc)
        file: PathBuf,

        /// Output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// What to produce
        #[arg(long, value_enum, default_value_t = EmitArg::Exe)]
        emit: EmitArg,

        /// How to turn the llvm module into native code
        #[arg(long, value_enum, default_value_t = BackendArg::Llc)]
        backend: BackendArg,

        /// Leave .sctk, .scir and .ll files beside the source
        #[arg(long)]
        keep_intermediates: bool,

        #[command(flatten)]
        toolchain: ToolchainArgs,
    },

    /// Tokenize <file> into <file>.sctk
    Lex { file: PathBuf },

    /// Resolve <file>.sctk into <file>.scir
    Parse { file: PathBuf },

    /// Generate <file>.ll from <file>.scir
    Codegen {
        file: PathBuf,

        /// Target triple written into the module
        #[arg(long)]
        target: Option<String>,
    },
}

#[derive(Args)]
struct ToolchainArgs {
    /// Target triple written into the module
    #[arg(long)]
    target: Option<String>,

    /// Backend compiler
    #[arg(long, env = "SCHEIL_LLC", default_value = "llc")]
    llc: String,

    /// Linker, tried before the usual C compilers
    #[arg(long, env = "SCHEIL_CC")]
    cc: Option<String>,

    /// Compiler for the direct backend
    #[arg(long, env = "SCHEIL_CLANG", default_value = "clang")]
    clang: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmitArg {
    Exe,
    Obj,
    Asm,
    LlvmIr,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    Llc,
    Clang,
    #[cfg(feature = "llvm")]
    Inprocess,
}

impl From<EmitArg> for Emit {
    fn from(arg: EmitArg) -> Self {
        match arg {
            EmitArg::Exe => Emit::Exe,
            EmitArg::Obj => Emit::Obj,
            EmitArg::Asm => Emit::Asm,
            EmitArg::LlvmIr => Emit::LlvmIr,
        }
    }
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Llc => Backend::Llc,
            BackendArg::Clang => Backend::Clang,
            #[cfg(feature = "llvm")]
            BackendArg::Inprocess => Backend::InProcess,
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Build {
            file,
            output,
            emit,
            backend,
            keep_intermediates,
            toolchain,
        } => {
            let mut config = Config {
                emit: emit.into(),
                backend: backend.into(),
                output,
                keep_intermediates,
                ..Config::default()
            };
            if let Some(target) = toolchain.target {
                config.target_triple = target;
            }
            config.tools.llc = toolchain.llc;
            config.tools.clang = toolchain.clang;
            if let Some(cc) = toolchain.cc {
                config.tools.linkers.insert(0, cc);
            }

            eprintln!("{} {}", "Compiling".green().bold(), file.display());
            let built = Driver::new(config)
                .build(&file)
                .with_context(|| format!("failed to build {}", file.display()))?;
            eprintln!("{} {}", "Done!".green().bold(), built.display());
        }

        Command::Lex { file } => {
            let found = Driver::new(Config::default())
                .lex(&file)
                .with_context(|| format!("failed to tokenize {}", file.display()))?;
            eprintln!("{} {} ({} diagnostics)", "Tokenized".green().bold(), file.display(), found);
        }

        Command::Parse { file } => {
            let found = Driver::new(Config::default())
                .parse(&file)
                .with_context(|| format!("failed to resolve {}", file.display()))?;
            eprintln!("{} {} ({} diagnostics)", "Resolved".green().bold(), file.display(), found);
        }

        Command::Codegen { file, target } => {
            let mut config = Config::default();
            if let Some(target) = target {
                config.target_triple = target;
            }
            let module = Driver::new(config)
                .codegen(&file)
                .with_context(|| format!("failed to generate code for {}", file.display()))?;
            eprintln!("{} {}", "Generated".green().bold(), module.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scheil=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
