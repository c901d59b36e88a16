//! RISC-V assembler, linker, and simulator CLI.
//!
//! This binary provides a single entry point for the toolchain. It performs:
//! 1. **Run:** Assemble one or more source files, link them, and execute the
//!    result; the guest's exit code becomes the process exit code.
//! 2. **Dump:** Assemble and link, then print the machine code as hex words.
//!
//! Diagnostics from the library go to stderr through `tracing`; set
//! `RUST_LOG` (for example `RUST_LOG=abacus_core=debug`) to see them.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, process};

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use abacus_core::config::{HierarchyConfig, SimulatorSettings};
use abacus_core::{
    CacheHierarchy, CoreDump, LinkedProgram, RegisterWidth, RunOutcome, Simulator, assemble, link,
};

#[derive(Parser, Debug)]
#[command(
    name = "abacus",
    author,
    version,
    about = "RISC-V assembler, linker, and simulator",
    long_about = "Assemble one or more RISC-V source files, link them, and run the result on a simulated machine with a configurable cache hierarchy.\n\nExamples:\n  abacus run fib.s\n  abacus run main.s --libs util.s --cache-stats\n  abacus run main.s --reg-width 64 --max-steps -1\n  abacus dump main.s"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble, link, and execute a program.
    Run(RunArgs),

    /// Assemble and link, then print one hex word per text instruction.
    Dump {
        /// Assembly file to dump.
        file: PathBuf,

        /// Additional assembly files linked after the main file.
        #[arg(long, value_name = "FILE", num_args = 1..)]
        libs: Vec<PathBuf>,
    },
}

#[derive(Args, Debug)]
#[allow(clippy::struct_excessive_bools)]
struct RunArgs {
    /// Assembly file containing the program entry point.
    file: PathBuf,

    /// Additional assembly files linked after the main file.
    #[arg(long, value_name = "FILE", num_args = 1..)]
    libs: Vec<PathBuf>,

    /// Step budget for the run; a negative value removes the limit.
    #[arg(long, value_name = "N", allow_negative_numbers = true,
          default_value_t = SimulatorSettings::default().max_steps)]
    max_steps: i64,

    /// Register width of the simulated machine, in bits.
    #[arg(long, value_name = "BITS", default_value_t = 32)]
    reg_width: u32,

    /// Fault stores into the text segment.
    #[arg(long)]
    immutable_text: bool,

    /// Permit loads and stores between the heap break and the stack pointer.
    #[arg(long)]
    allow_hs_access: bool,

    /// Halt only on an exit environment call, never by running off the end
    /// of the text segment.
    #[arg(long)]
    ecall_only_exit: bool,

    /// Start registers with a garbage pattern instead of zero, so reads of
    /// never-written registers surface.
    #[arg(long)]
    unset_registers: bool,

    /// Fault loads and stores that are not aligned to their natural size.
    #[arg(long)]
    aligned_addressing: bool,

    /// JSON file describing the cache hierarchy to attach.
    #[arg(long, value_name = "FILE")]
    cache_config: Option<PathBuf>,

    /// Print cache statistics after the run.
    #[arg(long)]
    cache_stats: bool,

    /// Write per-line execution counts to this file as text.
    #[arg(long, value_name = "FILE")]
    coverage_file: Option<PathBuf>,

    /// Write per-line execution counts to this file as JSON.
    #[arg(long, value_name = "FILE")]
    json_coverage_file: Option<PathBuf>,

    /// Write the final machine state to this file as JSON.
    #[arg(long, value_name = "FILE")]
    core_dump_file: Option<PathBuf>,

    /// Print the retired instruction count after the run.
    #[arg(long)]
    cycles: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let code = match cli.command {
        Commands::Run(args) => cmd_run(&args),
        Commands::Dump { file, libs } => cmd_dump(&file, &libs),
    };
    process::exit(code);
}

/// Runs a program end to end and reports the process exit code.
///
/// Tool failures (unreadable files, assembly or link errors, bad flags) exit
/// with 1. A fault inside the simulated machine exits with -1. Otherwise the
/// guest's own exit code is used.
fn cmd_run(args: &RunArgs) -> i32 {
    match run_program(args) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("error: {message}");
            1
        }
    }
}

fn run_program(args: &RunArgs) -> Result<i32, String> {
    let width = match RegisterWidth::try_from(args.reg_width) {
        Ok(width) if width.is_executable() => width,
        _ => return Err(format!("--reg-width must be 32 or 64, got {}", args.reg_width)),
    };

    let program = load_program(&args.file, &args.libs)?;
    debug!(
        entry = format_args!("{:#010x}", program.entry),
        insts = program.text.len(),
        width = args.reg_width,
        "program linked"
    );
    let settings = SimulatorSettings {
        width,
        max_steps: args.max_steps,
        mutable_text: !args.immutable_text,
        ecall_only_exit: args.ecall_only_exit,
        set_regs_on_init: !args.unset_registers,
        allow_access_btn_stack_heap: args.allow_hs_access,
        aligned_addressing: args.aligned_addressing,
    };

    let mut sim =
        Simulator::new(program, settings).map_err(|error| format!("cannot start: {error}"))?;
    if let Some(path) = &args.cache_config {
        sim.set_caches(load_hierarchy(path)?);
    }
    sim.record_coverage(args.coverage_file.is_some() || args.json_coverage_file.is_some());

    let outcome = sim.run();

    // Guest output and artifacts are produced even when the run failed, so
    // a crash can still be inspected.
    print!("{}", sim.take_stdout());
    std::io::stdout().flush().ok();
    write_artifacts(&sim, args)?;

    let code = match outcome {
        Ok(RunOutcome::Halted { exit_code }) => exit_code,
        Ok(RunOutcome::StepLimitExceeded { steps }) => {
            eprintln!("exceeded the budget of {steps} steps; raise or remove it with --max-steps");
            -1
        }
        Err(error) => {
            eprintln!("simulator error: {error}");
            -1
        }
    };

    if args.cache_stats {
        println!("{}", sim.caches().report());
    }
    if args.cycles {
        println!("cycles: {}", sim.cycles());
    }
    Ok(code)
}

/// Assembles the main file and every library, then links them in order.
fn load_program(file: &Path, libs: &[PathBuf]) -> Result<LinkedProgram, String> {
    let mut programs = Vec::with_capacity(libs.len() + 1);
    for path in std::iter::once(file).chain(libs.iter().map(PathBuf::as_path)) {
        let source = fs::read_to_string(path)
            .map_err(|error| format!("could not read {}: {error}", path.display()))?;
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        let program =
            assemble(&name, &source).map_err(|report| report.to_string().trim_end().to_string())?;
        programs.push(program);
    }
    link(&programs).map_err(|error| format!("link failed: {error}"))
}

/// Reads a cache hierarchy description from a JSON file and builds it.
fn load_hierarchy(path: &Path) -> Result<CacheHierarchy, String> {
    let text = fs::read_to_string(path)
        .map_err(|error| format!("could not read {}: {error}", path.display()))?;
    let config: HierarchyConfig = serde_json::from_str(&text)
        .map_err(|error| format!("invalid cache configuration in {}: {error}", path.display()))?;
    CacheHierarchy::new(&config).map_err(|error| format!("invalid cache configuration: {error}"))
}

/// Writes the coverage and core dump files that were asked for.
fn write_artifacts(sim: &Simulator, args: &RunArgs) -> Result<(), String> {
    if let Some(coverage) = sim.coverage() {
        if let Some(path) = &args.coverage_file {
            fs::write(path, coverage.render_text(sim.program()))
                .map_err(|error| format!("could not write {}: {error}", path.display()))?;
        }
        if let Some(path) = &args.json_coverage_file {
            let rendered = coverage
                .render_json(sim.program())
                .map_err(|error| format!("could not render coverage: {error}"))?;
            fs::write(path, rendered)
                .map_err(|error| format!("could not write {}: {error}", path.display()))?;
        }
    }
    if let Some(path) = &args.core_dump_file {
        CoreDump::capture(sim)
            .write_json(path)
            .map_err(|error| format!("could not write {}: {error}", path.display()))?;
    }
    Ok(())
}

fn cmd_dump(file: &Path, libs: &[PathBuf]) -> i32 {
    match load_program(file, libs) {
        Ok(program) => {
            for mcode in &program.text {
                println!("{:#010x}", mcode.word());
            }
            0
        }
        Err(message) => {
            eprintln!("error: {message}");
            1
        }
    }
}
