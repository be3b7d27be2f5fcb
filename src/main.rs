//! Simpletron - CLI Entry Point
//!
//! Commands:
//! - `simpletron run [program]` - Run an SML file, or enter a program at the keyboard
//! - `simpletron disasm <program>` - List an SML file as mnemonics

use clap::{Parser, Subcommand};
use simpletron::{Cpu, RunConfig};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simpletron")]
#[command(version)]
#[command(about = "A fetch-decode-execute interpreter for the Simpletron accumulator machine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a program and run it until it halts
    Run {
        /// SML file to load; without one you are asked for a file or the program is typed in
        program: Option<String>,
        /// Suppress the per-instruction trace
        #[arg(short, long)]
        quiet: bool,
        /// Stop after this many instructions
        #[arg(short, long)]
        max_cycles: Option<u64>,
        /// Write the final machine state as JSON
        #[arg(long, value_name = "PATH")]
        state_json: Option<PathBuf>,
    },
    /// Disassemble an SML file to readable text
    Disasm {
        /// SML file to list
        program: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let code = match cli.command {
        Some(Commands::Run { program, quiet, max_cycles, state_json }) => {
            let config = RunConfig { trace: !quiet, max_cycles };
            run_program(program.as_deref(), &config, state_json.as_deref())
        }
        Some(Commands::Disasm { program }) => disassemble_file(&program),
        None => run_program(None, &RunConfig::default(), None),
    };

    std::process::exit(code);
}

fn run_program(path: Option<&str>, config: &RunConfig, state_json: Option<&Path>) -> i32 {
    use simpletron::{execute, load_file, load_prompted, LineInput};
    use std::io;

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let loaded = match path {
        Some(path) => load_file(path),
        None => load_prompted(&mut reader, &mut out),
    };
    let program = match loaded {
        Ok(program) => program,
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            return 1;
        }
    };

    if let Err(e) = program.announce(&mut out) {
        eprintln!("❌ Output error: {}", e);
        return 1;
    }

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&program.words) {
        eprintln!("❌ Failed to load program: {}", e);
        return 1;
    }

    // READ consumes whatever follows the program on stdin.
    let mut input = LineInput::new(reader);
    let termination = match execute(&mut cpu, config, &mut input, &mut out) {
        Ok(termination) => termination,
        Err(e) => {
            eprintln!("❌ Execution error: {}", e);
            return 1;
        }
    };

    if let Some(path) = state_json {
        if let Err(e) = save_state(&cpu, path) {
            eprintln!("❌ Failed to write state to {}: {}", path.display(), e);
            return 1;
        }
    }

    termination.exit_code()
}

fn save_state(cpu: &Cpu, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(cpu)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn disassemble_file(path: &str) -> i32 {
    use simpletron::{disassemble, load_file};

    let program = match load_file(path) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("❌ Failed to load program: {}", e);
            return 1;
        }
    };

    for value in &program.rejected {
        eprintln!("Invalid instruction: {}", value);
    }
    print!("{}", disassemble(&program.words));
    0
}
