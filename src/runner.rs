//! Complete runs: execution banner, the run itself, and the closing report.

use crate::cpu::{Cpu, CpuError, CpuState, Fault, Input};
use crate::dump::write_dump;
use std::io::Write;

/// How a run is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Print a trace line before each instruction.
    pub trace: bool,
    /// Stop after this many instructions; `None` runs until HALT or a fault.
    pub max_cycles: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            trace: true,
            max_cycles: None,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// HALT executed.
    Halted { start_page: usize, end_page: usize },
    /// The program faulted.
    Faulted(Fault),
    /// The cycle limit was reached first.
    CycleLimit(u64),
}

impl Termination {
    /// Process exit status for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Termination::Halted { .. } => 0,
            Termination::Faulted(_) => 2,
            Termination::CycleLimit(_) => 3,
        }
    }
}

/// Run a loaded CPU to completion, reporting to `out`.
///
/// A HALT dumps the pages its operand names. A fault or the cycle limit
/// dumps page 0. Only console I/O failures are returned as errors.
pub fn execute<I, W>(
    cpu: &mut Cpu,
    config: &RunConfig,
    input: &mut I,
    out: &mut W,
) -> Result<Termination, CpuError>
where
    I: Input + ?Sized,
    W: Write + ?Sized,
{
    cpu.trace = config.trace;
    writeln!(out, "*** Program execution begins ***")?;

    let result = match config.max_cycles {
        Some(limit) => cpu.run_limited(limit, input, out),
        None => cpu.run(input, out),
    };

    let termination = match result {
        Ok(cycles) => match cpu.state {
            CpuState::Halted { start_page, end_page } => {
                writeln!(out, "*** Simpletron execution terminated ***")?;
                Termination::Halted { start_page, end_page }
            }
            _ => {
                writeln!(out, "*** Simpletron execution suspended after {} instructions ***", cycles)?;
                Termination::CycleLimit(cycles)
            }
        },
        Err(CpuError::Fault(fault)) => {
            writeln!(out, "*** Simpletron execution abnormally terminated ***")?;
            writeln!(out, "*** {} ***", fault)?;
            Termination::Faulted(fault)
        }
        Err(e) => return Err(e),
    };

    let (start_page, end_page) = match termination {
        Termination::Halted { start_page, end_page } => (start_page, end_page),
        _ => (0, 0),
    };
    write_dump(out, cpu, start_page, end_page)?;
    out.flush()?;

    Ok(termination)
}
