//! External tool invocation.
//!
//! Every process the pipelines launch goes through [`ToolRunner`], so the
//! orchestration logic can be exercised without the docking or analysis
//! suites installed. The production implementation, [`SystemRunner`],
//! blocks on the child, captures its output, and turns a non-zero exit
//! into a typed error; the working directory is set per invocation and the
//! orchestrator's own working directory is never changed.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

use crate::error::Error;

/// How a pipeline treats a ligand's remaining steps after one fails.
///
/// The batch always proceeds to the next ligand either way; the policy only
/// governs the rest of the failed ligand's own step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Skip the ligand's remaining steps; they would operate on missing
    /// or partial inputs.
    #[default]
    FailFast,

    /// Attempt every step regardless of earlier failures.
    BestEffort,
}

/// One external command: program, arguments, and working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Short tool name used in errors and reports.
    pub tool: &'static str,

    /// Executable or script to launch.
    pub program: PathBuf,

    /// Arguments, in order.
    pub args: Vec<OsString>,

    /// Working directory for the child process, if any.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Creates an invocation with no arguments.
    pub fn new(tool: &'static str, program: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the child's working directory.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// The arguments as UTF-8 strings, for display and tests.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }
}

/// Output captured from a completed, successful tool invocation.
#[derive(Debug, Default)]
pub struct ToolOutput {
    /// Captured standard output.
    pub stdout: Vec<u8>,
    /// Captured standard error (tools log progress here).
    pub stderr: Vec<u8>,
}

/// Launches external tools on behalf of the pipelines.
pub trait ToolRunner {
    /// Runs one invocation to completion.
    ///
    /// Returns an error if the process cannot be launched or exits
    /// unsuccessfully.
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, Error>;
}

/// [`ToolRunner`] backed by [`std::process::Command`].
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, Error> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = &invocation.cwd {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|source| Error::Spawn {
            tool: invocation.tool,
            source,
        })?;

        if !output.status.success() {
            return Err(Error::tool_failed(
                invocation.tool,
                output.status,
                &output.stderr,
            ));
        }

        Ok(ToolOutput {
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Records every invocation; fails those whose tool name is listed.
    #[derive(Default)]
    pub(crate) struct RecordingRunner {
        pub(crate) calls: RefCell<Vec<Invocation>>,
        pub(crate) fail_tools: Vec<&'static str>,
    }

    impl RecordingRunner {
        pub(crate) fn failing(tools: &[&'static str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_tools: tools.to_vec(),
            }
        }

        pub(crate) fn tools_run(&self) -> Vec<&'static str> {
            self.calls.borrow().iter().map(|i| i.tool).collect()
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<ToolOutput, Error> {
            self.calls.borrow_mut().push(invocation.clone());
            if self.fail_tools.contains(&invocation.tool) {
                return Err(Error::ToolFailed {
                    tool: invocation.tool,
                    code: Some(1),
                    detail: String::from("exit code 1"),
                });
            }
            Ok(ToolOutput::default())
        }
    }
}
