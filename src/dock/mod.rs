//! Batch docking orchestration.
//!
//! [`DockingRun`] drives the external AutoDock toolchain for each ligand in
//! a list: stage a fresh work directory, then prepare the receptor, split
//! off the flexible side chains, prepare the ligand, write the grid
//! parameter file, compute the grid maps, and dock. Each invocation runs
//! with the ligand's work directory as the child process's working
//! directory; the orchestrator's own working directory never changes.
//!
//! A ligand's failure is recorded in its [`LigandReport`] and the batch
//! moves on to the next ligand. Whether the failed ligand's remaining
//! steps still run is governed by [`FailurePolicy`].

mod ligands;

pub use ligands::read_ligand_list;

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::{DockingConfig, DockingTools};
use crate::error::Error;
use crate::exec::{FailurePolicy, Invocation, ToolRunner};

/// One step of the per-ligand docking sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DockStep {
    /// Convert the receptor PDB to PDBQT.
    PrepareReceptor,
    /// Split the receptor into rigid and flexible PDBQT parts.
    SplitFlexReceptor,
    /// Convert the ligand SDF to PDBQT.
    PrepareLigand,
    /// Write the grid parameter file for the rigid receptor.
    WriteGridParams,
    /// Precompute the AD4 affinity maps.
    ComputeGridMaps,
    /// Run the docking search with flexible side chains.
    Dock,
}

impl DockStep {
    /// All six steps, in execution order.
    pub const ALL: [Self; 6] = [
        Self::PrepareReceptor,
        Self::SplitFlexReceptor,
        Self::PrepareLigand,
        Self::WriteGridParams,
        Self::ComputeGridMaps,
        Self::Dock,
    ];

    /// Human-readable step description.
    pub fn describe(self) -> &'static str {
        match self {
            Self::PrepareReceptor => "Prepare receptor",
            Self::SplitFlexReceptor => "Split flexible receptor",
            Self::PrepareLigand => "Prepare ligand",
            Self::WriteGridParams => "Write grid parameters",
            Self::ComputeGridMaps => "Compute grid maps",
            Self::Dock => "Dock with flexible side chains",
        }
    }
}

impl fmt::Display for DockStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A failure during staging (`step` is `None`) or during one tool step.
#[derive(Debug)]
pub struct StepFailure {
    /// The failed step, or `None` for a staging failure.
    pub step: Option<DockStep>,
    /// What went wrong.
    pub error: Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(f, "{step}: {}", self.error),
            None => write!(f, "Staging: {}", self.error),
        }
    }
}

/// Outcome of one ligand's docking sequence.
#[derive(Debug)]
pub struct LigandReport {
    /// The ligand identifier.
    pub ligand: String,
    /// The ligand's work directory.
    pub work_dir: PathBuf,
    /// Where the docked poses land if the sequence succeeds.
    pub poses: PathBuf,
    /// Steps that completed, in order.
    pub completed: Vec<DockStep>,
    /// Steps never attempted (staging failed, or fail-fast cut them off).
    pub skipped: Vec<DockStep>,
    /// Failures, in the order they occurred.
    pub failures: Vec<StepFailure>,
}

impl LigandReport {
    fn new(ligand: &str, work_dir: PathBuf, poses: PathBuf) -> Self {
        Self {
            ligand: ligand.to_string(),
            work_dir,
            poses,
            completed: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// `true` if every step completed.
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Outcomes for a whole ligand batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Per-ligand outcomes.
    pub ligands: Vec<LigandReport>,
}

impl BatchReport {
    /// Number of ligands whose full sequence completed.
    pub fn succeeded(&self) -> usize {
        self.ligands.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of ligands with at least one failure.
    pub fn failed(&self) -> usize {
        self.ligands.len() - self.succeeded()
    }

    /// `true` if every ligand succeeded (vacuously true for an empty batch).
    pub fn is_ok(&self) -> bool {
        self.failed() == 0
    }
}

/// Tool paths pinned down before the first ligand runs.
///
/// Scripts and executables are made absolute up front so they stay valid
/// when invocations run with a work directory as their cwd. A bare
/// `mk_prepare_ligand` name is left alone for `PATH` lookup.
#[derive(Debug, Clone)]
struct ResolvedTools {
    prepare_receptor: PathBuf,
    pythonsh: PathBuf,
    autogrid: PathBuf,
    vina: PathBuf,
    mk_prepare_ligand: PathBuf,
    flex_receptor_script: PathBuf,
    gpf_script: PathBuf,
}

impl ResolvedTools {
    fn resolve(tools: &DockingTools) -> Result<Self, Error> {
        Ok(Self {
            prepare_receptor: absolute(&tools.prepare_receptor())?,
            pythonsh: absolute(&tools.pythonsh())?,
            autogrid: absolute(&tools.autogrid())?,
            vina: absolute(&tools.vina)?,
            mk_prepare_ligand: if tools.mk_prepare_ligand.components().count() > 1 {
                absolute(&tools.mk_prepare_ligand)?
            } else {
                tools.mk_prepare_ligand.clone()
            },
            flex_receptor_script: absolute(&tools.flex_receptor_script)?,
            gpf_script: absolute(&tools.gpf_script)?,
        })
    }
}

fn absolute(path: &Path) -> Result<PathBuf, Error> {
    Ok(std::path::absolute(path)?)
}

/// A validated batch docking run over one receptor.
#[derive(Debug)]
pub struct DockingRun<'cfg> {
    config: &'cfg DockingConfig,
    base_dir: PathBuf,
    policy: FailurePolicy,
    tools: ResolvedTools,
}

impl<'cfg> DockingRun<'cfg> {
    /// Validates the configuration and pins down tool paths.
    ///
    /// `base_dir` holds the receptor and ligand input files and receives
    /// the per-ligand work directories. No directory is created and no
    /// process is spawned here.
    pub fn new(
        config: &'cfg DockingConfig,
        base_dir: impl Into<PathBuf>,
        policy: FailurePolicy,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            config,
            base_dir: absolute(&base_dir.into())?,
            policy,
            tools: ResolvedTools::resolve(&config.tools)?,
        })
    }

    /// The receptor structure staged into every work directory.
    pub fn receptor_pdb(&self) -> PathBuf {
        self.base_dir.join(format!("{}.pdb", self.config.receptor))
    }

    /// Docks every ligand in order, one complete sequence per ligand.
    ///
    /// Fails up front if the receptor structure is missing, before any
    /// directory is created. Individual ligand failures never abort the
    /// batch; they are recorded in the report.
    pub fn dock_batch(
        &self,
        ligands: &[String],
        runner: &dyn ToolRunner,
    ) -> Result<BatchReport, Error> {
        let receptor_pdb = self.receptor_pdb();
        if !ligands.is_empty() && !receptor_pdb.is_file() {
            return Err(Error::missing_input(receptor_pdb, "receptor structure"));
        }

        Ok(BatchReport {
            ligands: ligands
                .iter()
                .map(|ligand| self.dock_ligand(ligand, runner))
                .collect(),
        })
    }

    /// Stages one ligand and runs its six-step sequence.
    pub fn dock_ligand(&self, ligand: &str, runner: &dyn ToolRunner) -> LigandReport {
        let work_dir = self.base_dir.join(ligand);
        let poses = work_dir.join(format!("{}_{ligand}_flex.pdbqt", self.config.receptor));
        let mut report = LigandReport::new(ligand, work_dir, poses);

        if let Err(error) = self.stage(ligand) {
            report.failures.push(StepFailure { step: None, error });
            report.skipped.extend(DockStep::ALL);
            return report;
        }

        let mut steps = DockStep::ALL.into_iter();
        while let Some(step) = steps.next() {
            let invocation = self.invocation(step, ligand);
            match runner.run(&invocation) {
                Ok(_) => report.completed.push(step),
                Err(error) => {
                    report.failures.push(StepFailure {
                        step: Some(step),
                        error,
                    });
                    if self.policy == FailurePolicy::FailFast {
                        report.skipped.extend(steps);
                        break;
                    }
                }
            }
        }

        report
    }

    /// Creates the work directory, copies the receptor in, and moves the
    /// ligand structure in. An existing work directory is an error and is
    /// left untouched.
    fn stage(&self, ligand: &str) -> Result<(), Error> {
        if !ligands::valid_identifier(ligand) {
            return Err(Error::invalid_config(
                "ligand",
                format!("'{ligand}' is not a valid ligand identifier"),
            ));
        }

        let receptor_pdb = self.receptor_pdb();
        if !receptor_pdb.is_file() {
            return Err(Error::missing_input(receptor_pdb, "receptor structure"));
        }
        let ligand_sdf = self.base_dir.join(format!("{ligand}.sdf"));
        if !ligand_sdf.is_file() {
            return Err(Error::missing_input(ligand_sdf, "ligand structure"));
        }

        let work_dir = self.base_dir.join(ligand);
        match fs::create_dir(&work_dir) {
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::WorkDirExists { path: work_dir });
            }
            other => other?,
        }

        fs::copy(
            &receptor_pdb,
            work_dir.join(format!("{}.pdb", self.config.receptor)),
        )?;
        fs::rename(&ligand_sdf, work_dir.join(format!("{ligand}.sdf")))?;
        Ok(())
    }

    /// Builds one step's invocation.
    ///
    /// File arguments stay relative to the work directory: `autogrid4`
    /// embeds the map paths it reads from the `.gpf` file, so pushing
    /// absolute paths through the grid step would bake the staging
    /// location into the maps.
    fn invocation(&self, step: DockStep, ligand: &str) -> Invocation {
        let receptor = &self.config.receptor;
        let tools = &self.tools;
        let work_dir = self.base_dir.join(ligand);

        let invocation = match step {
            DockStep::PrepareReceptor => {
                Invocation::new("prepare_receptor", &tools.prepare_receptor)
                    .arg("-r")
                    .arg(format!("{receptor}.pdb"))
                    .arg("-o")
                    .arg(format!("{receptor}.pdbqt"))
            }

            DockStep::SplitFlexReceptor => {
                Invocation::new("prepare_flexreceptor", &tools.pythonsh)
                    .arg(&tools.flex_receptor_script)
                    .arg("-r")
                    .arg(format!("{receptor}.pdbqt"))
                    .arg("-s")
                    .arg(self.config.flex.selection())
            }

            DockStep::PrepareLigand => {
                Invocation::new("mk_prepare_ligand", &tools.mk_prepare_ligand)
                    .arg("-i")
                    .arg(format!("{ligand}.sdf"))
                    .arg("-o")
                    .arg(format!("{ligand}.pdbqt"))
            }

            DockStep::WriteGridParams => Invocation::new("prepare_gpf", &tools.pythonsh)
                .arg(&tools.gpf_script)
                .arg("-l")
                .arg(format!("{ligand}.pdbqt"))
                .arg("-r")
                .arg(format!("{receptor}_rigid.pdbqt"))
                .arg("-p")
                .arg(self.config.grid.npts_arg())
                .arg("-p")
                .arg(self.config.grid.center_arg()),

            DockStep::ComputeGridMaps => Invocation::new("autogrid4", &tools.autogrid)
                .arg("-p")
                .arg(format!("{receptor}_rigid.gpf"))
                .arg("-l")
                .arg(format!("{receptor}_rigid.glg")),

            DockStep::Dock => Invocation::new("vina", &tools.vina)
                .arg("--ligand")
                .arg(format!("{ligand}.pdbqt"))
                .arg("--maps")
                .arg(format!("{receptor}_rigid"))
                .arg("--scoring")
                .arg("ad4")
                .arg("--flex")
                .arg(format!("{receptor}_flex.pdbqt"))
                .arg("--exhaustiveness")
                .arg(self.config.search.exhaustiveness.to_string())
                .arg("--num_modes")
                .arg(self.config.search.num_modes.to_string())
                .arg("--energy_range")
                .arg(self.config.search.energy_range.to_string())
                .arg("--out")
                .arg(format!("{receptor}_{ligand}_flex.pdbqt")),
        };

        invocation.current_dir(work_dir)
    }
}
