//! Batch orchestration for receptor–ligand docking and trajectory contact
//! analysis.
//!
//! Two independent pipelines, each a sequential driver around external
//! command-line tools; every computation of substance (structure
//! preparation, grid potentials, docking search, contact detection) is
//! delegated to those tools:
//!
//! - **Docking** — for a fixed receptor and a list of ligand identifiers,
//!   stage one work directory per ligand and run the AutoDock toolchain in
//!   order: `prepare_receptor`, `prepare_flexreceptor.py`,
//!   `mk_prepare_ligand.py`, `prepare_gpf.py`, `autogrid4`, and Vina with
//!   AD4 scoring and flexible side chains.
//! - **Contacts** — for each simulation replica, run GetContacts against a
//!   shared topology and the replica's wrapped trajectory, producing one
//!   `<replica>_ctcs.tsv` per replica.
//!
//! The crate's own responsibility is sequencing and path bookkeeping:
//! validated run configuration, explicit per-invocation working
//! directories, checked exit statuses, and per-identifier reports.
//!
//! # Quick Start
//!
//! ```no_run
//! use dockpipe::{DockingConfig, DockingRun, FailurePolicy, SystemRunner};
//!
//! # fn main() -> Result<(), dockpipe::Error> {
//! let config = DockingConfig::from_file("dock.toml".as_ref())?;
//! let ligands = dockpipe::read_ligand_list("ligands.txt".as_ref())?;
//!
//! let run = DockingRun::new(&config, ".", FailurePolicy::FailFast)?;
//! let report = run.dock_batch(&ligands, &SystemRunner)?;
//!
//! for ligand in &report.ligands {
//!     if ligand.is_ok() {
//!         println!("{} -> {}", ligand.ligand, ligand.poses.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`DockingConfig`] / [`ContactsConfig`] — validated TOML run files
//! - [`DockingRun`] / [`ContactsRun`] — the two pipeline orchestrators
//! - [`ToolRunner`] — the seam where external processes are launched,
//!   with [`SystemRunner`] as the production implementation

mod config;
mod contacts;
mod dock;
mod error;
mod exec;

pub use config::{ContactsConfig, DockingConfig, DockingTools, FlexResidues, GridBox, SearchParams};
pub use contacts::{ContactsReport, ContactsRun, ReplicaReport};
pub use dock::{BatchReport, DockStep, DockingRun, LigandReport, StepFailure, read_ligand_list};
pub use error::Error;
pub use exec::{FailurePolicy, Invocation, SystemRunner, ToolOutput, ToolRunner};
