use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use dockpipe::FailurePolicy;

#[derive(Parser)]
#[command(
    name = "dpipe",
    about = "Batch docking and contact-analysis orchestration",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Dock a batch of ligands against a fixed receptor
    #[command(visible_alias = "d")]
    Dock(DockArgs),

    /// Compute intraprotein contacts for a set of simulation replicas
    #[command(visible_alias = "c")]
    Contacts(ContactsArgs),
}

/// Options shared by both commands.
#[derive(Args)]
pub struct RunOptions {
    /// Run file (TOML)
    #[arg(short, long, value_name = "FILE")]
    pub run: PathBuf,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct DockArgs {
    #[command(flatten)]
    pub run: RunOptions,

    /// Ligand identifier list, one per line (overrides the run file)
    #[arg(short, long, value_name = "FILE")]
    pub ligands: Option<PathBuf>,

    /// Directory holding the receptor/ligand inputs and work directories
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// What happens to a ligand's remaining steps after one fails
    #[arg(long, value_name = "POLICY", default_value = "fail-fast")]
    pub policy: Policy,
}

#[derive(Args)]
pub struct ContactsArgs {
    #[command(flatten)]
    pub run: RunOptions,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Policy {
    /// Skip the ligand's remaining steps
    FailFast,
    /// Attempt every step regardless
    BestEffort,
}

impl From<Policy> for FailurePolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::FailFast => FailurePolicy::FailFast,
            Policy::BestEffort => FailurePolicy::BestEffort,
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
