use anyhow::{Context, Result, bail};

use dockpipe::{BatchReport, DockingConfig, DockingRun, LigandReport, SystemRunner, read_ligand_list};

use crate::cli::DockArgs;
use crate::display::{Context as DisplayContext, Progress, print_dock_summary};

pub fn run_dock(args: DockArgs, ctx: DisplayContext) -> Result<()> {
    let config = DockingConfig::from_file(&args.run.run)
        .with_context(|| format!("Failed to load run file {}", args.run.run.display()))?;

    let list_path = args
        .ligands
        .as_deref()
        .or(config.ligand_list.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!("No ligand list: pass --ligands or set ligand_list in the run file")
        })?;
    let ligands = read_ligand_list(list_path)?;

    if ligands.is_empty() {
        eprintln!("Ligand list is empty; nothing to dock.");
        return Ok(());
    }

    let run = DockingRun::new(&config, &args.dir, args.policy.into())
        .context("Docking run rejected")?;
    let runner = SystemRunner;

    let mut progress = Progress::new(ctx.interactive, ligands.len());
    let mut report = BatchReport::default();

    let receptor_pdb = run.receptor_pdb();
    if !receptor_pdb.is_file() {
        bail!(dockpipe::Error::missing_input(
            receptor_pdb,
            "receptor structure"
        ));
    }

    for ligand in &ligands {
        progress.item(&format!("Docking {ligand}"));
        let outcome = run.dock_ligand(ligand, &runner);
        finish_item(&mut progress, &outcome);
        report.ligands.push(outcome);
    }

    progress.finish(&format!(
        "{} of {} ligands docked",
        report.succeeded(),
        report.ligands.len()
    ));

    if ctx.interactive {
        print_dock_summary(&report);
    }

    if !report.is_ok() {
        bail!(
            "{} of {} ligands failed; see the summary above",
            report.failed(),
            report.ligands.len()
        );
    }
    Ok(())
}

fn finish_item(progress: &mut Progress, outcome: &LigandReport) {
    let description = format!("Docking {}", outcome.ligand);

    if outcome.is_ok() {
        let substeps: Vec<String> = outcome
            .completed
            .iter()
            .map(|step| step.to_string())
            .collect();
        progress.complete_item(&description, &substeps);
    } else {
        let substeps: Vec<String> = outcome
            .failures
            .iter()
            .map(|failure| failure.to_string())
            .collect();
        progress.fail_item(&description, &substeps);
    }
}
