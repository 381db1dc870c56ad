use anyhow::{Context, Result, bail};

use dockpipe::{ContactsConfig, ContactsReport, ContactsRun, SystemRunner};

use crate::cli::ContactsArgs;
use crate::display::{Context as DisplayContext, Progress, print_contacts_summary};

pub fn run_contacts(args: ContactsArgs, ctx: DisplayContext) -> Result<()> {
    let config = ContactsConfig::from_file(&args.run.run)
        .with_context(|| format!("Failed to load run file {}", args.run.run.display()))?;
    let run = ContactsRun::new(&config).context("Contacts run rejected")?;
    let runner = SystemRunner;

    if !config.topology.is_file() {
        bail!(dockpipe::Error::missing_input(
            config.topology.clone(),
            "shared topology"
        ));
    }
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            config.output_dir.display()
        )
    })?;

    let replicas: Vec<String> = run.replicas().to_vec();
    let mut progress = Progress::new(ctx.interactive, replicas.len());
    let mut report = ContactsReport::default();

    for replica in &replicas {
        progress.item(&format!("Contacts for replica {replica}"));
        let outcome = run.analyze_replica(replica, &runner);
        let description = format!("Contacts for replica {replica}");
        match &outcome.error {
            None => progress.complete_item(
                &description,
                &[format!("Wrote {}", outcome.output.display())],
            ),
            Some(error) => progress.fail_item(&description, &[error.to_string()]),
        }
        report.replicas.push(outcome);
    }

    progress.finish(&format!(
        "{} of {} replicas analyzed",
        report.succeeded(),
        report.replicas.len()
    ));

    if ctx.interactive {
        print_contacts_summary(&report);
    }

    if !report.is_ok() {
        bail!(
            "{} of {} replicas failed; see the summary above",
            report.failed(),
            report.replicas.len()
        );
    }
    Ok(())
}
