use std::io::{self, Write};

use dockpipe::{BatchReport, ContactsReport};

use crate::util::text::truncate;

const INDENT: &str = "      ";
const NAME_WIDTH: usize = 18;
const DETAIL_WIDTH: usize = 38;

pub fn print_dock_summary(report: &BatchReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}\x1b[1mDocking Summary\x1b[0m");

    for ligand in &report.ligands {
        let (mark, detail) = if ligand.is_ok() {
            (
                "\x1b[32m✓\x1b[0m",
                ligand
                    .poses
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            )
        } else {
            ("\x1b[31m✗\x1b[0m", ligand.failures[0].to_string())
        };

        let _ = writeln!(
            out,
            "{INDENT}{mark} {:<NAME_WIDTH$} {}",
            truncate(&ligand.ligand, NAME_WIDTH),
            truncate(&detail, DETAIL_WIDTH),
        );
    }

    let _ = writeln!(
        out,
        "{INDENT}{} docked, {} failed",
        report.succeeded(),
        report.failed()
    );
    let _ = writeln!(out);
}

pub fn print_contacts_summary(report: &ContactsReport) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    let _ = writeln!(out);
    let _ = writeln!(out, "{INDENT}\x1b[1mContact Analysis Summary\x1b[0m");

    for replica in &report.replicas {
        let (mark, detail) = match &replica.error {
            None => (
                "\x1b[32m✓\x1b[0m",
                replica.output.display().to_string(),
            ),
            Some(error) => ("\x1b[31m✗\x1b[0m", error.to_string()),
        };

        let _ = writeln!(
            out,
            "{INDENT}{mark} rep {:<NAME_WIDTH$} {}",
            truncate(&replica.replica, NAME_WIDTH),
            truncate(&detail, DETAIL_WIDTH),
        );
    }

    let _ = writeln!(
        out,
        "{INDENT}{} analyzed, {} failed",
        report.succeeded(),
        report.failed()
    );
    let _ = writeln!(out);
}
