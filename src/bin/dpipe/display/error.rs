use std::io::{self, Write};

use anyhow::Error;

use dockpipe::Error as PipelineError;

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    let msg = err.to_string();
    for line in wrap(&msg, 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 59) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    if let Some(hints) = collect_hints(err) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

fn collect_hints(err: &Error) -> Option<Vec<String>> {
    let mut hints = Vec::new();

    if let Some(pipeline_err) = err.downcast_ref::<PipelineError>() {
        collect_pipeline_hints(pipeline_err, &mut hints);
    } else {
        collect_fallback_hints(err, &mut hints);
    }

    if hints.is_empty() { None } else { Some(hints) }
}

fn collect_pipeline_hints(err: &PipelineError, hints: &mut Vec<String>) {
    let mut add = |hint: &str| hints.push(hint.to_string());

    match err {
        PipelineError::Io { source } => match source.kind() {
            io::ErrorKind::NotFound => {
                add("File or directory not found");
                add("Check the path spelling and ensure the file exists");
            }
            io::ErrorKind::PermissionDenied => {
                add("Permission denied accessing the file");
                add("Check file permissions with `ls -la`");
            }
            _ => {
                add("I/O operation failed");
                add("Check file paths, permissions, and disk space");
            }
        },

        PipelineError::RunFileParse(_) => {
            add("The run file is not valid TOML for this command");
            add("Check for missing quotes, brackets, or misspelled keys");
            add("Docking runs need [tools], [flex], and [grid] tables");
        }

        PipelineError::InvalidConfig { field, .. } => {
            add(&format!("Fix the '{field}' entry in the run file"));
            if *field == "flex.residues" {
                add("List the flexible side chains, e.g. [\"ASP114\", \"SER193\"]");
            }
            if field.starts_with("grid") {
                add("The grid box must be set before a run; there is no default");
            }
        }

        PipelineError::LigandList { .. } => {
            add("Pass the list with --ligands or set ligand_list in the run file");
            add("The list holds one ligand identifier per line");
        }

        PipelineError::DuplicateIdentifier { .. } => {
            add("Each identifier names a work directory or output file");
            add("Remove the repeated entry; artifacts would overwrite each other");
        }

        PipelineError::WorkDirExists { .. } => {
            add("A previous run already docked this ligand here");
            add("Remove the directory, or dock into a fresh --dir");
        }

        PipelineError::MissingInput { .. } => {
            add("Stage the file before running, or fix the path in the run file");
            add("Docking expects <receptor>.pdb and one <ligand>.sdf per entry");
        }

        PipelineError::Spawn { tool, .. } => {
            add(&format!("The {tool} executable could not be launched"));
            add("Check the [tools] paths in the run file");
            add("Tools resolved on PATH must be installed and executable");
        }

        PipelineError::ToolFailed { tool, .. } => {
            add(&format!("{tool} ran but did not finish successfully"));
            add("The end of its stderr is included in the message above");
            add("Earlier steps may have produced partial files in the work directory");
        }
    }
}

fn collect_fallback_hints(err: &Error, hints: &mut Vec<String>) {
    let msg = err.to_string().to_lowercase();

    if msg.contains("no such file") || msg.contains("not found") {
        hints.push("Check that the file path is correct".to_string());
        hints.push("Verify the file exists and is readable".to_string());
    } else if msg.contains("permission denied") {
        hints.push("Check file permissions with `ls -la`".to_string());
    }
}
