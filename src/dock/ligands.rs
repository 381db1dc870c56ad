//! Ligand identifier lists.
//!
//! One identifier per line, whitespace-trimmed, blank lines skipped. The
//! identifier names both the ligand's structure file (`<id>.sdf`) and its
//! work directory, so anything path-like is rejected and duplicates are an
//! error instead of a silent directory collision.

use std::fs;
use std::path::Path;

use crate::error::Error;

/// Reads a ligand identifier list from a text file.
pub fn read_ligand_list(path: &Path) -> Result<Vec<String>, Error> {
    let text = fs::read_to_string(path).map_err(|source| Error::LigandList {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ligand_list(&text)
}

fn parse_ligand_list(text: &str) -> Result<Vec<String>, Error> {
    let mut ligands: Vec<String> = Vec::new();

    for line in text.lines() {
        let id = line.trim();
        if id.is_empty() {
            continue;
        }
        if !valid_identifier(id) {
            return Err(Error::invalid_config(
                "ligand list",
                format!("'{id}' is not a valid ligand identifier"),
            ));
        }
        if ligands.iter().any(|known| known == id) {
            return Err(Error::DuplicateIdentifier {
                id: id.to_string(),
                entry: ligands.len() + 1,
            });
        }
        ligands.push(id.to_string());
    }

    Ok(ligands)
}

/// Usable as a file stem and directory name under the input directory.
pub(crate) fn valid_identifier(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\'])
        && !id.starts_with('-')
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn trims_and_skips_blank_lines() {
        let ligands = parse_ligand_list("  lig1 \n\nlig2\n   \nlig3").unwrap();
        assert_eq!(ligands, vec!["lig1", "lig2", "lig3"]);
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(parse_ligand_list("").unwrap().is_empty());
        assert!(parse_ligand_list("\n \n").unwrap().is_empty());
    }

    #[test]
    fn rejects_duplicates() {
        let err = parse_ligand_list("lig1\nlig2\nlig1\n").unwrap_err();
        match err {
            Error::DuplicateIdentifier { id, entry } => {
                assert_eq!(id, "lig1");
                assert_eq!(entry, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_pathlike_identifiers() {
        for bad in ["../lig1", "a/b", "-x", ".."] {
            assert!(parse_ligand_list(bad).is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn reads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ligands.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "lig1\nlig2").unwrap();

        assert_eq!(read_ligand_list(&path).unwrap(), vec!["lig1", "lig2"]);
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_ligand_list(Path::new("/nonexistent/ligands.txt")).unwrap_err();
        assert!(matches!(err, Error::LigandList { .. }));
        assert!(err.to_string().contains("/nonexistent/ligands.txt"));
    }
}
