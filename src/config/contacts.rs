//! Contact-analysis run configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Configuration for a batch contact-analysis run.
///
/// One GetContacts invocation per replica, all sharing a topology. The
/// replica's trajectory is expected at
/// `<traj_dir>/rep_<replica>/output_wrapped.xtc` and its contact table is
/// written to `<output_dir>/<replica>_ctcs.tsv`.
///
/// # Examples
///
/// ```
/// use dockpipe::ContactsConfig;
///
/// let config: ContactsConfig = toml::from_str(r#"
///     get_dynamic_contacts = "/opt/getcontacts/get_dynamic_contacts.py"
///     topology = "/data/sims/structure.psf"
///     traj_dir = "/data/sims"
///     replicas = ["1", "2", "3"]
/// "#).unwrap();
///
/// config.validate().unwrap();
/// assert_eq!(config.itypes, vec!["all"]);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// GetContacts entry script.
    pub get_dynamic_contacts: PathBuf,

    /// Topology file shared by every replica.
    pub topology: PathBuf,

    /// Root directory holding one `rep_<replica>/` subdirectory per replica.
    pub traj_dir: PathBuf,

    /// Replicas to analyze, in order.
    pub replicas: Vec<String>,

    /// Interaction types for `--itypes`. Defaults to `["all"]`.
    #[serde(default = "default_itypes")]
    pub itypes: Vec<String>,

    /// Directory receiving the per-replica contact tables.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl ContactsConfig {
    /// Loads and validates a contacts run file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Wrapped trajectory file for one replica.
    pub fn trajectory_path(&self, replica: &str) -> PathBuf {
        self.traj_dir
            .join(format!("rep_{replica}"))
            .join("output_wrapped.xtc")
    }

    /// Contact table written for one replica.
    pub fn output_path(&self, replica: &str) -> PathBuf {
        self.output_dir.join(format!("{replica}_ctcs.tsv"))
    }

    /// Checks the replica set and interaction types.
    pub fn validate(&self) -> Result<(), Error> {
        for (field, path) in [
            ("get_dynamic_contacts", &self.get_dynamic_contacts),
            ("topology", &self.topology),
            ("traj_dir", &self.traj_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::invalid_config(field, "must not be empty"));
            }
        }

        if self.replicas.is_empty() {
            return Err(Error::invalid_config(
                "replicas",
                "at least one replica is required",
            ));
        }
        for (index, replica) in self.replicas.iter().enumerate() {
            if replica.is_empty() || replica.contains(['/', '\\']) {
                return Err(Error::invalid_config(
                    "replicas",
                    format!("'{replica}' is not a valid replica identifier"),
                ));
            }
            if self.replicas[..index].contains(replica) {
                return Err(Error::DuplicateIdentifier {
                    id: replica.clone(),
                    entry: index + 1,
                });
            }
        }

        if self.itypes.is_empty() || self.itypes.iter().any(|t| t.is_empty()) {
            return Err(Error::invalid_config(
                "itypes",
                "interaction types must be non-empty",
            ));
        }

        Ok(())
    }
}

fn default_itypes() -> Vec<String> {
    vec![String::from("all")]
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_FILE: &str = r#"
        get_dynamic_contacts = "/opt/getcontacts/get_dynamic_contacts.py"
        topology = "/data/sims/structure.psf"
        traj_dir = "/data/sims"
        replicas = ["1", "2"]
    "#;

    fn parsed() -> ContactsConfig {
        toml::from_str(RUN_FILE).unwrap()
    }

    #[test]
    fn parses_with_defaults() {
        let config = parsed();
        config.validate().unwrap();
        assert_eq!(config.itypes, vec!["all"]);
        assert_eq!(config.output_dir, Path::new("."));
    }

    #[test]
    fn per_replica_paths_follow_the_layout() {
        let config = parsed();
        assert_eq!(
            config.trajectory_path("2"),
            Path::new("/data/sims/rep_2/output_wrapped.xtc")
        );
        assert_eq!(config.output_path("2"), Path::new("./2_ctcs.tsv"));
    }

    #[test]
    fn rejects_empty_replica_set() {
        let mut config = parsed();
        config.replicas.clear();
        assert!(matches!(
            config.validate(),
            Err(Error::InvalidConfig {
                field: "replicas",
                ..
            })
        ));
    }

    #[test]
    fn rejects_duplicate_replicas() {
        let mut config = parsed();
        config.replicas = vec!["1".into(), "2".into(), "1".into()];
        let err = config.validate().unwrap_err();
        match err {
            Error::DuplicateIdentifier { id, entry } => {
                assert_eq!(id, "1");
                assert_eq!(entry, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_pathlike_replica_names() {
        let mut config = parsed();
        config.replicas = vec!["../1".into()];
        assert!(config.validate().is_err());
    }
}
