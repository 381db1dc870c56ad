//! Batch contact analysis over simulation replicas.
//!
//! One GetContacts invocation per replica against a shared topology; each
//! replica's contact table lands at `<output_dir>/<replica>_ctcs.tsv`. A
//! replica's failure is recorded and the batch moves on — replicas are
//! independent trajectories, so one bad trajectory never blocks the rest.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::config::ContactsConfig;
use crate::error::Error;
use crate::exec::{Invocation, ToolRunner};

/// Outcome of one replica's contact analysis.
#[derive(Debug)]
pub struct ReplicaReport {
    /// The replica identifier.
    pub replica: String,
    /// The contact table written on success.
    pub output: PathBuf,
    /// The failure, if the invocation did not succeed.
    pub error: Option<Error>,
}

impl ReplicaReport {
    /// `true` if the analysis completed.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for ReplicaReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            None => write!(f, "replica {}: {}", self.replica, self.output.display()),
            Some(error) => write!(f, "replica {}: {error}", self.replica),
        }
    }
}

/// Outcomes for a whole replica set, in configured order.
#[derive(Debug, Default)]
pub struct ContactsReport {
    /// Per-replica outcomes.
    pub replicas: Vec<ReplicaReport>,
}

impl ContactsReport {
    /// Number of replicas analyzed successfully.
    pub fn succeeded(&self) -> usize {
        self.replicas.iter().filter(|r| r.is_ok()).count()
    }

    /// Number of replicas that failed.
    pub fn failed(&self) -> usize {
        self.replicas.len() - self.succeeded()
    }

    /// `true` if every replica succeeded.
    pub fn is_ok(&self) -> bool {
        self.failed() == 0
    }
}

/// A validated batch contact-analysis run.
#[derive(Debug)]
pub struct ContactsRun<'cfg> {
    config: &'cfg ContactsConfig,
}

impl<'cfg> ContactsRun<'cfg> {
    /// Validates the configuration. No side effects.
    pub fn new(config: &'cfg ContactsConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The replicas this run will analyze, in order.
    pub fn replicas(&self) -> &[String] {
        &self.config.replicas
    }

    /// Builds the GetContacts invocation for one replica.
    pub fn invocation(&self, replica: &str) -> Invocation {
        let config = self.config;
        let mut invocation = Invocation::new("get_dynamic_contacts", &config.get_dynamic_contacts)
            .arg("--topology")
            .arg(&config.topology)
            .arg("--trajectory")
            .arg(config.trajectory_path(replica))
            .arg("--itypes");
        for itype in &config.itypes {
            invocation = invocation.arg(itype);
        }
        invocation.arg("--output").arg(config.output_path(replica))
    }

    /// Analyzes one replica.
    pub fn analyze_replica(&self, replica: &str, runner: &dyn ToolRunner) -> ReplicaReport {
        let error = runner.run(&self.invocation(replica)).err();
        ReplicaReport {
            replica: replica.to_string(),
            output: self.config.output_path(replica),
            error,
        }
    }

    /// Analyzes every configured replica in order.
    ///
    /// Creates the output directory first; fails up front if the topology
    /// file is missing, since every replica shares it.
    pub fn analyze_all(&self, runner: &dyn ToolRunner) -> Result<ContactsReport, Error> {
        if !self.config.topology.is_file() {
            return Err(Error::missing_input(
                self.config.topology.clone(),
                "shared topology",
            ));
        }
        fs::create_dir_all(&self.config.output_dir)?;

        Ok(ContactsReport {
            replicas: self
                .config
                .replicas
                .iter()
                .map(|replica| self.analyze_replica(replica, runner))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use super::*;
    use crate::exec::testing::RecordingRunner;

    fn config(output_dir: &Path, topology: &Path) -> ContactsConfig {
        toml::from_str(&format!(
            r#"
            get_dynamic_contacts = "/opt/getcontacts/get_dynamic_contacts.py"
            topology = "{}"
            traj_dir = "/data/sims"
            replicas = ["1", "2"]
            output_dir = "{}"
            "#,
            topology.display(),
            output_dir.display(),
        ))
        .unwrap()
    }

    fn topology_file(dir: &Path) -> PathBuf {
        let path = dir.join("structure.psf");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "PSF").unwrap();
        path
    }

    #[test]
    fn one_invocation_per_replica_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &topology_file(dir.path()));
        let run = ContactsRun::new(&config).unwrap();
        let runner = RecordingRunner::default();

        let report = run.analyze_all(&runner).unwrap();

        assert!(report.is_ok());
        assert_eq!(report.succeeded(), 2);
        assert_eq!(runner.tools_run(), ["get_dynamic_contacts"; 2]);
        assert_eq!(report.replicas[0].output, dir.path().join("1_ctcs.tsv"));
        assert_eq!(report.replicas[1].output, dir.path().join("2_ctcs.tsv"));
    }

    #[test]
    fn invocation_requests_all_interaction_types() {
        let dir = tempfile::tempdir().unwrap();
        let topology = topology_file(dir.path());
        let config = config(dir.path(), &topology);
        let run = ContactsRun::new(&config).unwrap();

        let topology_arg = topology.display().to_string();
        let output_arg = dir.path().join("1_ctcs.tsv").display().to_string();
        let invocation = run.invocation("1");
        assert_eq!(
            invocation.arg_strings(),
            vec![
                "--topology",
                topology_arg.as_str(),
                "--trajectory",
                "/data/sims/rep_1/output_wrapped.xtc",
                "--itypes",
                "all",
                "--output",
                output_arg.as_str(),
            ]
        );
    }

    #[test]
    fn creates_the_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("results");
        let config = config(&output_dir, &topology_file(dir.path()));
        let run = ContactsRun::new(&config).unwrap();

        run.analyze_all(&RecordingRunner::default()).unwrap();
        assert!(output_dir.is_dir());
    }

    #[test]
    fn missing_topology_fails_before_any_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &dir.path().join("absent.psf"));
        let run = ContactsRun::new(&config).unwrap();
        let runner = RecordingRunner::default();

        let err = run.analyze_all(&runner).unwrap_err();
        assert!(matches!(err, Error::MissingInput { .. }));
        assert!(runner.calls.borrow().is_empty());
    }

    #[test]
    fn replica_failures_do_not_stop_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(dir.path(), &topology_file(dir.path()));
        let run = ContactsRun::new(&config).unwrap();
        let runner = RecordingRunner::failing(&["get_dynamic_contacts"]);

        let report = run.analyze_all(&runner).unwrap();

        assert_eq!(report.failed(), 2);
        assert_eq!(runner.calls.borrow().len(), 2);
        assert!(!report.is_ok());
    }

    #[test]
    fn empty_replica_set_is_rejected_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config(dir.path(), &topology_file(dir.path()));
        config.replicas.clear();
        assert!(ContactsRun::new(&config).is_err());
    }
}
