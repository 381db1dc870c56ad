//! Docking run configuration.
//!
//! A docking run file is a TOML document naming the receptor, the external
//! toolchain, the flexible side chains, and the grid box. Everything the
//! docking tools would otherwise receive as an empty or placeholder
//! argument is a required, validated field here: a run file that parses
//! but fails [`DockingConfig::validate`] never spawns a process or
//! creates a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Configuration for a batch docking run.
///
/// # Examples
///
/// ```
/// use dockpipe::DockingConfig;
///
/// let config: DockingConfig = toml::from_str(r#"
///     receptor = "receptor"
///
///     [tools]
///     adfr_bin = "/opt/ADFRsuite/bin"
///     vina = "/usr/local/bin/vina"
///     flex_receptor_script = "/opt/adt/prepare_flexreceptor.py"
///     gpf_script = "/opt/adt/prepare_gpf.py"
///
///     [flex]
///     residues = ["ASP114", "SER193"]
///
///     [grid]
///     npts = [40, 40, 40]
///     center = [12.5, 8.0, -3.2]
/// "#).unwrap();
///
/// config.validate().unwrap();
/// assert_eq!(config.search.exhaustiveness, 20);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockingConfig {
    /// Receptor base name; `<receptor>.pdb` must exist in the input
    /// directory, with hydrogens already placed.
    pub receptor: String,

    /// Default ligand list file, overridable on the command line.
    #[serde(default)]
    pub ligand_list: Option<PathBuf>,

    /// External toolchain locations.
    pub tools: DockingTools,

    /// Flexible side-chain selection.
    pub flex: FlexResidues,

    /// Docking grid box.
    pub grid: GridBox,

    /// Search engine tuning.
    #[serde(default)]
    pub search: SearchParams,
}

impl DockingConfig {
    /// Loads and validates a docking run file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every field the external tools cannot check for us.
    pub fn validate(&self) -> Result<(), Error> {
        if self.receptor.is_empty() {
            return Err(Error::invalid_config("receptor", "must not be empty"));
        }
        if !is_bare_name(&self.receptor) {
            return Err(Error::invalid_config(
                "receptor",
                format!(
                    "'{}' must be a base name without path separators",
                    self.receptor
                ),
            ));
        }

        self.tools.validate()?;
        self.flex.validate()?;
        self.grid.validate()?;
        self.search.validate()
    }
}

/// Locations of the five external docking tools.
///
/// `prepare_receptor`, `pythonsh`, and `autogrid4` are resolved inside
/// `adfr_bin`; the two AutoDockTools helper scripts are run through
/// `pythonsh` and named explicitly because they do not ship in that
/// directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DockingTools {
    /// ADFR suite `bin/` directory.
    pub adfr_bin: PathBuf,

    /// AutoDock Vina executable.
    pub vina: PathBuf,

    /// Ligand preparation script (Meeko). Defaults to
    /// `mk_prepare_ligand.py`, resolved on `PATH`.
    #[serde(default = "default_mk_prepare_ligand")]
    pub mk_prepare_ligand: PathBuf,

    /// `prepare_flexreceptor.py` helper script.
    pub flex_receptor_script: PathBuf,

    /// `prepare_gpf.py` helper script.
    pub gpf_script: PathBuf,
}

impl DockingTools {
    /// Path of the receptor preparation executable.
    pub fn prepare_receptor(&self) -> PathBuf {
        self.adfr_bin.join("prepare_receptor")
    }

    /// Path of the ADFR python interpreter used for the helper scripts.
    pub fn pythonsh(&self) -> PathBuf {
        self.adfr_bin.join("pythonsh")
    }

    /// Path of the grid map generator.
    pub fn autogrid(&self) -> PathBuf {
        self.adfr_bin.join("autogrid4")
    }

    fn validate(&self) -> Result<(), Error> {
        for (field, path) in [
            ("tools.adfr_bin", &self.adfr_bin),
            ("tools.vina", &self.vina),
            ("tools.mk_prepare_ligand", &self.mk_prepare_ligand),
            ("tools.flex_receptor_script", &self.flex_receptor_script),
            ("tools.gpf_script", &self.gpf_script),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::invalid_config(field, "must not be empty"));
            }
        }
        Ok(())
    }
}

fn default_mk_prepare_ligand() -> PathBuf {
    PathBuf::from("mk_prepare_ligand.py")
}

/// Flexible side-chain selection for the receptor splitter.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlexResidues {
    /// Residues to treat as flexible, e.g. `["ASP114", "SER193"]`.
    pub residues: Vec<String>,
}

impl FlexResidues {
    /// The splitter's `-s` selection string: residues joined with `_`.
    pub fn selection(&self) -> String {
        self.residues.join("_")
    }

    fn validate(&self) -> Result<(), Error> {
        if self.residues.is_empty() {
            return Err(Error::invalid_config(
                "flex.residues",
                "at least one flexible residue is required",
            ));
        }
        for residue in &self.residues {
            if !is_residue_token(residue) {
                return Err(Error::invalid_config(
                    "flex.residues",
                    format!("'{residue}' is not of the form ASP114"),
                ));
            }
        }
        Ok(())
    }
}

/// Three-letter uppercase residue code followed by a sequence number.
fn is_residue_token(token: &str) -> bool {
    let bytes = token.as_bytes();
    bytes.len() >= 4
        && bytes[..3].iter().all(u8::is_ascii_uppercase)
        && bytes[3..].iter().all(u8::is_ascii_digit)
}

fn is_bare_name(name: &str) -> bool {
    !name.contains(['/', '\\']) && name != "." && name != ".."
}

/// Docking grid box passed to the grid parameter generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridBox {
    /// Number of grid points along each axis.
    pub npts: [u32; 3],

    /// Cartesian center of the box, in angstroms.
    pub center: [f64; 3],
}

impl GridBox {
    /// The generator's `npts=x,y,z` parameter.
    pub fn npts_arg(&self) -> String {
        let [x, y, z] = self.npts;
        format!("npts={x},{y},{z}")
    }

    /// The generator's `gridcenter=x,y,z` parameter.
    pub fn center_arg(&self) -> String {
        let [x, y, z] = self.center;
        format!("gridcenter={x:.3},{y:.3},{z:.3}")
    }

    fn validate(&self) -> Result<(), Error> {
        if self.npts.iter().any(|&n| n == 0) {
            return Err(Error::invalid_config(
                "grid.npts",
                "box dimensions must be positive",
            ));
        }
        if self.center.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid_config(
                "grid.center",
                "coordinates must be finite",
            ));
        }
        Ok(())
    }
}

/// Vina search tuning; the defaults match a thorough flexible-residue run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParams {
    /// Search exhaustiveness (roughly proportional to run time).
    pub exhaustiveness: u32,

    /// Maximum number of binding modes to report.
    pub num_modes: u32,

    /// Maximum energy difference from the best mode, in kcal/mol.
    pub energy_range: f64,
}

impl SearchParams {
    fn validate(&self) -> Result<(), Error> {
        if self.exhaustiveness == 0 {
            return Err(Error::invalid_config(
                "search.exhaustiveness",
                "must be at least 1",
            ));
        }
        if self.num_modes == 0 {
            return Err(Error::invalid_config("search.num_modes", "must be at least 1"));
        }
        if !(self.energy_range > 0.0) {
            return Err(Error::invalid_config(
                "search.energy_range",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            exhaustiveness: 20,
            num_modes: 100,
            energy_range: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUN_FILE: &str = r#"
        receptor = "adora2a"
        ligand_list = "ligands.txt"

        [tools]
        adfr_bin = "/opt/ADFRsuite/bin"
        vina = "/usr/local/bin/vina"
        flex_receptor_script = "/opt/adt/prepare_flexreceptor.py"
        gpf_script = "/opt/adt/prepare_gpf.py"

        [flex]
        residues = ["ASP114", "SER193", "HIS393"]

        [grid]
        npts = [40, 42, 44]
        center = [12.5, 8.0, -3.2]
    "#;

    fn parsed() -> DockingConfig {
        toml::from_str(RUN_FILE).unwrap()
    }

    #[test]
    fn parses_and_validates() {
        let config = parsed();
        config.validate().unwrap();
        assert_eq!(config.receptor, "adora2a");
        assert_eq!(config.ligand_list.as_deref(), Some(Path::new("ligands.txt")));
    }

    #[test]
    fn search_defaults_match_a_thorough_run() {
        let config = parsed();
        assert_eq!(config.search.exhaustiveness, 20);
        assert_eq!(config.search.num_modes, 100);
        assert_eq!(config.search.energy_range, 4.0);
    }

    #[test]
    fn tool_paths_resolve_inside_adfr_bin() {
        let tools = parsed().tools;
        assert_eq!(
            tools.prepare_receptor(),
            Path::new("/opt/ADFRsuite/bin/prepare_receptor")
        );
        assert_eq!(tools.pythonsh(), Path::new("/opt/ADFRsuite/bin/pythonsh"));
        assert_eq!(tools.autogrid(), Path::new("/opt/ADFRsuite/bin/autogrid4"));
        assert_eq!(tools.mk_prepare_ligand, Path::new("mk_prepare_ligand.py"));
    }

    #[test]
    fn flex_selection_joins_with_underscores() {
        assert_eq!(parsed().flex.selection(), "ASP114_SER193_HIS393");
    }

    #[test]
    fn grid_args_are_deterministic() {
        let grid = parsed().grid;
        assert_eq!(grid.npts_arg(), "npts=40,42,44");
        assert_eq!(grid.center_arg(), "gridcenter=12.500,8.000,-3.200");
    }

    #[test]
    fn rejects_empty_flex_selection() {
        let mut config = parsed();
        config.flex.residues.clear();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                field: "flex.residues",
                ..
            }
        ));
    }

    #[test]
    fn rejects_malformed_residue_token() {
        for bad in ["asp114", "AS114", "ASP", "ASP11A", ""] {
            let mut config = parsed();
            config.flex.residues = vec![bad.to_string()];
            assert!(config.validate().is_err(), "accepted '{bad}'");
        }
    }

    #[test]
    fn rejects_degenerate_grid() {
        let mut config = parsed();
        config.grid.npts = [40, 0, 40];
        assert!(config.validate().is_err());

        let mut config = parsed();
        config.grid.center = [f64::NAN, 0.0, 0.0];
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_receptor_with_path_separators() {
        let mut config = parsed();
        config.receptor = "structures/adora2a".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_unknown_fields() {
        let with_extra = format!("{RUN_FILE}\nexhaustivness = 20\n");
        assert!(toml::from_str::<DockingConfig>(&with_extra).is_err());
    }
}
