//! External solver interfaces.
//!
//! This module provides a unified interface for obtaining a perturbation
//! energy ladder from an external quantum-chemistry program. It abstracts
//! the program-specific details behind one trait:
//!
//! - Writing the solver input deck
//! - Executing the solver
//! - Parsing the solver output into a [`Wavefunction`]
//!
//! # Supported Programs
//!
//! - **Psi4**: full support. The generated deck asks for SCF and MP2..MPn
//!   energies and appends an epilogue that prints the wavefunction data
//!   (orbital counts, orbital energies, core-Hamiltonian diagonal, optional
//!   spin-orbital integrals) as machine-readable lines in the output file.
//! - **Custom**: JSON-configured command, input template and energy regex
//!   patterns for any solver that can print its energies to a log file.
//!   Custom interfaces supply the energy ladder only.
//!
//! # Error Handling
//!
//! All operations return a [`QMError`]:
//! - `Io`: file system errors (missing files, permission issues)
//! - `Calculation`: solver execution failures (nonzero exit status,
//!   convergence failure or memory exhaustion reported in the output)
//! - `Parse`: output parsing errors (malformed or incomplete output)
//!
//! Upstream solver failures abort the run; there are no retries.

use crate::config::{Config, SolverProgram};
use crate::geometry::MoleculeSpec;
use crate::settings::SettingsManager;
use crate::wavefunction::{SpinOrbitalTensor, Wavefunction};
use lazy_static::lazy_static;
use log::debug;
use nalgebra::DVector;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Error type for solver interface operations.
#[derive(Error, Debug)]
pub enum QMError {
    /// File system or I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Solver execution failed
    #[error("Solver calculation failed: {0}")]
    Calculation(String),
    /// Failed to parse solver output
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Type alias for solver operation results
type Result<T> = std::result::Result<T, QMError>;

/// Trait that defines the interface to an external solver.
///
/// Implementations handle the complete lifecycle of one single-point ladder
/// calculation: input generation, execution and output parsing.
pub trait QMInterface {
    /// Writes the solver input deck for the given molecule and configuration.
    fn write_input(&self, molecule: &MoleculeSpec, config: &Config, path: &Path) -> Result<()>;

    /// Executes the solver and waits for completion.
    ///
    /// Fails with [`QMError::Calculation`] when the program cannot be
    /// started or exits with a nonzero status.
    fn run_calculation(&self, input_path: &Path, output_path: &Path) -> Result<()>;

    /// Parses the solver output file into a [`Wavefunction`].
    fn read_output(&self, output_path: &Path, config: &Config) -> Result<Wavefunction>;
}

lazy_static! {
    // Robust floating-point regex: handles 1.23, -0.032, 1.2e-4, .123, etc.
    static ref FLOAT_RE: String = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?".to_string();

    // Ladder line from the deck epilogue: "energy MP3 -54.993185073005"
    static ref ENERGY_RE: Regex =
        Regex::new(&format!(r"^\s*energy\s+(\S+)\s+({0})\s*$", *FLOAT_RE)).unwrap();

    // Integral line: "eri 0 1 1 0 0.25"
    static ref ERI_RE: Regex = Regex::new(&format!(
        r"^\s*eri\s+(\d+)\s+(\d+)\s+(\d+)\s+(\d+)\s+({0})\s*$",
        *FLOAT_RE
    )).unwrap();
}

/// Markers that identify a failed solver run inside an otherwise readable
/// output file. Psi4 exits nonzero on most failures, but a truncated queue
/// job can leave a zero-status wrapper with the error only in the text.
const FAILURE_MARKERS: [&str; 3] = ["Psi4 encountered an error", "PsiException", "Fatal Error"];

/// Psi4 solver interface.
///
/// Generates a Psithon deck, runs `psi4 <input> <output>` and parses the
/// machine-readable lines the deck epilogue printed into the output file.
///
/// # Examples
///
/// ```
/// use mpconv::qm_interface::Psi4Interface;
///
/// let psi4 = Psi4Interface::new("psi4".to_string());
/// ```
pub struct Psi4Interface {
    /// Psi4 command to execute (e.g. "psi4", "/opt/psi4/bin/psi4")
    pub command: String,
}

impl Psi4Interface {
    /// Creates a new Psi4 interface wrapping the given executable command.
    pub fn new(command: String) -> Self {
        Self { command }
    }

    /// Render the complete Psithon input deck.
    ///
    /// The deck has four parts: the memory directive, the molecule block
    /// (always with `symmetry c1`, since the spin-orbital dump assumes no
    /// point-group blocking), the option block, and the epilogue that
    /// requests the energy ladder and prints wavefunction data in the line
    /// formats [`Psi4Interface::read_output`] parses back.
    pub fn render_deck(&self, molecule: &MoleculeSpec, config: &Config) -> String {
        let mut deck = String::new();

        deck.push_str(&format!("memory {}\n\n", config.mem));

        deck.push_str("molecule mol {\n");
        deck.push_str(&format!("{} {}\n", config.charge, config.multiplicity));
        deck.push_str(&molecule.to_coordinate_lines());
        deck.push_str("symmetry c1\n");
        deck.push_str("}\n\n");

        deck.push_str("set {\n");
        deck.push_str(&format!("    basis {}\n", config.basis));
        deck.push_str(&format!("    scf_type {}\n", config.scf_type));
        deck.push_str(&format!("    mp2_type {}\n", config.mp2_type));
        deck.push_str(&format!("    freeze_core {}\n", config.freeze_core));
        deck.push_str(&format!(
            "    e_convergence {:e}\n",
            config.convergence.e_convergence
        ));
        deck.push_str(&format!(
            "    d_convergence {:e}\n",
            config.convergence.d_convergence
        ));
        deck.push_str("}\n\n");

        deck.push_str("import numpy as np\n\n");
        deck.push_str("scf_e, wfn = energy('scf', return_wfn=True)\n");
        deck.push_str("mints = psi4.core.MintsHelper(wfn.basisset())\n");
        deck.push_str("nmo = wfn.nmo()\n");
        deck.push_str("ndocc = wfn.doccpi()[0]\n");
        deck.push_str("nso = 2 * nmo\n");
        deck.push_str("nocc = 2 * ndocc\n");
        deck.push_str("nvirt = nso - nocc\n");
        deck.push_str("eps = np.repeat(np.asarray(wfn.epsilon_a()), 2)\n");
        deck.push_str("h = np.asarray(mints.ao_kinetic()) + np.asarray(mints.ao_potential())\n");
        deck.push_str("c = np.asarray(wfn.Ca())\n");
        deck.push_str("hdiag = np.repeat(np.dot(np.dot(c.T, h), c).diagonal(), 2)\n\n");

        deck.push_str("psi4.core.print_out(\"nso %d\\n\" % nso)\n");
        deck.push_str("psi4.core.print_out(\"nocc %d\\n\" % nocc)\n");
        deck.push_str("psi4.core.print_out(\"nvirt %d\\n\" % nvirt)\n");
        deck.push_str(
            "psi4.core.print_out(\"eocc %s\\n\" % \" \".join(\"%.12g\" % x for x in eps[:nocc]))\n",
        );
        deck.push_str(
            "psi4.core.print_out(\"evirt %s\\n\" % \" \".join(\"%.12g\" % x for x in eps[nocc:]))\n",
        );
        deck.push_str("psi4.core.print_out(\"hfe %.11f\\n\" % wfn.energy())\n");
        deck.push_str(
            "psi4.core.print_out(\"enuc %.12g\\n\" % mol.nuclear_repulsion_energy())\n",
        );
        deck.push_str(
            "psi4.core.print_out(\"hdiag %s\\n\" % \" \".join(\"%.12g\" % x for x in hdiag[:nocc]))\n\n",
        );

        if config.print_integrals {
            deck.push_str("iso = np.asarray(mints.mo_spin_eri(wfn.Ca(), wfn.Ca()))\n");
            deck.push_str("for i in range(nso):\n");
            deck.push_str("    for a in range(nso):\n");
            deck.push_str("        for j in range(nso):\n");
            deck.push_str("            for b in range(nso):\n");
            deck.push_str(
                "                psi4.core.print_out(\"eri %d %d %d %d %.12g\\n\" % (i, j, a, b, iso[i, j, a, b]))\n",
            );
            deck.push('\n');
        }

        for label in config.energy_labels() {
            deck.push_str(&format!(
                "psi4.core.print_out(\"energy {} %.12f\\n\" % energy('{}'))\n",
                label,
                label.to_lowercase()
            ));
        }

        deck
    }
}

impl QMInterface for Psi4Interface {
    fn write_input(&self, molecule: &MoleculeSpec, config: &Config, path: &Path) -> Result<()> {
        let deck = self.render_deck(molecule, config);
        fs::write(path, deck)?;
        Ok(())
    }

    fn run_calculation(&self, input_path: &Path, output_path: &Path) -> Result<()> {
        debug!(
            "running {} {} {}",
            self.command,
            input_path.display(),
            output_path.display()
        );
        let output = Command::new(&self.command)
            .arg(input_path)
            .arg(output_path)
            .output()?;

        if !output.status.success() {
            return Err(QMError::Calculation(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(())
    }

    fn read_output(&self, output_path: &Path, config: &Config) -> Result<Wavefunction> {
        let content = fs::read_to_string(output_path)
            .map_err(|e| QMError::Parse(format!("Failed to read solver output: {}", e)))?;

        for marker in FAILURE_MARKERS {
            if let Some(line) = content.lines().find(|l| l.contains(marker)) {
                return Err(QMError::Calculation(format!(
                    "solver reported a failure: {}",
                    line.trim()
                )));
            }
        }

        let mut scf_energy = 0.0_f64;
        let mut nuclear_repulsion = 0.0_f64;
        let mut nso = 0_usize;
        let mut nocc = 0_usize;
        let mut nvirt = 0_usize;
        let mut eocc: Vec<f64> = Vec::new();
        let mut evirt: Vec<f64> = Vec::new();
        let mut hcore_diag: Vec<f64> = Vec::new();
        let mut ladder: Vec<(String, f64)> = Vec::new();
        let mut eri: Option<SpinOrbitalTensor> = None;

        for line in content.lines() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix("nso ") {
                nso = parse_count(rest, "nso")?;
            } else if let Some(rest) = trimmed.strip_prefix("nocc ") {
                nocc = parse_count(rest, "nocc")?;
            } else if let Some(rest) = trimmed.strip_prefix("nvirt ") {
                nvirt = parse_count(rest, "nvirt")?;
            } else if let Some(rest) = trimmed.strip_prefix("eocc ") {
                eocc = parse_float_list(rest, "eocc")?;
            } else if let Some(rest) = trimmed.strip_prefix("evirt ") {
                evirt = parse_float_list(rest, "evirt")?;
            } else if let Some(rest) = trimmed.strip_prefix("hfe ") {
                scf_energy = parse_float(rest, "hfe")?;
            } else if let Some(rest) = trimmed.strip_prefix("enuc ") {
                nuclear_repulsion = parse_float(rest, "enuc")?;
            } else if let Some(rest) = trimmed.strip_prefix("hdiag ") {
                hcore_diag = parse_float_list(rest, "hdiag")?;
            } else if let Some(caps) = ERI_RE.captures(trimmed) {
                if nso == 0 {
                    return Err(QMError::Parse(
                        "integral line appeared before the nso count".into(),
                    ));
                }
                let tensor = eri.get_or_insert_with(|| SpinOrbitalTensor::new(nso));
                let i = parse_count(&caps[1], "eri index")?;
                let j = parse_count(&caps[2], "eri index")?;
                let a = parse_count(&caps[3], "eri index")?;
                let b = parse_count(&caps[4], "eri index")?;
                if [i, j, a, b].iter().any(|&idx| idx >= nso) {
                    return Err(QMError::Parse(format!(
                        "integral index out of range in line '{}'",
                        trimmed
                    )));
                }
                tensor.set(i, j, a, b, parse_float(&caps[5], "eri value")?);
            } else if let Some(caps) = ENERGY_RE.captures(trimmed) {
                ladder.push((caps[1].to_string(), parse_float(&caps[2], "energy")?));
            }
        }

        // Keep the ladder in the requested order and insist on completeness;
        // a missing rung means the solver silently skipped a method.
        let mut ordered = Vec::new();
        for label in config.energy_labels() {
            match ladder.iter().find(|(l, _)| *l == label) {
                Some((_, value)) => ordered.push((label, *value)),
                None => {
                    return Err(QMError::Parse(format!(
                        "{} energy not found in solver output",
                        label
                    )))
                }
            }
        }

        if scf_energy == 0.0 {
            if let Some((_, hf)) = ordered.first() {
                scf_energy = *hf;
            }
        }

        let mut orbital_energies = eocc;
        orbital_energies.extend_from_slice(&evirt);

        Ok(Wavefunction {
            scf_energy,
            nuclear_repulsion,
            nso,
            nocc,
            nvirt,
            orbital_energies: DVector::from_vec(orbital_energies),
            hcore_diag: DVector::from_vec(hcore_diag),
            energies: ordered,
            eri,
        })
    }
}

fn parse_count(text: &str, what: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| QMError::Parse(format!("Invalid {} value: '{}'", what, text.trim())))
}

fn parse_float(text: &str, what: &str) -> Result<f64> {
    text.trim()
        .parse()
        .map_err(|_| QMError::Parse(format!("Invalid {} value: '{}'", what, text.trim())))
}

fn parse_float_list(text: &str, what: &str) -> Result<Vec<f64>> {
    text.split_whitespace()
        .map(|token| parse_float(token, what))
        .collect()
}

/// One labeled energy pattern of a custom interface configuration.
///
/// The regex must contain a capture group for the numeric value; the factor
/// converts the captured value to hartree.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EnergyPattern {
    /// Ladder label this pattern yields (e.g. "HF", "MP2")
    pub label: String,
    /// Regex locating the energy; capture group 1 is the value
    pub pattern: String,
    /// Unit conversion factor (multiply by this to get hartree)
    pub unit_factor: f64,
}

/// Configuration for custom solver interfaces.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CustomInterfaceConfig {
    /// Name of the solver program
    pub name: String,
    /// Command to run the program
    pub command: String,
    /// Input file template. Supported placeholders: `{memory}`, `{charge}`,
    /// `{multiplicity}`, `{molecule}`, `{basis}`
    pub input_template: String,
    /// Output file extension (e.g. "log", "out")
    pub output_extension: String,
    /// One pattern per ladder entry, reference first
    pub energy_patterns: Vec<EnergyPattern>,
    /// Optional pattern for the nuclear repulsion energy
    pub nuclear_repulsion_pattern: Option<String>,
}

/// Custom solver interface configured from a JSON file.
///
/// Custom solvers provide the energy ladder only; orbital-level data and the
/// integral dump are Psi4 features.
pub struct CustomInterface {
    config: CustomInterfaceConfig,
    energy_regexes: Vec<(String, Regex, f64)>,
    enuc_regex: Option<Regex>,
}

impl CustomInterface {
    /// Creates a `CustomInterface` by loading its JSON configuration.
    ///
    /// # Errors
    ///
    /// Fails with [`QMError::Parse`] when the file cannot be read, the JSON
    /// is malformed, or a regex pattern does not compile.
    pub fn from_file(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path).map_err(|e| {
            QMError::Parse(format!("Failed to read custom interface config: {}", e))
        })?;

        let config: CustomInterfaceConfig = serde_json::from_str(&content).map_err(|e| {
            QMError::Parse(format!("Failed to parse custom interface config: {}", e))
        })?;

        let mut energy_regexes = Vec::new();
        for pattern in &config.energy_patterns {
            let regex = Regex::new(&pattern.pattern).map_err(|e| {
                QMError::Parse(format!(
                    "Invalid energy regex for {}: {}",
                    pattern.label, e
                ))
            })?;
            energy_regexes.push((pattern.label.clone(), regex, pattern.unit_factor));
        }

        let enuc_regex = match &config.nuclear_repulsion_pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                QMError::Parse(format!("Invalid nuclear repulsion regex: {}", e))
            })?),
            None => None,
        };

        Ok(Self {
            config,
            energy_regexes,
            enuc_regex,
        })
    }

    /// Name of the configured solver program.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Output file extension the configured solver produces.
    pub fn output_extension(&self) -> &str {
        &self.config.output_extension
    }
}

impl QMInterface for CustomInterface {
    fn write_input(&self, molecule: &MoleculeSpec, config: &Config, path: &Path) -> Result<()> {
        let input_content = self
            .config
            .input_template
            .replace("{memory}", &config.mem)
            .replace("{charge}", &config.charge.to_string())
            .replace("{multiplicity}", &config.multiplicity.to_string())
            .replace("{molecule}", molecule.to_coordinate_lines().trim_end())
            .replace("{basis}", &config.basis);

        fs::write(path, input_content)?;
        Ok(())
    }

    fn run_calculation(&self, input_path: &Path, _output_path: &Path) -> Result<()> {
        let output = Command::new(&self.config.command).arg(input_path).output()?;

        if !output.status.success() {
            return Err(QMError::Calculation(
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }
        Ok(())
    }

    fn read_output(&self, output_path: &Path, config: &Config) -> Result<Wavefunction> {
        if !output_path.exists() {
            return Err(QMError::Parse(format!(
                "{} output file not found: {}. Check that the calculation completed successfully.",
                self.config.name,
                output_path.display()
            )));
        }

        let content = fs::read_to_string(output_path).map_err(|e| {
            QMError::Parse(format!(
                "Failed to read {} output file {}: {}",
                self.config.name,
                output_path.display(),
                e
            ))
        })?;

        let mut ladder = Vec::new();
        for label in config.energy_labels() {
            let (_, regex, factor) = self
                .energy_regexes
                .iter()
                .find(|(l, _, _)| *l == label)
                .ok_or_else(|| {
                    QMError::Parse(format!(
                        "custom interface '{}' has no energy pattern for {}",
                        self.config.name, label
                    ))
                })?;

            let caps = regex.captures(&content).ok_or_else(|| {
                QMError::Parse(format!(
                    "{} energy pattern not found in {} output: {}",
                    label,
                    self.config.name,
                    output_path.display()
                ))
            })?;
            let raw = caps.get(1).ok_or_else(|| {
                QMError::Parse(format!(
                    "energy pattern for {} must have a capture group",
                    label
                ))
            })?;
            let value: f64 = raw.as_str().parse().map_err(|_| {
                QMError::Parse(format!(
                    "Failed to parse {} energy value '{}'",
                    label,
                    raw.as_str()
                ))
            })?;
            ladder.push((label, value * factor));
        }

        let nuclear_repulsion = match &self.enuc_regex {
            Some(regex) => regex
                .captures(&content)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0.0),
            None => 0.0,
        };

        let scf_energy = ladder.first().map(|(_, e)| *e).unwrap_or(0.0);

        Ok(Wavefunction {
            scf_energy,
            nuclear_repulsion,
            nso: 0,
            nocc: 0,
            nvirt: 0,
            orbital_energies: DVector::zeros(0),
            hcore_diag: DVector::zeros(0),
            energies: ladder,
            eri: None,
        })
    }
}

/// Build the solver interface selected by the configuration.
///
/// The solver command is resolved in precedence order: input-file override
/// (`psi4_comm` / `custom_comm`), then the site settings, then the built-in
/// default.
pub fn build_interface(
    config: &Config,
    settings: &SettingsManager,
) -> Result<Box<dyn QMInterface>> {
    match config.program {
        SolverProgram::Psi4 => {
            let command = config
                .program_commands
                .get("psi4")
                .cloned()
                .unwrap_or_else(|| settings.command_for(SolverProgram::Psi4).to_string());
            Ok(Box::new(Psi4Interface::new(command)))
        }
        SolverProgram::Custom => {
            if config.custom_interface_file.is_empty() {
                return Err(QMError::Parse(
                    "program = custom requires custom_interface_file".into(),
                ));
            }
            let mut interface =
                CustomInterface::from_file(Path::new(&config.custom_interface_file))?;
            if let Some(command) = config.program_commands.get("custom") {
                interface.config.command = command.clone();
            }
            Ok(Box::new(interface))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MoleculeSpec;
    use std::io::Write;

    fn nh_molecule() -> MoleculeSpec {
        MoleculeSpec::ZMatrix("N\nH 1 1.04\n".to_string())
    }

    #[test]
    fn test_deck_contains_molecule_options_and_ladder() {
        let psi4 = Psi4Interface::new("psi4".to_string());
        let deck = psi4.render_deck(&nh_molecule(), &Config::default());

        assert!(deck.starts_with("memory 2GB\n"));
        assert!(deck.contains("molecule mol {\n0 1\nN\nH 1 1.04\nsymmetry c1\n}"));
        assert!(deck.contains("basis 6-31G"));
        assert!(deck.contains("scf_type pk"));
        assert!(deck.contains("e_convergence 1e-8"));
        assert!(deck.contains("energy('mp6')"));
        assert!(!deck.contains("mo_spin_eri"));
    }

    #[test]
    fn test_deck_integral_dump_is_optional() {
        let psi4 = Psi4Interface::new("psi4".to_string());
        let config = Config {
            print_integrals: true,
            ..Config::default()
        };
        let deck = psi4.render_deck(&nh_molecule(), &config);
        assert!(deck.contains("mo_spin_eri"));
        assert!(deck.contains("eri %d %d %d %d"));
    }

    #[test]
    fn test_deck_truncated_ladder() {
        let psi4 = Psi4Interface::new("psi4".to_string());
        let config = Config {
            max_order: 3,
            ..Config::default()
        };
        let deck = psi4.render_deck(&nh_molecule(), &config);
        assert!(deck.contains("energy('mp3')"));
        assert!(!deck.contains("energy('mp4')"));
    }

    fn write_fixture(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_read_output_full_ladder() {
        let content = "\
nso 4
nocc 2
nvirt 2
eocc -0.6 -0.6
evirt 0.3 0.3
hfe -54.95941462988
enuc 3.5875
hdiag -1.2 -1.2
energy HF -54.959414629880
energy MP2 -55.075601460000
energy MP3 -55.093185070000
energy MP4 -55.098120000000
energy MP5 -55.099300000000
energy MP6 -55.099650000000
";
        let path = write_fixture("mpconv_test_psi4_full.out", content);
        let psi4 = Psi4Interface::new("psi4".to_string());
        let wfn = psi4.read_output(&path, &Config::default()).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(wfn.nso, 4);
        assert_eq!(wfn.energies.len(), 6);
        assert_eq!(wfn.energies[0].0, "HF");
        assert!((wfn.scf_energy + 54.95941462988).abs() < 1e-10);
        assert!((wfn.nuclear_repulsion - 3.5875).abs() < 1e-12);
        assert_eq!(wfn.orbital_energies.len(), 4);
        assert!(wfn.validate().is_ok());
    }

    #[test]
    fn test_read_output_missing_rung_is_a_parse_error() {
        let content = "\
hfe -54.95941462988
energy HF -54.959414629880
energy MP2 -55.075601460000
";
        let path = write_fixture("mpconv_test_psi4_missing.out", content);
        let psi4 = Psi4Interface::new("psi4".to_string());
        let err = psi4.read_output(&path, &Config::default()).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("MP3 energy not found"));
    }

    #[test]
    fn test_read_output_detects_solver_failure() {
        let content = "some banner\nPsiException: Could not converge SCF iterations\n";
        let path = write_fixture("mpconv_test_psi4_failed.out", content);
        let psi4 = Psi4Interface::new("psi4".to_string());
        let err = psi4.read_output(&path, &Config::default()).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, QMError::Calculation(_)));
        assert!(err.to_string().contains("Could not converge"));
    }

    #[test]
    fn test_read_output_collects_integrals() {
        let content = "\
nso 2
nocc 1
nvirt 1
eocc -0.6
evirt 0.3
hfe -1.12
enuc 0.71
hdiag -1.25
eri 0 1 1 0 0.25
energy HF -1.120000000000
energy MP2 -1.144000000000
energy MP3 -1.150000000000
energy MP4 -1.152000000000
energy MP5 -1.152500000000
energy MP6 -1.152600000000
";
        let path = write_fixture("mpconv_test_psi4_eri.out", content);
        let psi4 = Psi4Interface::new("psi4".to_string());
        let wfn = psi4.read_output(&path, &Config::default()).unwrap();
        fs::remove_file(&path).unwrap();

        let eri = wfn.eri.expect("tensor parsed");
        assert_eq!(eri.nso(), 2);
        assert_eq!(eri.get(0, 1, 1, 0), 0.25);
        assert_eq!(eri.get(0, 0, 0, 0), 0.0);
    }

    #[test]
    fn test_custom_interface_parses_configured_patterns() {
        let json = r#"{
            "name": "toyqc",
            "command": "toyqc",
            "input_template": "mem {memory}\ncharge {charge} mult {multiplicity}\nbasis {basis}\n{molecule}\n",
            "output_extension": "log",
            "energy_patterns": [
                {"label": "HF", "pattern": "HF energy\\s+=\\s+([-+0-9.eE]+)", "unit_factor": 1.0},
                {"label": "MP2", "pattern": "MP2 energy\\s+=\\s+([-+0-9.eE]+)", "unit_factor": 1.0}
            ],
            "nuclear_repulsion_pattern": "Enuc\\s+=\\s+([-+0-9.eE]+)"
        }"#;
        let config_path = write_fixture("mpconv_test_custom.json", json);
        let interface = CustomInterface::from_file(&config_path).unwrap();

        let output = "Enuc = 0.71\nHF energy = -1.12\nMP2 energy = -1.144\n";
        let output_path = write_fixture("mpconv_test_custom.log", output);

        let config = Config {
            program: SolverProgram::Custom,
            max_order: 2,
            ..Config::default()
        };
        let wfn = interface.read_output(&output_path, &config).unwrap();
        fs::remove_file(&config_path).unwrap();
        fs::remove_file(&output_path).unwrap();

        assert_eq!(wfn.energies.len(), 2);
        assert!((wfn.scf_energy + 1.12).abs() < 1e-12);
        assert!((wfn.nuclear_repulsion - 0.71).abs() < 1e-12);
        assert!(!wfn.has_orbital_data());
        assert!(wfn.validate().is_ok());
    }
}
