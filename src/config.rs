//! Configuration structures for mpconv calculations.
//!
//! This module defines the structures that specify a perturbation-series
//! calculation, including:
//!
//! - [`Config`]: Main configuration structure with all parameters
//! - [`SolverProgram`]: Supported external quantum-chemistry solvers
//! - [`ConvergenceOptions`]: SCF/density convergence targets passed to the solver
//!
//! Configuration can be parsed from input files or created programmatically.
//! See the module-level documentation in [`parser`](crate::parser) for the
//! input file format.
//!
//! All numerical work happens inside the external solver; the values here are
//! marshaled verbatim into the solver input deck.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default basis set requested from the solver.
pub const DEFAULT_BASIS: &str = "6-31G";
/// Highest Møller-Plesset order the report supports.
pub const MAX_SUPPORTED_ORDER: usize = 6;

/// SCF convergence targets forwarded to the external solver.
///
/// Both criteria use the solver's conventions: `e_convergence` bounds the
/// energy change between SCF iterations and `d_convergence` bounds the
/// density change. The defaults are tight because a perturbation series up
/// to sixth order amplifies any noise left in the reference wavefunction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceOptions {
    /// Energy convergence threshold in hartree
    pub e_convergence: f64,
    /// Density convergence threshold
    pub d_convergence: f64,
}

impl Default for ConvergenceOptions {
    fn default() -> Self {
        Self {
            e_convergence: 1e-8,
            d_convergence: 1e-8,
        }
    }
}

/// Supported external quantum-chemistry solvers.
///
/// | Program | Energies | Notes |
/// |---------|----------|-------|
/// | `Psi4` | SCF, MP2-MP6 | Default; full wavefunction data and integral dump |
/// | `Custom` | configurable | JSON-configured command and output patterns |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverProgram {
    /// Psi4 (default, full feature support)
    Psi4,
    /// Custom (user-defined via JSON configuration)
    Custom,
}

/// Complete configuration for one mpconv run.
///
/// A run is a one-shot batch job: the solver is invoked once, its output is
/// parsed once, and the derived reports are printed. There is no optimization
/// loop and no restart handling.
///
/// Everything has a usable default; a minimal input file only needs a
/// geometry. The defaults reproduce a conventional small-molecule setup:
/// `6-31G` basis, conventional (`pk`/`conv`) integral algorithms, no frozen
/// core, tight convergence, full MP2-MP6 ladder.
///
/// # Examples
///
/// ```
/// use mpconv::config::{Config, SolverProgram};
///
/// let mut config = Config::default();
/// config.basis = "cc-pVDZ".to_string();
/// config.max_order = 4;
/// assert_eq!(config.program, SolverProgram::Psi4);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// External solver to drive
    pub program: SolverProgram,
    /// Memory allocation passed to the solver (e.g. "2GB"); also bounds the
    /// in-process spin-orbital integral tensor
    pub mem: String,
    /// Basis set name (solver convention, e.g. "6-31G")
    pub basis: String,
    /// SCF integral algorithm requested from the solver (e.g. "pk")
    pub scf_type: String,
    /// MP2 algorithm requested from the solver (e.g. "conv")
    pub mp2_type: String,
    /// Freeze core orbitals in the correlated calculations
    pub freeze_core: bool,
    /// SCF convergence targets
    pub convergence: ConvergenceOptions,
    /// Highest Møller-Plesset order to request (2..=6)
    pub max_order: usize,
    /// Dump the antisymmetrized spin-orbital two-electron integrals
    pub print_integrals: bool,
    /// Molecular charge
    pub charge: i32,
    /// Spin multiplicity (2S+1)
    pub multiplicity: usize,
    /// Custom command mappings for solver programs (input-file overrides)
    pub program_commands: HashMap<String, String>,
    /// Path to custom solver interface JSON configuration
    pub custom_interface_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            program: SolverProgram::Psi4,
            mem: "2GB".to_string(),
            basis: DEFAULT_BASIS.to_string(),
            scf_type: "pk".to_string(),
            mp2_type: "conv".to_string(),
            freeze_core: false,
            convergence: ConvergenceOptions::default(),
            max_order: MAX_SUPPORTED_ORDER,
            print_integrals: false,
            charge: 0,
            multiplicity: 1,
            program_commands: HashMap::new(),
            custom_interface_file: String::new(),
        }
    }
}

impl Config {
    /// Returns the labels of the energy ladder this configuration requests,
    /// reference first: `["HF", "MP2", ..., "MP{max_order}"]`.
    ///
    /// Order 1 never appears; at first order the Møller-Plesset correction is
    /// already contained in the Hartree-Fock energy.
    pub fn energy_labels(&self) -> Vec<String> {
        let mut labels = vec!["HF".to_string()];
        for order in 2..=self.max_order {
            labels.push(format!("MP{}", order));
        }
        labels
    }
}

/// Parses a memory specification such as `"2GB"`, `"512 MB"` or `"2048mb"`
/// into gigabytes.
///
/// Returns `None` when the string has no recognizable numeric part or unit.
/// A bare number is taken as gigabytes, matching the solver's convention for
/// unitless memory directives.
pub fn parse_memory_gb(mem: &str) -> Option<f64> {
    let trimmed = mem.trim();
    let split = trimmed
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    let value: f64 = number.trim().parse().ok()?;
    if value <= 0.0 {
        return None;
    }
    match unit.trim().to_lowercase().as_str() {
        "" | "gb" => Some(value),
        "mb" => Some(value / 1024.0),
        "kb" => Some(value / (1024.0 * 1024.0)),
        "tb" => Some(value * 1024.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_labels_cover_full_ladder() {
        let config = Config::default();
        assert_eq!(
            config.energy_labels(),
            vec!["HF", "MP2", "MP3", "MP4", "MP5", "MP6"]
        );
    }

    #[test]
    fn test_truncated_ladder_labels() {
        let config = Config {
            max_order: 3,
            ..Config::default()
        };
        assert_eq!(config.energy_labels(), vec!["HF", "MP2", "MP3"]);
    }

    #[test]
    fn test_parse_memory_units() {
        assert_eq!(parse_memory_gb("2GB"), Some(2.0));
        assert_eq!(parse_memory_gb("512 MB"), Some(0.5));
        assert_eq!(parse_memory_gb("2048mb"), Some(2.0));
        assert_eq!(parse_memory_gb("1tb"), Some(1024.0));
        assert_eq!(parse_memory_gb("4"), Some(4.0));
    }

    #[test]
    fn test_parse_memory_rejects_garbage() {
        assert_eq!(parse_memory_gb("lots"), None);
        assert_eq!(parse_memory_gb("-2GB"), None);
        assert_eq!(parse_memory_gb("2 bananas"), None);
    }
}
