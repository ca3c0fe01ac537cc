//! Input file parsing for mpconv jobs.
//!
//! Input files use a section-based format: starred section markers for the
//! molecule, followed by `key = value` parameters.
//!
//! # Input File Format
//!
//! ## Molecule sections
//!
//! Exactly one of `*GEOM` (Cartesian) or `*ZMAT` (internal coordinates,
//! passed to the solver verbatim) is required, terminated with `*`:
//!
//! ```text
//! *GEOM
//! O  0.0  0.0    0.0
//! H  0.757 0.586 0.0
//! H -0.757 0.586 0.0
//! *
//! ```
//!
//! ```text
//! *ZMAT
//! N
//! H 1 1.04
//! *
//! ```
//!
//! A `*GEOM` section can also reference an external XYZ file:
//!
//! ```text
//! *GEOM
//! @molecule.xyz
//! *
//! ```
//!
//! ## Parameters
//!
//! After the molecule section, `key = value` lines set calculation
//! parameters; unknown keys are ignored and `#` starts a comment line:
//!
//! ```text
//! program = psi4
//! mem = 2GB
//! basis = 6-31G
//! scf_type = pk
//! mp2_type = conv
//! freeze_core = false
//! e_convergence = 1e-8
//! d_convergence = 1e-8
//! max_order = 6
//! print_integrals = false
//! charge = 0
//! mult = 1
//! psi4_comm = psi4
//! ```

use crate::config::{Config, SolverProgram};
use crate::geometry::{Geometry, MoleculeSpec};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Error type for parsing operations.
#[derive(Error, Debug)]
pub enum ParseError {
    /// I/O error when reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Parse error with descriptive message
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Type alias for parse operation results
type Result<T> = std::result::Result<T, ParseError>;

/// Complete parsed input data from an mpconv input file.
pub struct InputData {
    /// Complete calculation configuration
    pub config: Config,
    /// Molecule handed to the solver
    pub molecule: MoleculeSpec,
}

/// Parse an mpconv input file.
///
/// Reads the molecule section and all `key = value` parameters. Section
/// markers are case-insensitive; parameter values keep their original case.
///
/// # Errors
///
/// Returns [`ParseError`] when the file cannot be read, a coordinate fails
/// to parse, both `*GEOM` and `*ZMAT` sections are present, or an external
/// geometry file is missing or malformed.
///
/// # Examples
///
/// ```no_run
/// use mpconv::parser::parse_input;
/// use std::path::Path;
///
/// let input_data = parse_input(Path::new("nh.inp")).unwrap();
/// println!("max order: {}", input_data.config.max_order);
/// ```
pub fn parse_input(path: &Path) -> Result<InputData> {
    let content = fs::read_to_string(path)?;
    let mut config = Config::default();
    let mut elements = Vec::new();
    let mut coords = Vec::new();
    let mut zmatrix = String::new();
    let mut saw_geom = false;
    let mut saw_zmat = false;

    let mut in_geom = false;
    let mut in_zmat = false;

    for line in content.lines() {
        let trimmed_lower = line.trim().to_lowercase();

        if trimmed_lower.starts_with('#') {
            continue;
        }

        if trimmed_lower == "*geom" {
            in_geom = true;
            saw_geom = true;
            continue;
        } else if trimmed_lower == "*zmat" {
            in_zmat = true;
            saw_zmat = true;
            continue;
        } else if trimmed_lower == "*" {
            in_geom = false;
            in_zmat = false;
            continue;
        }

        if in_geom {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(filename) = trimmed.strip_prefix('@') {
                let (ext_elements, ext_coords) = read_xyz_file(Path::new(filename.trim()))?;
                elements = ext_elements;
                coords = ext_coords;
            } else {
                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                if parts.len() < 4 {
                    return Err(ParseError::Parse(format!(
                        "Geometry line needs an element and three coordinates: '{}'",
                        trimmed
                    )));
                }
                elements.push(parts[0].to_string());
                for coord_str in &parts[1..4] {
                    coords.push(coord_str.parse().map_err(|_| {
                        ParseError::Parse(format!("Invalid coordinate: '{}'", coord_str))
                    })?);
                }
            }
        } else if in_zmat {
            if !line.trim().is_empty() {
                zmatrix.push_str(line.trim());
                zmatrix.push('\n');
            }
        } else if line.contains('=') {
            parse_parameter(line, &mut config)?;
        }
    }

    if saw_geom && saw_zmat {
        return Err(ParseError::Parse(
            "Input contains both *GEOM and *ZMAT sections; supply exactly one".into(),
        ));
    }

    let molecule = if saw_zmat {
        MoleculeSpec::ZMatrix(zmatrix)
    } else {
        MoleculeSpec::Cartesian(Geometry::new(elements, coords))
    };

    Ok(InputData { config, molecule })
}

fn parse_parameter(line: &str, config: &mut Config) -> Result<()> {
    let parts: Vec<&str> = line.splitn(2, '=').collect();
    if parts.len() != 2 {
        return Ok(());
    }

    let key = parts[0].trim().to_lowercase();
    let value = parts[1].trim();

    match key.as_str() {
        "program" => {
            config.program = match value.to_lowercase().as_str() {
                "psi4" => SolverProgram::Psi4,
                "custom" => SolverProgram::Custom,
                other => {
                    return Err(ParseError::Parse(format!(
                        "Unknown solver program: '{}'",
                        other
                    )))
                }
            };
        }
        "mem" => config.mem = value.to_string(),
        "basis" => config.basis = value.to_string(),
        "scf_type" => config.scf_type = value.to_string(),
        "mp2_type" => config.mp2_type = value.to_string(),
        "freeze_core" => config.freeze_core = parse_bool(value),
        "e_convergence" => {
            config.convergence.e_convergence = value.parse().unwrap_or(1e-8);
        }
        "d_convergence" => {
            config.convergence.d_convergence = value.parse().unwrap_or(1e-8);
        }
        "max_order" => {
            config.max_order = value.parse().map_err(|_| {
                ParseError::Parse(format!("Invalid max_order: '{}'", value))
            })?;
        }
        "print_integrals" => config.print_integrals = parse_bool(value),
        "charge" => config.charge = value.parse().unwrap_or(0),
        "mult" => config.multiplicity = value.parse().unwrap_or(1),
        "psi4_comm" => {
            config
                .program_commands
                .insert("psi4".to_string(), value.to_string());
        }
        "custom_comm" => {
            config
                .program_commands
                .insert("custom".to_string(), value.to_string());
        }
        "custom_interface_file" => config.custom_interface_file = value.to_string(),
        _ => {}
    }
    Ok(())
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1")
}

/// Read element symbols and coordinates from an XYZ file.
///
/// Accepts both bare coordinate lists and standard XYZ files with the atom
/// count and comment header; lines that do not start with an element symbol
/// are skipped.
pub fn read_xyz_file(path: &Path) -> Result<(Vec<String>, Vec<f64>)> {
    let content = fs::read_to_string(path)?;
    let mut elements = Vec::new();
    let mut coords = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || !line.chars().next().is_some_and(|c| c.is_alphabetic()) {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() >= 4 {
            elements.push(parts[0].to_string());
            for coord_str in &parts[1..4] {
                coords.push(coord_str.parse().map_err(|_| {
                    ParseError::Parse("Invalid coordinate in XYZ file".into())
                })?);
            }
        }
    }
    Ok((elements, coords))
}
