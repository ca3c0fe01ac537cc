//! Pre-flight validation of parsed input.
//!
//! Every check here runs before the solver is invoked, so a bad input fails
//! in milliseconds instead of after a converged SCF. The checks cover the
//! cross-field constraints the parser cannot express line by line.

use crate::config::{parse_memory_gb, Config, SolverProgram, MAX_SUPPORTED_ORDER};
use crate::geometry::MoleculeSpec;
use std::path::Path;
use thiserror::Error;

/// Errors reported by input validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Requested perturbation order is outside the supported range.
    #[error("max_order must be between 2 and {MAX_SUPPORTED_ORDER}, got {0}")]
    InvalidOrder(usize),
    /// Memory specification could not be interpreted.
    #[error("cannot parse memory specification '{0}' (expected e.g. '2GB', '512MB')")]
    InvalidMemory(String),
    /// No atoms or Z-matrix lines were supplied.
    #[error("input contains no molecule; add a *GEOM or *ZMAT section")]
    EmptyMolecule,
    /// Basis set name is missing.
    #[error("basis set must not be empty")]
    MissingBasis,
    /// Spin multiplicity of zero is meaningless.
    #[error("multiplicity must be at least 1")]
    InvalidMultiplicity,
    /// Custom program selected without an interface description.
    #[error("program = custom requires custom_interface_file")]
    MissingInterfaceFile,
    /// Custom interface file does not exist.
    #[error("custom interface file not found: {0}")]
    InterfaceFileNotFound(String),
}

/// Validates the configuration/molecule pair before any solver work.
pub fn validate_input(config: &Config, molecule: &MoleculeSpec) -> Result<(), ValidationError> {
    if !(2..=MAX_SUPPORTED_ORDER).contains(&config.max_order) {
        return Err(ValidationError::InvalidOrder(config.max_order));
    }
    if parse_memory_gb(&config.mem).is_none() {
        return Err(ValidationError::InvalidMemory(config.mem.clone()));
    }
    if molecule.is_empty() {
        return Err(ValidationError::EmptyMolecule);
    }
    if config.basis.trim().is_empty() {
        return Err(ValidationError::MissingBasis);
    }
    if config.multiplicity == 0 {
        return Err(ValidationError::InvalidMultiplicity);
    }
    if config.program == SolverProgram::Custom {
        if config.custom_interface_file.is_empty() {
            return Err(ValidationError::MissingInterfaceFile);
        }
        if !Path::new(&config.custom_interface_file).exists() {
            return Err(ValidationError::InterfaceFileNotFound(
                config.custom_interface_file.clone(),
            ));
        }
    }
    Ok(())
}
