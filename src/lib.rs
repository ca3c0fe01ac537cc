#![deny(missing_docs)]

//! mpconv - Møller-Plesset convergence driver and reporter
//!
//! mpconv drives an external quantum-chemistry solver through a ladder of
//! perturbation-theory calculations (Hartree-Fock reference plus MP2..MP6)
//! for a small molecule, then derives and prints convergence diagnostics:
//! the energy gained at each order and the ratios between successive gains.
//!
//! # Overview
//!
//! A perturbation series that converges well shrinks by a roughly constant
//! factor at every order; one that misbehaves does not. Watching the
//! increment ratios is the cheapest way to see which regime a molecule is
//! in. mpconv automates the bookkeeping:
//!
//! 1. write the solver input deck from a small section-based input file
//! 2. run the solver (Psi4 by default) as a one-shot batch job
//! 3. parse the cumulative energies and wavefunction data back out
//! 4. print the spin-orbital summary, the optional integral dump and the
//!    increment/ratio report
//!
//! All quantum chemistry happens inside the solver. mpconv contains no
//! integral evaluation, no SCF iteration and no perturbation theory; it
//! marshals inputs, reshapes outputs and formats text.
//!
//! # Quick Start
//!
//! ```no_run
//! use mpconv::parser::parse_input;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let input_data = parse_input(Path::new("nh.inp"))?;
//!     println!("ladder: {:?}", input_data.config.energy_labels());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Configuration structures
//! - [`geometry`] - Molecule data structures
//! - [`parser`] - Input file parsing
//! - [`qm_interface`] - External solver interfaces
//! - [`wavefunction`] - Solver result data and the integral tensor
//! - [`series`] - Energy increments and convergence ratios
//! - [`report`] - Text rendering of the reports
//! - [`naming`] - Derived file names
//! - [`settings`] - Site-wide INI settings
//! - [`validation`] - Pre-flight input validation
//! - [`template_generator`] - Input file templates
//! - [`help`] - Built-in help system
//!
//! # Input File Format
//!
//! ```text
//! *ZMAT
//! N
//! H 1 1.04
//! *
//!
//! program = psi4
//! mem = 2GB
//! basis = 6-31G
//! max_order = 6
//! ```
//!
//! See [`parser`] for the full keyword list.

pub mod config;
pub mod geometry;
/// Built-in help system
pub mod help;
/// Derived file names based on the input file basename
pub mod naming;
pub mod parser;
pub mod qm_interface;
pub mod report;
pub mod series;
/// Site-wide configuration management
pub mod settings;
/// Input file templates
pub mod template_generator;
/// Pre-flight input validation
pub mod validation;
pub mod wavefunction;

pub use config::Config;
pub use series::EnergySeries;
