//! Solver result data: wavefunction-level quantities and the spin-orbital
//! integral tensor.
//!
//! Everything in this module is produced by the external solver and treated
//! as opaque numerical data. mpconv reshapes and re-emits it but never
//! interprets it: the orbital energies, core-Hamiltonian diagonal and
//! two-electron integrals are dumped, not computed.
//!
//! The one piece of arithmetic here is the ERI memory estimate. A spin-orbital
//! tensor scales as `nso^4`, which for even modest molecules can exceed the
//! configured memory limit; the estimate is checked before the tensor is
//! materialized so an oversized request aborts with a descriptive message
//! instead of exhausting memory mid-run.

use nalgebra::DVector;
use std::io::{self, Write};

/// Bytes-per-element scaling of the spin-orbital ERI tensor, expressed in GB.
const ERI_GB_PER_ELEMENT: f64 = 128e-9;
/// Working-set multiplier: transient copies made while the solver assembles
/// and antisymmetrizes the tensor.
const ERI_FOOTPRINT_FACTOR: f64 = 5.2;

/// Antisymmetrized two-electron integrals in the spin-orbital basis.
///
/// A dense four-index array of dimension `nso` in each index, stored flat in
/// row-major order. The tensor is pure pass-through data from the solver; the
/// only operation on it is the streaming export of every element.
#[derive(Debug, Clone)]
pub struct SpinOrbitalTensor {
    nso: usize,
    data: Vec<f64>,
}

impl SpinOrbitalTensor {
    /// Create a zero-filled tensor of dimension `nso`.
    pub fn new(nso: usize) -> Self {
        Self {
            nso,
            data: vec![0.0; nso * nso * nso * nso],
        }
    }

    /// Dimension of each of the four indices.
    pub fn nso(&self) -> usize {
        self.nso
    }

    fn offset(&self, i: usize, j: usize, a: usize, b: usize) -> usize {
        ((i * self.nso + j) * self.nso + a) * self.nso + b
    }

    /// Element accessor; indices are spin-orbital indices.
    pub fn get(&self, i: usize, j: usize, a: usize, b: usize) -> f64 {
        self.data[self.offset(i, j, a, b)]
    }

    /// Store one element; used while parsing the solver's integral dump.
    pub fn set(&mut self, i: usize, j: usize, a: usize, b: usize, value: f64) {
        let idx = self.offset(i, j, a, b);
        self.data[idx] = value;
    }

    /// Stream every element as an `eri i j a b value` line.
    ///
    /// The iteration order matches the solver dump: i, a, j, b with the last
    /// index fastest. Values use shortest-roundtrip float formatting.
    pub fn export<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for i in 0..self.nso {
            for a in 0..self.nso {
                for j in 0..self.nso {
                    for b in 0..self.nso {
                        writeln!(writer, "eri {} {} {} {} {}", i, j, a, b, self.get(i, j, a, b))?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Memory estimate for a spin-orbital ERI tensor.
#[derive(Debug, Clone, Copy)]
pub struct EriEstimate {
    /// Size of the tensor itself in GB
    pub tensor_gb: f64,
    /// Estimated peak working set in GB, including transient copies
    pub footprint_gb: f64,
}

impl EriEstimate {
    /// Check the estimated working set against a memory limit in GB.
    ///
    /// Returns a descriptive message on failure; the caller aborts the run.
    pub fn check(&self, limit_gb: f64) -> Result<(), String> {
        if self.footprint_gb > limit_gb {
            return Err(format!(
                "Estimated memory utilization ({:.2} GB) exceeds memory limit of {:.2} GB",
                self.footprint_gb, limit_gb
            ));
        }
        Ok(())
    }
}

/// Estimate the in-memory size of the spin-orbital ERI tensor for `nmo`
/// spatial molecular orbitals.
pub fn estimate_eri_size(nmo: usize) -> EriEstimate {
    let tensor_gb = (nmo as f64).powi(4) * ERI_GB_PER_ELEMENT;
    EriEstimate {
        tensor_gb,
        footprint_gb: tensor_gb * ERI_FOOTPRINT_FACTOR,
    }
}

/// All data extracted from one solver run.
///
/// Energies are in hartree. Orbital energies and the core-Hamiltonian
/// diagonal are in the spin-orbital picture (each spatial value doubled), as
/// produced by the solver epilogue. The cumulative energy ladder is ordered
/// reference first.
#[derive(Debug, Clone)]
pub struct Wavefunction {
    /// Converged SCF (Hartree-Fock) energy
    pub scf_energy: f64,
    /// Nuclear repulsion energy
    pub nuclear_repulsion: f64,
    /// Number of spin orbitals (2 x spatial orbitals)
    pub nso: usize,
    /// Number of occupied spin orbitals
    pub nocc: usize,
    /// Number of virtual spin orbitals
    pub nvirt: usize,
    /// Spin-orbital energies, occupied first, length `nso`
    pub orbital_energies: DVector<f64>,
    /// Diagonal of the MO core Hamiltonian over occupied spin orbitals,
    /// length `nocc`
    pub hcore_diag: DVector<f64>,
    /// Labeled cumulative energy ladder, reference first
    pub energies: Vec<(String, f64)>,
    /// Spin-orbital two-electron integrals, present when the dump was requested
    pub eri: Option<SpinOrbitalTensor>,
}

impl Wavefunction {
    /// True when the solver supplied orbital-level data (counts, orbital
    /// energies, core-Hamiltonian diagonal), not just the energy ladder.
    ///
    /// Custom interfaces typically report energies only; the spin-orbital
    /// summary is skipped for them.
    pub fn has_orbital_data(&self) -> bool {
        self.nso > 0
    }

    /// Occupied spin-orbital energies.
    pub fn occupied_energies(&self) -> &[f64] {
        &self.orbital_energies.as_slice()[..self.nocc.min(self.orbital_energies.len())]
    }

    /// Virtual spin-orbital energies.
    pub fn virtual_energies(&self) -> &[f64] {
        &self.orbital_energies.as_slice()[self.nocc.min(self.orbital_energies.len())..]
    }

    /// Validates that the wavefunction holds meaningful, internally
    /// consistent data.
    ///
    /// Catches the common failure modes where a solver run appears to succeed
    /// but the parsed result is unusable:
    /// - an empty energy ladder, or a ladder with non-finite entries
    /// - an exactly zero SCF energy (parse failure or uninitialized output)
    /// - orbital counts that disagree with each other or with the data
    ///   vectors
    pub fn validate(&self) -> Result<(), String> {
        if self.energies.is_empty() {
            return Err("wavefunction contains no energies; solver output parsing failed".into());
        }
        if self.scf_energy == 0.0 {
            return Err(
                "wavefunction contains zero SCF energy, indicating parsing failure or uninitialized output"
                    .into(),
            );
        }
        for (label, value) in &self.energies {
            if !value.is_finite() {
                return Err(format!("{} energy is not finite: {}", label, value));
            }
        }
        if self.has_orbital_data() {
            if self.nocc + self.nvirt != self.nso {
                return Err(format!(
                    "orbital count mismatch: nocc {} + nvirt {} != nso {}",
                    self.nocc, self.nvirt, self.nso
                ));
            }
            if self.orbital_energies.len() != self.nso {
                return Err(format!(
                    "expected {} spin-orbital energies, got {}",
                    self.nso,
                    self.orbital_energies.len()
                ));
            }
            if self.hcore_diag.len() != self.nocc {
                return Err(format!(
                    "expected {} core-Hamiltonian diagonal entries, got {}",
                    self.nocc,
                    self.hcore_diag.len()
                ));
            }
            if let Some(eri) = &self.eri {
                if eri.nso() != self.nso {
                    return Err(format!(
                        "integral tensor dimension {} does not match nso {}",
                        eri.nso(),
                        self.nso
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_wavefunction() -> Wavefunction {
        Wavefunction {
            scf_energy: -54.95,
            nuclear_repulsion: 3.58,
            nso: 4,
            nocc: 2,
            nvirt: 2,
            orbital_energies: DVector::from_vec(vec![-0.6, -0.6, 0.3, 0.3]),
            hcore_diag: DVector::from_vec(vec![-1.2, -1.2]),
            energies: vec![("HF".to_string(), -54.95), ("MP2".to_string(), -55.05)],
            eri: None,
        }
    }

    #[test]
    fn test_validate_accepts_consistent_data() {
        assert!(minimal_wavefunction().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_scf_energy() {
        let mut wfn = minimal_wavefunction();
        wfn.scf_energy = 0.0;
        assert!(wfn.validate().unwrap_err().contains("zero SCF energy"));
    }

    #[test]
    fn test_validate_rejects_orbital_count_mismatch() {
        let mut wfn = minimal_wavefunction();
        wfn.nvirt = 3;
        assert!(wfn.validate().unwrap_err().contains("orbital count mismatch"));
    }

    #[test]
    fn test_validate_rejects_nonfinite_ladder() {
        let mut wfn = minimal_wavefunction();
        wfn.energies.push(("MP3".to_string(), f64::NAN));
        assert!(wfn.validate().unwrap_err().contains("not finite"));
    }

    #[test]
    fn test_energy_only_wavefunction_is_valid() {
        let wfn = Wavefunction {
            scf_energy: -54.95,
            nuclear_repulsion: 0.0,
            nso: 0,
            nocc: 0,
            nvirt: 0,
            orbital_energies: DVector::zeros(0),
            hcore_diag: DVector::zeros(0),
            energies: vec![("HF".to_string(), -54.95)],
            eri: None,
        };
        assert!(!wfn.has_orbital_data());
        assert!(wfn.validate().is_ok());
    }

    #[test]
    fn test_eri_estimate_scaling_and_check() {
        let estimate = estimate_eri_size(10);
        assert!((estimate.tensor_gb - 1.28e-3).abs() < 1e-9);
        assert!(estimate.check(2.0).is_ok());

        let huge = estimate_eri_size(200);
        assert!(huge.check(2.0).is_err());
        assert!(huge.check(2.0).unwrap_err().contains("exceeds memory limit"));
    }

    #[test]
    fn test_tensor_roundtrip_and_export_order() {
        let mut tensor = SpinOrbitalTensor::new(2);
        tensor.set(0, 1, 1, 0, 0.25);
        assert_eq!(tensor.get(0, 1, 1, 0), 0.25);

        let mut buffer = Vec::new();
        tensor.export(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 16);
        // Iteration is i, a, j, b; the line layout stays "eri i j a b v".
        assert_eq!(lines[0], "eri 0 0 0 0 0");
        assert!(lines.contains(&"eri 0 1 1 0 0.25"));
    }
}
