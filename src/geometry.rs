//! Molecular geometry data structures.
//!
//! This module provides the types that describe the molecule handed to the
//! external solver:
//!
//! - [`Geometry`]: element symbols plus Cartesian coordinates
//! - [`MoleculeSpec`]: either a Cartesian [`Geometry`] or a verbatim Z-matrix
//!   block passed through to the solver untouched
//!
//! Coordinates are in Angstroms throughout; mpconv never converts units
//! because the geometry is an opaque input to the solver.

use nalgebra::DVector;

/// A molecular geometry with atomic elements and Cartesian coordinates.
///
/// Coordinates are stored flat as `[x1, y1, z1, x2, y2, z2, ...]` in a
/// `DVector<f64>`, in Angstroms.
///
/// # Examples
///
/// ```
/// use mpconv::geometry::Geometry;
///
/// let elements = vec!["O".to_string(), "H".to_string(), "H".to_string()];
/// let coords = vec![
///     0.0, 0.0, 0.0,
///     0.757, 0.586, 0.0,
///     -0.757, 0.586, 0.0,
/// ];
/// let geometry = Geometry::new(elements, coords);
/// assert_eq!(geometry.num_atoms, 3);
/// assert_eq!(geometry.get_atom_coords(0), [0.0, 0.0, 0.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Geometry {
    /// Chemical element symbols for each atom in order
    pub elements: Vec<String>,
    /// Flattened Cartesian coordinates [x1, y1, z1, x2, y2, z2, ...] in Angstroms
    pub coords: DVector<f64>,
    /// Number of atoms in the molecule
    pub num_atoms: usize,
}

impl Geometry {
    /// Create a new `Geometry` from an element list and a coordinate vector.
    ///
    /// # Panics
    ///
    /// Panics if `coords.len() != elements.len() * 3`.
    pub fn new(elements: Vec<String>, coords: Vec<f64>) -> Self {
        let num_atoms = elements.len();
        assert_eq!(coords.len(), num_atoms * 3);
        Self {
            elements,
            coords: DVector::from_vec(coords),
            num_atoms,
        }
    }

    /// Get the Cartesian coordinates of the atom at `atom_idx` (zero-based).
    pub fn get_atom_coords(&self, atom_idx: usize) -> [f64; 3] {
        let i = atom_idx * 3;
        [self.coords[i], self.coords[i + 1], self.coords[i + 2]]
    }

    /// Render the geometry as solver input lines, one `El  x  y  z` per atom.
    pub fn to_coordinate_lines(&self) -> String {
        let mut block = String::new();
        for i in 0..self.num_atoms {
            let coords = self.get_atom_coords(i);
            block.push_str(&format!(
                "{}  {:.8}  {:.8}  {:.8}\n",
                self.elements[i], coords[0], coords[1], coords[2]
            ));
        }
        block
    }
}

/// The molecule as it will be written into the solver input deck.
///
/// Small-molecule perturbation studies are commonly set up from internal
/// coordinates (`N`, `H 1 1.04`), so the Z-matrix form is kept verbatim and
/// passed through; mpconv does not interpret internal coordinates.
#[derive(Debug, Clone)]
pub enum MoleculeSpec {
    /// Explicit Cartesian geometry
    Cartesian(Geometry),
    /// Verbatim Z-matrix lines (no trailing blank lines, no symmetry marker)
    ZMatrix(String),
}

impl MoleculeSpec {
    /// True when no atoms or Z-matrix lines were supplied.
    pub fn is_empty(&self) -> bool {
        match self {
            MoleculeSpec::Cartesian(geom) => geom.num_atoms == 0,
            MoleculeSpec::ZMatrix(zmat) => zmat.trim().is_empty(),
        }
    }

    /// Render the coordinate portion of the solver molecule block.
    pub fn to_coordinate_lines(&self) -> String {
        match self {
            MoleculeSpec::Cartesian(geom) => geom.to_coordinate_lines(),
            MoleculeSpec::ZMatrix(zmat) => {
                let mut block = String::new();
                for line in zmat.lines() {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        block.push_str(trimmed);
                        block.push('\n');
                    }
                }
                block
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_coordinate_lines() {
        let geom = Geometry::new(
            vec!["N".to_string(), "H".to_string()],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 1.04],
        );
        let block = geom.to_coordinate_lines();
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("N  "));
        assert!(lines[1].contains("1.04000000"));
    }

    #[test]
    fn test_zmatrix_passthrough_strips_blank_lines() {
        let molecule = MoleculeSpec::ZMatrix("N\n\n  H 1 1.04  \n".to_string());
        assert_eq!(molecule.to_coordinate_lines(), "N\nH 1 1.04\n");
        assert!(!molecule.is_empty());
    }

    #[test]
    fn test_empty_specs() {
        assert!(MoleculeSpec::ZMatrix("  \n".to_string()).is_empty());
        assert!(MoleculeSpec::Cartesian(Geometry::new(vec![], vec![])).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_mismatched_coords_panic() {
        Geometry::new(vec!["H".to_string()], vec![0.0, 0.0]);
    }
}
