//! Input file template generation.
//!
//! The `ci` command turns an XYZ geometry file into a ready-to-edit mpconv
//! input file carrying the default parameters, so a new job starts from a
//! complete, commented template instead of a blank page.

use crate::parser::{read_xyz_file, ParseError};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while creating an input template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// I/O error while reading the geometry or writing the template
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The geometry file could not be parsed
    #[error("Geometry error: {0}")]
    Geometry(#[from] ParseError),
    /// The geometry file holds no atoms
    #[error("no atoms found in {0}")]
    EmptyGeometry(String),
}

/// Creates a template input file from an XYZ geometry file.
///
/// The output path defaults to the geometry basename with an `.inp`
/// extension. Returns the path of the written template.
pub fn create_input_template(
    geometry_path: &Path,
    output_path: Option<&Path>,
) -> Result<PathBuf, TemplateError> {
    let (elements, coords) = read_xyz_file(geometry_path)?;
    if elements.is_empty() {
        return Err(TemplateError::EmptyGeometry(
            geometry_path.display().to_string(),
        ));
    }

    let output = match output_path {
        Some(path) => path.to_path_buf(),
        None => geometry_path.with_extension("inp"),
    };

    let mut template = String::from("*GEOM\n");
    for (i, element) in elements.iter().enumerate() {
        template.push_str(&format!(
            "{}  {:.8}  {:.8}  {:.8}\n",
            element,
            coords[3 * i],
            coords[3 * i + 1],
            coords[3 * i + 2]
        ));
    }
    template.push_str("*\n\n");
    template.push_str(
        "\
program = psi4
mem = 2GB
basis = 6-31G
scf_type = pk
mp2_type = conv
freeze_core = false
e_convergence = 1e-8
d_convergence = 1e-8
max_order = 6
print_integrals = false
charge = 0
mult = 1
",
    );

    fs::write(&output, template)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_template_from_xyz() {
        let xyz_path = std::env::temp_dir().join("mpconv_test_template.xyz");
        let mut file = fs::File::create(&xyz_path).unwrap();
        write!(file, "2\nhydrogen\nH 0.0 0.0 0.0\nH 0.0 0.0 0.74\n").unwrap();

        let out_path = std::env::temp_dir().join("mpconv_test_template.inp");
        let written = create_input_template(&xyz_path, Some(&out_path)).unwrap();
        let content = fs::read_to_string(&written).unwrap();
        fs::remove_file(&xyz_path).unwrap();
        fs::remove_file(&out_path).unwrap();

        assert!(content.starts_with("*GEOM\n"));
        assert!(content.contains("H  0.00000000  0.00000000  0.74000000"));
        assert!(content.contains("max_order = 6"));
    }

    #[test]
    fn test_empty_geometry_rejected() {
        let xyz_path = std::env::temp_dir().join("mpconv_test_template_empty.xyz");
        fs::write(&xyz_path, "0\nempty\n").unwrap();
        let result = create_input_template(&xyz_path, None);
        fs::remove_file(&xyz_path).unwrap();
        assert!(matches!(result, Err(TemplateError::EmptyGeometry(_))));
    }
}
