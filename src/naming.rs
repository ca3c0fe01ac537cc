//! Dynamic file naming based on the input file basename.
//!
//! Solver input and output files are prefixed with the basename of the job
//! input file so that multiple jobs can run in the same directory without
//! clobbering each other's files.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use mpconv::naming::FileNaming;
//!
//! let naming = FileNaming::new(Path::new("nh_631g.inp"));
//! assert_eq!(naming.solver_input("dat"), "nh_631g_solver.dat");
//! assert_eq!(naming.solver_output("out"), "nh_631g_solver.out");
//! ```

use std::path::Path;

/// Manages derived file names for one job.
#[derive(Debug, Clone)]
pub struct FileNaming {
    basename: String,
}

impl FileNaming {
    /// Creates a `FileNaming` from the job input file path, using the file
    /// stem as the basename for every derived name.
    pub fn new(input_path: &Path) -> Self {
        let basename = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("mpconv_job")
            .to_string();

        Self { basename }
    }

    /// Returns the basename used for file naming.
    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// Solver input deck name: `{basename}_solver.{ext}`
    pub fn solver_input(&self, ext: &str) -> String {
        format!("{}_solver.{}", self.basename, ext)
    }

    /// Solver output file name: `{basename}_solver.{ext}`
    pub fn solver_output(&self, ext: &str) -> String {
        format!("{}_solver.{}", self.basename, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_from_path_with_directories() {
        let naming = FileNaming::new(Path::new("jobs/run1/water.inp"));
        assert_eq!(naming.basename(), "water");
        assert_eq!(naming.solver_input("dat"), "water_solver.dat");
    }

    #[test]
    fn test_fallback_basename() {
        let naming = FileNaming::new(Path::new(""));
        assert_eq!(naming.basename(), "mpconv_job");
    }
}
