//! Built-in help system.

/// Prints the short usage summary.
pub fn print_usage(program_name: &str) {
    println!("Usage:");
    println!("  {} <input_file>              Run a perturbation-series report", program_name);
    println!("  {} ci <geometry.xyz> [out]   Create a template input file", program_name);
    println!("  {} ci mpconv_config.cfg      Create a settings template", program_name);
    println!("  {} --help [topic]            Show help (topics: keywords, programs)", program_name);
}

/// Prints the input-file keyword reference.
pub fn print_keyword_help() {
    println!("Input file keywords (key = value, one per line):");
    println!();
    println!("  program          psi4 | custom                    (default: psi4)");
    println!("  mem              solver memory, e.g. 2GB           (default: 2GB)");
    println!("  basis            basis set name                    (default: 6-31G)");
    println!("  scf_type         SCF integral algorithm            (default: pk)");
    println!("  mp2_type         MP2 algorithm                     (default: conv)");
    println!("  freeze_core      true | false                      (default: false)");
    println!("  e_convergence    SCF energy threshold              (default: 1e-8)");
    println!("  d_convergence    SCF density threshold             (default: 1e-8)");
    println!("  max_order        highest MP order, 2..6            (default: 6)");
    println!("  print_integrals  dump spin-orbital ERIs            (default: false)");
    println!("  charge           molecular charge                  (default: 0)");
    println!("  mult             spin multiplicity                 (default: 1)");
    println!("  psi4_comm        Psi4 executable override");
    println!("  custom_interface_file   JSON config for program = custom");
    println!();
    println!("Molecule sections:");
    println!("  *GEOM ... *      Cartesian coordinates (El x y z per line, or @file.xyz)");
    println!("  *ZMAT ... *      Z-matrix, passed to the solver verbatim");
}

/// Prints the solver-program reference.
pub fn print_program_help() {
    println!("Solver programs:");
    println!();
    println!("  psi4    Full support: SCF + MP2..MP6 ladder, orbital data,");
    println!("          spin-orbital integral dump. Needs psi4 on PATH or psi4_comm.");
    println!();
    println!("  custom  Any solver that prints its energies to a log file.");
    println!("          Configure command, input template and energy regex patterns");
    println!("          in a JSON file (custom_interface_file). Energy ladder only.");
}
