//! mpconv command-line interface.
//!
//! Two commands are supported:
//!
//! 1. **Input creation** (`mpconv ci <geometry.xyz> [output_file]`):
//!    creates a template input file from an XYZ geometry, or a settings
//!    template when the argument is `mpconv_config.cfg`.
//!
//! 2. **Report run** (`mpconv <input_file>`):
//!    drives the external solver and prints the perturbation-series report.
//!
//! Built-in help is available through `--help` with optional topics
//! (`keywords`, `programs`).
//!
//! The process exits 0 on success and 1 on any failure; upstream solver
//! failures are propagated with their message, never retried.

use log::{error, info};
use mpconv::config::parse_memory_gb;
use mpconv::naming::FileNaming;
use mpconv::parser::parse_input;
use mpconv::qm_interface::build_interface;
use mpconv::report::{render_energy_report, render_eri_estimate, render_wavefunction_summary};
use mpconv::series::EnergySeries;
use mpconv::settings::{create_settings_template, SettingsManager};
use mpconv::template_generator::create_input_template;
use mpconv::validation::validate_input;
use mpconv::wavefunction::estimate_eri_size;
use mpconv::help;
use mpconv::Config;
use std::env;
use std::io::{self, Write};
use std::path::Path;
use std::process;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        help::print_usage(&args[0]);
        process::exit(1);
    }

    check_help_flags(&args);

    let command = &args[1];

    match command.as_str() {
        "ci" => {
            if args.len() < 3 {
                eprintln!("Error: Missing file argument");
                help::print_usage(&args[0]);
                process::exit(1);
            }

            let file_arg = &args[2];

            if file_arg == "mpconv_config.cfg" {
                match create_settings_template() {
                    Ok(path) => {
                        println!("Settings template created: {}", path.display());
                    }
                    Err(e) => {
                        eprintln!("Error creating settings template: {}", e);
                        process::exit(1);
                    }
                }
            } else {
                let geometry_path = Path::new(file_arg);
                let output_path = args.get(3).map(Path::new);

                match create_input_template(geometry_path, output_path) {
                    Ok(output_file) => {
                        println!("Template input file created: {}", output_file.display());
                        println!("Edit the parameters, then run: {} {}", args[0], output_file.display());
                    }
                    Err(e) => {
                        eprintln!("Error creating template: {}", e);
                        process::exit(1);
                    }
                }
            }
        }
        _ => {
            if command.starts_with('-') {
                eprintln!("Error: Unknown option: {}", command);
                help::print_usage(&args[0]);
                process::exit(1);
            }
            let input_path = Path::new(&args[1]);
            if let Err(e) = run_report(input_path) {
                error!("run failed: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
    }
}

/// Check for help flags and print the requested topic.
fn check_help_flags(args: &[String]) {
    if args[1] != "--help" && args[1] != "-h" {
        return;
    }
    match args.get(2).map(String::as_str) {
        Some("keywords") => help::print_keyword_help(),
        Some("programs") => help::print_program_help(),
        _ => help::print_usage(&args[0]),
    }
    process::exit(0);
}

/// The one-shot driver flow: parse, validate, run the solver, report.
fn run_report(input_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    info!("Reading input file: {}", input_path.display());
    let input_data = parse_input(input_path)?;
    let mut config = input_data.config;
    let molecule = input_data.molecule;

    let settings = SettingsManager::load()?;
    if config.mem == Config::default().mem {
        config.mem = settings.settings().general.max_memory.clone();
    }
    validate_input(&config, &molecule)?;

    let naming = FileNaming::new(input_path);
    let solver_input = naming.solver_input(settings.input_extension(config.program));
    let solver_output = naming.solver_output(settings.output_extension(config.program));

    let interface = build_interface(&config, &settings)?;

    info!("Writing solver input: {}", solver_input);
    interface.write_input(&molecule, &config, Path::new(&solver_input))?;

    info!(
        "Running solver for the HF..MP{} ladder (this is the slow part)",
        config.max_order
    );
    let started = std::time::Instant::now();
    interface.run_calculation(Path::new(&solver_input), Path::new(&solver_output))?;
    info!(
        "Solver finished in {:.3} seconds",
        started.elapsed().as_secs_f64()
    );

    info!("Parsing solver output: {}", solver_output);
    let wavefunction = interface.read_output(Path::new(&solver_output), &config)?;
    wavefunction.validate().map_err(|e| {
        format!(
            "solver produced an unusable wavefunction: {}. Check {} for details.",
            e, solver_output
        )
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if wavefunction.has_orbital_data() {
        let estimate = estimate_eri_size(wavefunction.nso / 2);
        out.write_all(render_eri_estimate(&estimate).as_bytes())?;

        if config.print_integrals {
            let limit_gb = parse_memory_gb(&config.mem)
                .ok_or_else(|| format!("cannot parse memory specification '{}'", config.mem))?;
            estimate.check(limit_gb)?;
        }

        out.write_all(render_wavefunction_summary(&wavefunction).as_bytes())?;

        if config.print_integrals {
            match &wavefunction.eri {
                Some(tensor) => tensor.export(&mut out)?,
                None => {
                    return Err(
                        "print_integrals was requested but the solver output contains no integrals"
                            .into(),
                    )
                }
            }
        }
    }

    let series = EnergySeries::new(wavefunction.energies.clone())?;
    let report = render_energy_report(&series)?;
    if wavefunction.has_orbital_data() {
        out.write_all(b"\n")?;
    }
    out.write_all(report.as_bytes())?;

    info!("Report complete");
    Ok(())
}
