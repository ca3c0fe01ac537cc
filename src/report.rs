//! Text rendering of the derived reports.
//!
//! Three reports come out of one run:
//!
//! 1. the energy-series report (contributions, adjacent ratios, leading
//!    ratios) in its fixed line format;
//! 2. the spin-orbital summary (`nso`, `nocc`, `nvirt`, `eocc`, `evirt`,
//!    `hfe`, `enuc`, `hdiag` lines);
//! 3. the streaming integral dump, delegated to
//!    [`SpinOrbitalTensor::export`](crate::wavefunction::SpinOrbitalTensor::export).
//!
//! Rendering is pure string building: the same input yields byte-identical
//! output on every call. Only `main` writes to stdout.
//!
//! # Output contract
//!
//! The energy-series report consists of three groups separated by single
//! blank lines, each line `label:  value` with two spaces after the colon
//! and shortest-roundtrip float formatting:
//!
//! ```text
//! Hartree-Fock energy:  -54.959779
//! MP2 contribution:  -0.1162
//! ...
//!
//! HF/MP2:  472.93...
//! MP2/MP3:  ...
//!
//! MP2/MP3:  ...
//! MP2/MP4:  ...
//! ```
//!
//! Groups that would be empty (a reference-only series has no ratios) are
//! omitted together with their separator.

use crate::series::{EnergySeries, SeriesError};
use crate::wavefunction::{EriEstimate, Wavefunction};

/// Render the energy-series report: contributions, adjacent ratios and
/// leading ratios.
///
/// Fails when a ratio denominator is exactly zero; in that case no partial
/// report is produced (see the policy note in [`crate::series`]).
pub fn render_energy_report(series: &EnergySeries) -> Result<String, SeriesError> {
    let increments = series.increments();
    let adjacent = series.adjacent_ratios()?;
    let leading = series.leading_ratios()?;

    let mut out = String::new();
    for (i, label) in series.labels().iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("Hartree-Fock energy:  {}\n", increments[0]));
        } else {
            out.push_str(&format!("{} contribution:  {}\n", label, increments[i]));
        }
    }
    if !adjacent.is_empty() {
        out.push('\n');
        for (label, ratio) in &adjacent {
            out.push_str(&format!("{}:  {}\n", label, ratio));
        }
    }
    if !leading.is_empty() {
        out.push('\n');
        for (label, ratio) in &leading {
            out.push_str(&format!("{}:  {}\n", label, ratio));
        }
    }
    Ok(out)
}

/// Render the spin-orbital summary in the fixed `key value...` line format.
///
/// Orbital energies and the core-Hamiltonian diagonal are space-joined with
/// shortest-roundtrip formatting; the SCF energy keeps eleven decimals.
pub fn render_wavefunction_summary(wfn: &Wavefunction) -> String {
    let mut out = String::new();
    out.push_str(&format!("nso {}\n", wfn.nso));
    out.push_str(&format!("nocc {}\n", wfn.nocc));
    out.push_str(&format!("nvirt {}\n", wfn.nvirt));
    out.push_str(&format!("eocc {}\n", join_floats(wfn.occupied_energies())));
    out.push_str(&format!("evirt {}\n", join_floats(wfn.virtual_energies())));
    out.push_str(&format!("hfe {:.11}\n", wfn.scf_energy));
    out.push_str(&format!("enuc {}\n", wfn.nuclear_repulsion));
    out.push_str(&format!("hdiag {}\n", join_floats(wfn.hcore_diag.as_slice())));
    out
}

/// Render the ERI size estimate line printed before any integral work.
pub fn render_eri_estimate(estimate: &EriEstimate) -> String {
    format!(
        "# Size of the SO ERI tensor will be {:.2} GB.\n",
        estimate.tensor_gb
    )
}

fn join_floats(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::EnergySeries;
    use crate::wavefunction::estimate_eri_size;
    use nalgebra::DVector;

    fn full_series() -> EnergySeries {
        EnergySeries::new(vec![
            ("HF".to_string(), -100.0),
            ("MP2".to_string(), -100.5),
            ("MP3".to_string(), -100.75),
            ("MP4".to_string(), -100.875),
            ("MP5".to_string(), -100.9375),
            ("MP6".to_string(), -100.96875),
        ])
        .unwrap()
    }

    #[test]
    fn test_report_matches_line_contract() {
        let report = render_energy_report(&full_series()).unwrap();
        let expected = "\
Hartree-Fock energy:  -100
MP2 contribution:  -0.5
MP3 contribution:  -0.25
MP4 contribution:  -0.125
MP5 contribution:  -0.0625
MP6 contribution:  -0.03125

HF/MP2:  200
MP2/MP3:  2
MP3/MP4:  2
MP4/MP5:  2
MP5/MP6:  2

MP2/MP3:  2
MP2/MP4:  4
MP2/MP5:  8
MP2/MP6:  16
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_report_is_deterministic() {
        let series = full_series();
        let first = render_energy_report(&series).unwrap();
        let second = render_energy_report(&series).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reference_only_report_has_no_ratio_groups() {
        let series = EnergySeries::new(vec![("HF".to_string(), -100.0)]).unwrap();
        let report = render_energy_report(&series).unwrap();
        assert_eq!(report, "Hartree-Fock energy:  -100\n");
    }

    #[test]
    fn test_zero_increment_fails_the_whole_report() {
        let series = EnergySeries::new(vec![
            ("HF".to_string(), -100.0),
            ("MP2".to_string(), -100.5),
            ("MP3".to_string(), -100.5),
        ])
        .unwrap();
        assert!(render_energy_report(&series).is_err());
    }

    #[test]
    fn test_wavefunction_summary_layout() {
        let wfn = Wavefunction {
            scf_energy: -54.95912345678,
            nuclear_repulsion: 3.5875,
            nso: 4,
            nocc: 2,
            nvirt: 2,
            orbital_energies: DVector::from_vec(vec![-0.5, -0.5, 0.25, 0.25]),
            hcore_diag: DVector::from_vec(vec![-1.5, -1.5]),
            energies: vec![("HF".to_string(), -54.95912345678)],
            eri: None,
        };
        let summary = render_wavefunction_summary(&wfn);
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(lines[0], "nso 4");
        assert_eq!(lines[1], "nocc 2");
        assert_eq!(lines[2], "nvirt 2");
        assert_eq!(lines[3], "eocc -0.5 -0.5");
        assert_eq!(lines[4], "evirt 0.25 0.25");
        assert_eq!(lines[5], "hfe -54.95912345678");
        assert_eq!(lines[6], "enuc 3.5875");
        assert_eq!(lines[7], "hdiag -1.5 -1.5");
    }

    #[test]
    fn test_eri_estimate_line_format() {
        let line = render_eri_estimate(&estimate_eri_size(50));
        assert_eq!(line, "# Size of the SO ERI tensor will be 0.80 GB.\n");
    }
}
