// SPDX-License-Identifier: Apache-2.0

//! Compares two BLIF networks output by output using simulation.

use std::path::Path;

use clap::ArgMatches;
use cutsel::blif::read_blif_path;
use cutsel::klut_sim::{check_equivalence, EquivOptions, EquivReport};

use crate::report_cli_error::{
    report_cli_error_and_exit, report_error_and_exit, EXIT_NOT_EQUIVALENT, EXIT_USAGE,
};

fn format_counterexample(bits: &[bool]) -> String {
    bits.iter().map(|b| if *b { '1' } else { '0' }).collect()
}

fn klut_equiv(lhs: &Path, rhs: &Path, options: &EquivOptions) -> anyhow::Result<EquivReport> {
    let lhs = read_blif_path(lhs)?;
    let rhs = read_blif_path(rhs)?;
    Ok(check_equivalence(&lhs, &rhs, options)?)
}

pub fn handle_klut_equiv(matches: &ArgMatches) {
    let lhs = Path::new(matches.get_one::<String>("lhs_blif").unwrap());
    let rhs = Path::new(matches.get_one::<String>("rhs_blif").unwrap());
    let mut options = EquivOptions::default();
    if let Some(samples) = matches.get_one::<String>("samples") {
        match samples.parse() {
            Ok(samples) => options.samples = samples,
            Err(e) => report_cli_error_and_exit(
                "invalid --samples value",
                Some("klut-equiv"),
                vec![("value", samples), ("error", &format!("{}", e))],
                EXIT_USAGE,
            ),
        }
    }
    if let Some(seed) = matches.get_one::<String>("seed") {
        match seed.parse() {
            Ok(seed) => options.seed = seed,
            Err(e) => report_cli_error_and_exit(
                "invalid --seed value",
                Some("klut-equiv"),
                vec![("value", seed), ("error", &format!("{}", e))],
                EXIT_USAGE,
            ),
        }
    }

    let report = match klut_equiv(lhs, rhs, &options) {
        Ok(report) => report,
        Err(e) => report_error_and_exit("klut-equiv", &e),
    };
    let method = if report.exhaustive {
        "exhaustive".to_string()
    } else {
        format!("{} random samples, seed {}", options.samples, options.seed)
    };
    if report.is_equivalent() {
        println!(
            "Equivalent: {} output(s) checked ({})",
            report.outputs_checked, method
        );
        return;
    }
    println!(
        "Not equivalent: {} output(s) checked ({})",
        report.outputs_checked, method
    );
    for name in &report.missing_outputs {
        println!("  missing output: {}", name);
    }
    for mismatch in &report.mismatches {
        println!(
            "  mismatch: {} (counterexample, lhs input order: {})",
            mismatch.name,
            format_counterexample(&mismatch.counterexample)
        );
    }
    std::process::exit(EXIT_NOT_EQUIVALENT);
}
