// SPDX-License-Identifier: Apache-2.0

//! Enumerates cuts of a BLIF network and writes the cut feature artifact.

use std::path::Path;

use clap::ArgMatches;
use cutsel::blif::read_blif_path;
use cutsel::export::export_cut_features;

use crate::common::write_text;
use crate::cutsel_config::{get_cut_params, CutselConfig};
use crate::report_cli_error::{report_cli_error_and_exit, report_error_and_exit, EXIT_ARTIFACT};

fn export_cuts(
    input: &Path,
    output: &Path,
    params: &cutsel::cut_enum::CutEnumerationParams,
) -> anyhow::Result<()> {
    let ntk = read_blif_path(input)?;
    let artifact = export_cut_features(&ntk, params)?;
    write_text(output, &artifact.to_json_string()?)?;
    println!(
        "Exported {} node(s), {} cut(s), {} output(s) to {}",
        artifact.nodes.len(),
        artifact.total_cuts(),
        artifact.outputs.len(),
        output.display()
    );
    Ok(())
}

pub fn handle_export_cuts(matches: &ArgMatches, config: &CutselConfig) {
    let input = Path::new(matches.get_one::<String>("input_blif").unwrap());
    let output = Path::new(matches.get_one::<String>("output_json").unwrap());
    let params = match get_cut_params(matches, config) {
        Ok(params) => params,
        Err(e) => report_cli_error_and_exit(&e, Some("export-cuts"), vec![], EXIT_ARTIFACT),
    };
    if let Err(e) = export_cuts(input, output, &params) {
        report_error_and_exit("export-cuts", &e);
    }
}
