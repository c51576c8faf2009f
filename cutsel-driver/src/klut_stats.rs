// SPDX-License-Identifier: Apache-2.0

//! Reports structural statistics of a BLIF network.

use std::collections::BTreeMap;
use std::path::Path;

use clap::ArgMatches;
use cutsel::blif::read_blif_path;
use cutsel::stats::compute_stats;

use crate::common::write_text;
use crate::report_cli_error::report_error_and_exit;

fn format_fanin_histogram(hist: &BTreeMap<usize, usize>) -> String {
    let entries: Vec<String> = hist
        .iter()
        .map(|(fanin, count)| format!("{}:{}", fanin, count))
        .collect();
    format!("{{{}}}", entries.join(","))
}

fn klut_stats(input: &Path, output_json: Option<&Path>) -> anyhow::Result<()> {
    let ntk = read_blif_path(input)?;
    let stats = compute_stats(&ntk);
    println!("Inputs:    {}", stats.inputs);
    println!("Outputs:   {}", stats.outputs);
    println!("LUTs:      {}", stats.luts);
    println!("Edges:     {}", stats.edges);
    println!("Max fanin: {}", stats.max_fanin);
    println!("Depth:     {}", stats.depth);
    println!("Fanin histogram: {}", format_fanin_histogram(&stats.fanin_histogram));
    if let Some(path) = output_json {
        write_text(path, &serde_json::to_string_pretty(&stats)?)?;
    }
    Ok(())
}

pub fn handle_klut_stats(matches: &ArgMatches) {
    let input = Path::new(matches.get_one::<String>("input_blif").unwrap());
    let output_json = matches.get_one::<String>("output_json").map(Path::new);
    if let Err(e) = klut_stats(input, output_json) {
        report_error_and_exit("klut-stats", &e);
    }
}
