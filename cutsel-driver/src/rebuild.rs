// SPDX-License-Identifier: Apache-2.0

//! Rebuilds a BLIF network from a cut feature artifact and a cut selection.

use std::path::Path;

use clap::ArgMatches;
use cutsel::blif::{read_blif_path, write_blif_path};
use cutsel::rebuild::{rebuild_from_artifacts, RebuildMode};

use crate::common::{load_cut_features, load_selection};
use crate::cutsel_config::{get_rebuild_mode, CutselConfig};
use crate::report_cli_error::{report_cli_error_and_exit, report_error_and_exit, EXIT_ARTIFACT};

struct RebuildPaths<'a> {
    input_blif: &'a Path,
    cuts_json: &'a Path,
    chosen_json: &'a Path,
    output_blif: &'a Path,
}

fn rebuild(paths: &RebuildPaths, mode: RebuildMode) -> anyhow::Result<()> {
    let original = read_blif_path(paths.input_blif)?;
    let features = load_cut_features(paths.cuts_json)?;
    let selection = load_selection(paths.chosen_json)?;
    log::info!(
        "rebuild: {} selection entries, mode={}, recorded cut params {:?}",
        selection.len(),
        mode,
        features.enumeration_params()
    );
    let result = rebuild_from_artifacts(&original, &features, &selection, mode)?;
    write_blif_path(paths.output_blif, &result.network)?;
    println!("{}", result.summary);
    if !result.diagnostics.is_empty() {
        log::warn!(
            "rebuild completed with {} diagnostic(s)",
            result.diagnostics.len()
        );
    }
    Ok(())
}

pub fn handle_rebuild(matches: &ArgMatches, config: &CutselConfig) {
    let paths = RebuildPaths {
        input_blif: Path::new(matches.get_one::<String>("input_blif").unwrap()),
        cuts_json: Path::new(matches.get_one::<String>("cuts_json").unwrap()),
        chosen_json: Path::new(matches.get_one::<String>("chosen_json").unwrap()),
        output_blif: Path::new(matches.get_one::<String>("output_blif").unwrap()),
    };
    // Cut enumeration settings come from the artifact, never from flags or
    // `[cuts]`, so indices resolve against the lists that were exported.
    let mode = match get_rebuild_mode(matches, config) {
        Ok(mode) => mode,
        Err(e) => report_cli_error_and_exit(&e, Some("rebuild"), vec![], EXIT_ARTIFACT),
    };
    if let Err(e) = rebuild(&paths, mode) {
        report_error_and_exit("rebuild", &e);
    }
}
