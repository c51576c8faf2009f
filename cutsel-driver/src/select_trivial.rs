// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use cutsel::selection::SelectionArtifact;

use crate::common::{load_cut_features, write_text};
use crate::report_cli_error::report_error_and_exit;

fn select_trivial(cuts_json: &Path, chosen_json: &Path) -> anyhow::Result<()> {
    let features = load_cut_features(cuts_json)?;
    let selection = SelectionArtifact::trivial_for(&features);
    write_text(chosen_json, &selection.to_json_string()?)?;
    println!(
        "Selected cut 0 for {} node(s); wrote {}",
        selection.len(),
        chosen_json.display()
    );
    Ok(())
}

pub fn handle_select_trivial(matches: &ArgMatches) {
    let cuts_json = Path::new(matches.get_one::<String>("cuts_json").unwrap());
    let chosen_json = Path::new(matches.get_one::<String>("chosen_json").unwrap());
    if let Err(e) = select_trivial(cuts_json, chosen_json) {
        report_error_and_exit("select-trivial", &e);
    }
}
