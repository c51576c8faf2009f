// SPDX-License-Identifier: Apache-2.0

//! Command line driver for cut feature export and selection-driven rebuilding
//! of k-LUT networks.
//!
//! Commands are given like:
//!
//! ```text
//! cutsel-driver <global-options> <command> <command-args-and-options>
//! ```
//!
//! Commands are:
//!
//! - export-cuts: Enumerates cuts of a BLIF network and writes the cut
//!   feature JSON.
//! - rebuild: Rebuilds a BLIF network from cut features and a cut selection.
//! - select-trivial: Writes a selection choosing cut 0 for every node.
//! - klut-stats: Prints structural statistics of a BLIF network.
//! - klut-equiv: Compares two BLIF networks by simulation.
//!
//! Sample usage:
//!
//! ```shell
//! $ cargo run -- export-cuts adder.blif cuts.json --cut_size=4
//! $ cargo run -- select-trivial cuts.json chosen.json
//! $ cargo run -- rebuild adder.blif cuts.json chosen.json out.blif --mode=strict
//! $ cargo run -- klut-equiv adder.blif out.blif
//! ```

mod common;
mod cutsel_config;
mod export_cuts;
mod klut_equiv;
mod klut_stats;
mod rebuild;
mod report_cli_error;
mod select_trivial;

use clap::{Arg, ArgAction};
use report_cli_error::{report_cli_error_and_exit, EXIT_USAGE};

trait AppExt {
    fn add_cut_args(self) -> Self;
    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self;
    fn add_positional(self, id: &'static str, index: usize, help: &'static str) -> Self;
}

impl AppExt for clap::Command {
    fn add_cut_args(self) -> Self {
        (self as clap::Command)
            .arg(
                Arg::new("cut_size")
                    .long("cut_size")
                    .value_name("K")
                    .help("Maximum number of leaves per cut")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("cut_limit")
                    .long("cut_limit")
                    .value_name("L")
                    .help("Maximum number of cuts kept per node, trivial cut included")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("fanin_limit")
                    .long("fanin_limit")
                    .value_name("F")
                    .help("Nodes with more fan-ins only get the trivial cut")
                    .action(ArgAction::Set),
            )
            .add_bool_arg(
                "minimize_truth_table",
                "Drop cut leaves the cut function does not depend on",
            )
    }

    fn add_bool_arg(self, long: &'static str, help: &'static str) -> Self {
        (self as clap::Command).arg(
            Arg::new(long)
                .long(long)
                .value_name("BOOL")
                .action(ArgAction::Set)
                .value_parser(["true", "false"])
                .num_args(1)
                .help(help),
        )
    }

    fn add_positional(self, id: &'static str, index: usize, help: &'static str) -> Self {
        (self as clap::Command).arg(Arg::new(id).help(help).required(true).index(index))
    }
}

fn build_command() -> clap::Command {
    clap::Command::new("cutsel-driver")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Cut feature export and selection-driven k-LUT rebuilding")
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("CONFIG")
                .help("Path to a cutsel.toml configuration file")
                .global(true)
                .action(ArgAction::Set),
        )
        .subcommand(clap::Command::new("version").about("Prints the version of the driver"))
        .subcommand(
            clap::Command::new("export-cuts")
                .about("Enumerates cuts of a BLIF network and writes cut features as JSON")
                .add_positional("input_blif", 1, "The input BLIF file (.blif or .blif.gz)")
                .add_positional("output_json", 2, "Where to write the cut feature JSON")
                .add_cut_args(),
        )
        .subcommand(
            clap::Command::new("rebuild")
                .about("Rebuilds a BLIF network from cut features and a cut selection")
                .add_positional("input_blif", 1, "The original BLIF file")
                .add_positional("cuts_json", 2, "Cut feature JSON written by export-cuts")
                .add_positional("chosen_json", 3, "Selection JSON ({\"chosen_cuts\": ...})")
                .add_positional("output_blif", 4, "Where to write the rebuilt BLIF file")
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .value_name("MODE")
                        .help("How to treat per-node anomalies")
                        .value_parser(["best-effort", "strict"])
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("select-trivial")
                .about("Writes a selection choosing cut 0 for every exported node")
                .add_positional("cuts_json", 1, "Cut feature JSON written by export-cuts")
                .add_positional("chosen_json", 2, "Where to write the selection JSON"),
        )
        .subcommand(
            clap::Command::new("klut-stats")
                .about("Prints structural statistics of a BLIF network")
                .add_positional("input_blif", 1, "The input BLIF file")
                .arg(
                    Arg::new("output_json")
                        .long("output_json")
                        .value_name("PATH")
                        .help("Also write the statistics as JSON")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            clap::Command::new("klut-equiv")
                .about("Compares two BLIF networks output by output")
                .add_positional("lhs_blif", 1, "The left-hand side BLIF file")
                .add_positional("rhs_blif", 2, "The right-hand side BLIF file")
                .arg(
                    Arg::new("samples")
                        .long("samples")
                        .value_name("N")
                        .help("Random samples when exhaustive simulation is too large")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_name("SEED")
                        .help("Seed for random sampling")
                        .action(ArgAction::Set),
                ),
        )
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .try_init();

    log::info!(
        "cutsel-driver starting; version: {}",
        env!("CARGO_PKG_VERSION")
    );

    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            let exit_code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            std::process::exit(exit_code);
        }
    };

    let config = cutsel_config::load_config(&matches);

    if let Some(matches) = matches.subcommand_matches("export-cuts") {
        export_cuts::handle_export_cuts(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("rebuild") {
        rebuild::handle_rebuild(matches, &config);
    } else if let Some(matches) = matches.subcommand_matches("select-trivial") {
        select_trivial::handle_select_trivial(matches);
    } else if let Some(matches) = matches.subcommand_matches("klut-stats") {
        klut_stats::handle_klut_stats(matches);
    } else if let Some(matches) = matches.subcommand_matches("klut-equiv") {
        klut_equiv::handle_klut_equiv(matches);
    } else if let Some(_matches) = matches.subcommand_matches("version") {
        println!("{}", env!("CARGO_PKG_VERSION"));
    } else {
        report_cli_error_and_exit("No valid subcommand provided.", None, vec![], EXIT_USAGE);
    }
}
