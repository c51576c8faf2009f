// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::ArgMatches;
use cutsel::cut_enum::CutEnumerationParams;
use cutsel::rebuild::RebuildMode;
use serde::Deserialize;

use crate::report_cli_error::{report_cli_error_and_exit, EXIT_ARTIFACT, EXIT_IO};

/// Name of the configuration file picked up from the working directory when
/// `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "cutsel.toml";

#[derive(Debug, Default, Deserialize)]
pub struct CutselConfig {
    /// Cut enumeration settings; missing keys take the library defaults.
    #[serde(default)]
    pub cuts: CutEnumerationParams,

    #[serde(default)]
    pub rebuild: RebuildConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct RebuildConfig {
    /// `"best-effort"` (default) or `"strict"`.
    #[serde(default)]
    pub mode: RebuildMode,
}

impl CutselConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

/// Loads the configuration named by `--config`, else `cutsel.toml` in the
/// current directory if there is one, else the defaults.
pub fn load_config(matches: &ArgMatches) -> CutselConfig {
    let mut toml_path: Option<String> = matches.get_one::<String>("config").cloned();

    if toml_path.is_none() {
        if let Ok(cwd) = std::env::current_dir() {
            let cwd_toml_path = cwd.join(DEFAULT_CONFIG_FILE);
            if cwd_toml_path.exists() {
                log::info!(
                    "Using {} in current directory: {}",
                    DEFAULT_CONFIG_FILE,
                    cwd_toml_path.display()
                );
                toml_path = Some(cwd_toml_path.display().to_string());
            }
        }
    }

    let Some(path) = toml_path else {
        return CutselConfig::default();
    };
    if !Path::new(&path).exists() {
        report_cli_error_and_exit(
            "config file does not exist",
            None,
            vec![("path", &path)],
            EXIT_IO,
        );
    }
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) => report_cli_error_and_exit(
            "could not read config file",
            None,
            vec![("path", &path), ("error", &e.to_string())],
            EXIT_IO,
        ),
    };
    match CutselConfig::from_toml_str(&text) {
        Ok(config) => config,
        Err(e) => report_cli_error_and_exit(
            "could not parse config file",
            None,
            vec![("path", &path), ("error", &e)],
            EXIT_ARTIFACT,
        ),
    }
}

fn parse_usize_flag(matches: &ArgMatches, name: &str) -> Result<Option<usize>, String> {
    match matches.try_get_one::<String>(name) {
        Ok(Some(text)) => text
            .parse::<usize>()
            .map(Some)
            .map_err(|e| format!("invalid --{} value '{}': {}", name, text, e)),
        _ => Ok(None),
    }
}

/// Cut enumeration parameters from the command line flags, falling back to
/// the configuration for flags that are not given.
pub fn get_cut_params(
    matches: &ArgMatches,
    config: &CutselConfig,
) -> Result<CutEnumerationParams, String> {
    let mut params = config.cuts;
    if let Some(cut_size) = parse_usize_flag(matches, "cut_size")? {
        params.cut_size = cut_size;
    }
    if let Some(cut_limit) = parse_usize_flag(matches, "cut_limit")? {
        params.cut_limit = cut_limit;
    }
    if let Some(fanin_limit) = parse_usize_flag(matches, "fanin_limit")? {
        params.fanin_limit = fanin_limit;
    }
    if let Ok(Some(minimize)) = matches.try_get_one::<String>("minimize_truth_table") {
        params.minimize_truth_table = minimize == "true";
    }
    Ok(params)
}

pub fn get_rebuild_mode(
    matches: &ArgMatches,
    config: &CutselConfig,
) -> Result<RebuildMode, String> {
    match matches.try_get_one::<String>("mode") {
        Ok(Some(mode)) => mode.parse(),
        _ => Ok(config.rebuild.mode),
    }
}
