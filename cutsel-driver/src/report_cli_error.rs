// SPDX-License-Identifier: Apache-2.0

use colored::Colorize;
use cutsel::cutsel_error::{CutselError, ErrorClass};

pub const EXIT_USAGE: i32 = 1;
pub const EXIT_IO: i32 = 2;
pub const EXIT_ARTIFACT: i32 = 3;
pub const EXIT_NETWORK: i32 = 4;
pub const EXIT_STRICT_REBUILD: i32 = 5;
/// Networks that compare unequal, or cannot be compared.
pub const EXIT_NOT_EQUIVALENT: i32 = 1;

pub fn exit_code_for(class: ErrorClass) -> i32 {
    match class {
        ErrorClass::Io => EXIT_IO,
        ErrorClass::Artifact => EXIT_ARTIFACT,
        ErrorClass::Network => EXIT_NETWORK,
        ErrorClass::Rebuild => EXIT_STRICT_REBUILD,
        ErrorClass::Interface => EXIT_NOT_EQUIVALENT,
    }
}

pub fn report_cli_error_and_exit(
    message: &str,
    subcommand: Option<&str>,
    details: Vec<(&str, &str)>,
    exit_code: i32,
) -> ! {
    let subcommand_str = if let Some(subcommand) = subcommand {
        format!("{}: ", subcommand)
    } else {
        String::new()
    };
    eprintln!("cutsel-driver: {}{}", subcommand_str, message.red().bold());
    for (key, value) in details {
        eprintln!("  {}: {}", key, value);
    }
    std::process::exit(exit_code);
}

/// Reports an error raised by a subcommand handler. The exit status follows
/// the class of the underlying [`CutselError`]; anything else is treated as
/// an I/O failure.
pub fn report_error_and_exit(subcommand: &str, error: &anyhow::Error) -> ! {
    let exit_code = error
        .downcast_ref::<CutselError>()
        .map(|e| exit_code_for(e.class()))
        .unwrap_or(EXIT_IO);
    let causes: Vec<String> = error.chain().skip(1).map(|c| c.to_string()).collect();
    let details: Vec<(&str, &str)> = causes.iter().map(|c| ("caused by", c.as_str())).collect();
    report_cli_error_and_exit(&error.to_string(), Some(subcommand), details, exit_code)
}
