//! Git clean-filter installation
//!
//! Writes the `filter.<name>.clean` entry into the repository (or
//! user) Git configuration. Git itself matches files to the filter via
//! `.gitattributes`, which stays under the user's control; the command
//! prints the line to add.

use std::process::Command;

use crate::core::error::{SvgError, SvgResult};

/// Name of the filter as referenced from `.gitattributes`
pub const FILTER_NAME: &str = "svgscrub";

/// Register this binary as a Git clean filter
///
/// Fails with [`SvgError::MissingDependency`] when `git` is not on the
/// search path.
pub fn install(global: bool) -> SvgResult<()> {
    if which::which("git").is_err() {
        return Err(SvgError::MissingDependency(
            "`git` command not found on PATH".to_string(),
        ));
    }

    let mut cmd = Command::new("git");
    cmd.arg("config");
    if global {
        cmd.arg("--global");
    }
    cmd.arg(format!("filter.{}.clean", FILTER_NAME));
    cmd.arg(FILTER_NAME);

    let status = cmd.status()?;
    if !status.success() {
        return Err(SvgError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("git config exited with status {}", status),
        )));
    }

    println!("configured Git clean filter '{}'", FILTER_NAME);
    println!("enable it for SVG files by adding this line to .gitattributes:");
    println!("    *.svg filter={}", FILTER_NAME);
    Ok(())
}
