use super::{resolve_settings, SourceArgs};
use console::style;
use docex_lib::run::verify_connection;
use docex_lib::{Config, Result};
use std::path::PathBuf;

/// Returns whether the source answered.
pub fn handle_check_command(config: &Config, source: SourceArgs) -> Result<bool> {
    // a connection check never writes output
    let settings = resolve_settings(config, source, Some(PathBuf::from(".")))?;
    let check = verify_connection(&settings);

    if check.ok {
        println!("{} {}", style("✓").green().bold(), check.message);
    } else {
        println!("{} {}", style("✗").red().bold(), check.message);
    }

    Ok(check.ok)
}
