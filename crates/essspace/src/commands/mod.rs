//! CLI command handlers.

pub mod capture;
pub mod config;
pub mod notes;
pub mod text;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use console::Style;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Overrides the user config directory.
    pub config_dir: Option<PathBuf>,
    /// Overrides the configured database.
    pub db_path: Option<PathBuf>,
}

/// Read a whole input: stdin for `None` or `-`, else the named file.
pub fn read_input(source: Option<&str>) -> Result<String> {
    match source {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))
        }
    }
}

/// Print a value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a green check line.
pub fn print_success(message: impl std::fmt::Display) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

/// Print a red `Error:` line.
pub fn print_error(message: impl std::fmt::Display) {
    let red = Style::new().red();
    eprintln!("{} {}", red.apply_to("Error:"), message);
}
