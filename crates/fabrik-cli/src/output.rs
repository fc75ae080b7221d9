//! Output formatting utilities

use crate::error::CliResult;
use colored::*;
use serde::Serialize;
use std::io::{self, Write};
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    Table,
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
}

/// Render a list of rows in the specified format
pub fn render_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Table if data.is_empty() => "No results".dimmed().to_string(),
        OutputFormat::Table => Table::new(data).to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&data)?,
        OutputFormat::Yaml => serde_yaml::to_string(&data)?,
    })
}

/// Render a single item in the specified format
pub fn render_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<String> {
    Ok(match format {
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
    })
}

/// Print a list of rows in the specified format
pub fn print_output<T: Serialize + Tabled>(data: Vec<T>, format: OutputFormat) -> CliResult<()> {
    println!("{}", render_output(data, format)?.trim_end());
    Ok(())
}

/// Print a single item in the specified format
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> CliResult<()> {
    println!("{}", render_single(data, format)?.trim_end());
    Ok(())
}

// Status lines go to stderr. Stdout carries only the rendered document.

/// Print a success message
pub fn print_success(message: &str) {
    let _ = write_success(&mut io::stderr().lock(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message);
}

fn write_success<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "{} {}", "✓".green(), message)
}
