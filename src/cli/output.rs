//! Output formatting utilities

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;

/// Determine the effective output format
pub fn effective_format(format: OutputFormat) -> OutputFormat {
    match format {
        OutputFormat::Auto => OutputFormat::Table,
        other => other,
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Render rows under a header as a table
pub fn render_table(header: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table.with(Style::sharp());
    table.to_string()
}

pub fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    println!("{}", render_table(header, rows));
}

/// Rule line used around detail views
pub fn print_rule() {
    println!("{}", style("─".repeat(60)).dim());
}

/// `Label: value` line in detail views
pub fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("{}: {}", style(label).bold(), value);
}

/// Success line after a mutation
pub fn print_done(message: impl std::fmt::Display) {
    println!("{} {}", style("✓").green(), message);
}

/// Note shown when a list is empty
pub fn print_empty(kind_plural: &str) {
    println!("No {} found.", kind_plural);
}
