//! `semitools stats` command - Data sets, descriptive statistics, Cpk/Ppk

use std::path::{Path, PathBuf};

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::filters::styled_rating;
use crate::cli::helpers::{truncate_str, Workspace};
use crate::cli::output::{
    effective_format, print_done, print_empty, print_field, print_json, print_rule, print_table,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::error::ValidationError;
use crate::core::identity::EntityPrefix;
use crate::core::numeric::{parse_value, parse_values};
use crate::engine::statistics::{CapabilityReport, StatisticsEngine, Summary};
use crate::entities::dataset::DataSet;

#[derive(Subcommand, Debug)]
pub enum StatsCommands {
    /// List data sets
    List,

    /// Store a data set from inline values or a CSV column
    Add(AddArgs),

    /// Descriptive statistics for a data set
    Show(ShowArgs),

    /// Cpk and Ppk against specification limits
    Capability(CapabilityArgs),

    /// Delete a data set
    Delete(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Data set name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Values separated by commas, semicolons or whitespace
    #[arg(long, conflicts_with = "csv", required_unless_present = "csv", allow_hyphen_values = true)]
    pub values: Option<String>,

    /// Read values from a CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// CSV column, 1-based index or header name
    #[arg(long, default_value = "1")]
    pub column: String,

    /// The CSV file has no header row
    #[arg(long)]
    pub no_header: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Data set ID or short ID (DS@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct CapabilityArgs {
    /// Data set ID or short ID (DS@N)
    pub id: String,

    /// Lower specification limit
    #[arg(long, value_parser = parse_value, allow_negative_numbers = true)]
    pub lsl: f64,

    /// Upper specification limit
    #[arg(long, value_parser = parse_value, allow_negative_numbers = true)]
    pub usl: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DataSetSummary<'a> {
    #[serde(flatten)]
    data_set: &'a DataSet,
    summary: Summary,
}

/// Run a stats subcommand
pub fn run(cmd: StatsCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = StatisticsEngine::open(ws.store.clone());
    match cmd {
        StatsCommands::List => run_list(&mut ws, &engine, global),
        StatsCommands::Add(args) => run_add(args, &mut ws, &mut engine),
        StatsCommands::Show(args) => run_show(args, &ws, &engine, global),
        StatsCommands::Capability(args) => run_capability(args, &ws, &engine, global),
        StatsCommands::Delete(args) => run_delete(args, &ws, &mut engine),
    }
}

fn find<'a>(ws: &Workspace, engine: &'a StatisticsEngine, reference: &str) -> Result<&'a DataSet> {
    let id = ws.resolve(EntityPrefix::Ds, reference)?;
    engine
        .data_set(&id)
        .ok_or_else(|| miette::miette!("No data set found matching '{}'", reference))
}

fn run_list(ws: &mut Workspace, engine: &StatisticsEngine, global: &GlobalOpts) -> Result<()> {
    let sets = engine.data_sets();
    ws.remember(sets.iter().map(|d| d.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(sets);
    }
    if sets.is_empty() {
        print_empty("data sets");
        return Ok(());
    }

    let rows = sets
        .iter()
        .map(|d| {
            let summary = Summary::of(&d.values);
            vec![
                ws.alias(&d.id),
                truncate_str(&d.name, 24),
                summary.count.to_string(),
                ws.num(summary.mean),
                ws.num(summary.std_dev),
                d.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["SHORT", "NAME", "N", "MEAN", "STD DEV", "CREATED"], rows);
    Ok(())
}

/// Read one column of numbers from a CSV file; blank cells are skipped
pub fn read_csv_column(path: &Path, column: &str, has_header: bool) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .into_diagnostic()?;

    let index = match column.trim().parse::<usize>() {
        Ok(0) => return Err(miette::miette!("CSV columns are numbered from 1")),
        Ok(n) => n - 1,
        Err(_) => {
            if !has_header {
                return Err(miette::miette!(
                    "column '{}' can only be named when the file has a header row",
                    column
                ));
            }
            let headers = reader.headers().into_diagnostic()?;
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(column.trim()))
                .ok_or_else(|| miette::miette!("no column named '{}' in {}", column, path.display()))?
        }
    };

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.into_diagnostic()?;
        match record.get(index) {
            Some(cell) if !cell.is_empty() => values.push(parse_value(cell)?),
            _ => {}
        }
    }
    log::debug!("read {} value(s) from {}", values.len(), path.display());
    Ok(values)
}

fn run_add(args: AddArgs, ws: &mut Workspace, engine: &mut StatisticsEngine) -> Result<()> {
    let values = match (&args.values, &args.csv) {
        (Some(inline), _) => parse_values(inline)?,
        (None, Some(path)) => read_csv_column(path, &args.column, !args.no_header)?,
        (None, None) => return Err(ValidationError::NoValues.into()),
    };

    let mut data_set = DataSet::new(&args.name, values)?;
    if let Some(description) = args.description {
        data_set = data_set.with_description(description);
    }
    let count = data_set.values.len();
    let id = engine.add_data_set(data_set)?;
    ws.remember([id])?;
    print_done(format!(
        "Created data set {} ({}, {} values)",
        style(ws.alias(&id)).cyan(),
        style(args.name.trim()).yellow(),
        count
    ));
    Ok(())
}

fn run_show(args: ShowArgs, ws: &Workspace, engine: &StatisticsEngine, global: &GlobalOpts) -> Result<()> {
    let data_set = find(ws, engine, &args.id)?;
    let summary = Summary::of(&data_set.values);

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&DataSetSummary { data_set, summary });
    }

    print_rule();
    print_field("ID", style(data_set.id).cyan());
    print_field("Name", style(&data_set.name).yellow());
    if !data_set.description.is_empty() {
        print_field("Description", &data_set.description);
    }
    print_rule();
    let rows = vec![
        vec!["Count".to_string(), summary.count.to_string()],
        vec!["Mean".to_string(), ws.num(summary.mean)],
        vec!["Median".to_string(), ws.num(summary.median)],
        vec!["Std dev (sample)".to_string(), ws.num(summary.std_dev)],
        vec!["Variance (sample)".to_string(), ws.num(summary.variance)],
        vec!["Min".to_string(), ws.num(summary.min)],
        vec!["Max".to_string(), ws.num(summary.max)],
        vec!["Range".to_string(), ws.num(summary.range)],
    ];
    print_table(&["STATISTIC", "VALUE"], rows);
    Ok(())
}

fn run_capability(
    args: CapabilityArgs,
    ws: &Workspace,
    engine: &StatisticsEngine,
    global: &GlobalOpts,
) -> Result<()> {
    let data_set = find(ws, engine, &args.id)?;
    let report = CapabilityReport::compute(&data_set.values, args.lsl, args.usl)?;

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&report);
    }

    println!(
        "{} against LSL {} / USL {}",
        style(&data_set.name).yellow(),
        ws.num(report.lsl),
        ws.num(report.usl)
    );
    print_table(
        &["INDEX", "VALUE", "RATING"],
        vec![
            vec![
                "Cpk".to_string(),
                ws.num(report.cpk),
                styled_rating(report.cpk_rating),
            ],
            vec![
                "Ppk".to_string(),
                ws.num(report.ppk),
                styled_rating(report.ppk_rating),
            ],
        ],
    );
    Ok(())
}

fn run_delete(args: ShowArgs, ws: &Workspace, engine: &mut StatisticsEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Ds, &args.id)?;
    let index = engine
        .data_sets()
        .iter()
        .position(|d| d.id == id)
        .ok_or_else(|| miette::miette!("No data set found matching '{}'", args.id))?;
    let removed = engine.delete_data_set(index)?;
    print_done(format!(
        "Deleted data set {} ({})",
        style(ws.alias(&id)).cyan(),
        removed.name
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_read_csv_column_by_name_and_index() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("vdd.csv");
        fs::write(&path, "die,vdd\n1,1.20\n2,1.25\n3,\n4,1.18\n").unwrap();

        let by_name = read_csv_column(&path, "VDD", true).unwrap();
        assert_eq!(by_name, vec![1.20, 1.25, 1.18]);

        let by_index = read_csv_column(&path, "1", true).unwrap();
        assert_eq!(by_index, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_read_csv_column_without_header() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("raw.csv");
        fs::write(&path, "0.5\n0.75\n").unwrap();
        assert_eq!(read_csv_column(&path, "1", false).unwrap(), vec![0.5, 0.75]);
        assert!(read_csv_column(&path, "vdd", false).is_err());
        assert!(read_csv_column(&path, "0", false).is_err());
    }

    #[test]
    fn test_read_csv_column_rejects_text() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.csv");
        fs::write(&path, "v\n1.0\nopen\n").unwrap();
        assert!(read_csv_column(&path, "v", true).is_err());
    }
}
