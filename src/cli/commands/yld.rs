//! `semitools yield` command - Per-wafer yield records

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{format_percent, parse_count, split_pair, Workspace};
use crate::cli::output::{
    effective_format, print_done, print_empty, print_field, print_json, print_rule, print_table,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::engine::yield_bins::{total_dies, BinShare, YieldEngine};
use crate::entities::yield_record::YieldRecord;

#[derive(Subcommand, Debug)]
pub enum YieldCommands {
    /// List yield records with their overall yield
    List,

    /// Record bin counts for a wafer
    Add(AddArgs),

    /// Show a record's per-bin breakdown
    Show(ShowArgs),

    /// Delete a yield record
    Delete(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Wafer name
    #[arg(long, short = 'w')]
    pub wafer: String,

    /// Lot number
    #[arg(long, short = 'l')]
    pub lot: String,

    /// Bin count as NAME=N or BIN@N=N (repeatable)
    #[arg(long = "count", short = 'c', value_name = "BIN=N", required = true)]
    pub counts: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Record ID or short ID (YLD@N)
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordSummary<'a> {
    #[serde(flatten)]
    record: &'a YieldRecord,
    total_dies: u64,
    overall_yield: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecordDetail<'a> {
    #[serde(flatten)]
    summary: RecordSummary<'a>,
    breakdown: Vec<BinShare>,
    orphaned_bin_ids: Vec<EntityId>,
}

/// Run a yield subcommand
pub fn run(cmd: YieldCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = YieldEngine::open(ws.store.clone(), ws.config.seed_default_bins)?;
    match cmd {
        YieldCommands::List => run_list(&mut ws, &engine, global),
        YieldCommands::Add(args) => run_add(args, &mut ws, &mut engine),
        YieldCommands::Show(args) => run_show(args, &ws, &engine, global),
        YieldCommands::Delete(args) => run_delete(args, &ws, &mut engine),
    }
}

fn summarize<'a>(engine: &YieldEngine, record: &'a YieldRecord) -> RecordSummary<'a> {
    RecordSummary {
        record,
        total_dies: total_dies(record),
        overall_yield: engine.overall_yield(record),
    }
}

fn run_list(ws: &mut Workspace, engine: &YieldEngine, global: &GlobalOpts) -> Result<()> {
    let records = engine.records();
    ws.remember(records.iter().map(|r| r.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        let summaries: Vec<RecordSummary> = records.iter().map(|r| summarize(engine, r)).collect();
        return print_json(&summaries);
    }
    if records.is_empty() {
        print_empty("yield records");
        return Ok(());
    }

    let rows = records
        .iter()
        .map(|r| {
            vec![
                ws.alias(&r.id),
                r.wafer_name.clone(),
                r.lot_number.clone(),
                total_dies(r).to_string(),
                format_percent(engine.overall_yield(r)),
                r.created_at.format("%Y-%m-%d").to_string(),
            ]
        })
        .collect();
    print_table(&["SHORT", "WAFER", "LOT", "DIES", "YIELD", "CREATED"], rows);
    println!(
        "{}: {}",
        style("Average yield").bold(),
        format_percent(engine.average_yield())
    );
    Ok(())
}

fn run_add(args: AddArgs, ws: &mut Workspace, engine: &mut YieldEngine) -> Result<()> {
    let mut counts = Vec::with_capacity(args.counts.len());
    for raw in &args.counts {
        let (bin_ref, count) = split_pair(raw)?;
        let bin_id = match engine.bin_by_name(&bin_ref) {
            Some(bin) => bin.id,
            None => ws
                .resolve(EntityPrefix::Bin, &bin_ref)
                .map_err(|_| miette::miette!("No bin named '{}'", bin_ref))?,
        };
        if engine.bin(&bin_id).is_none() {
            return Err(miette::miette!("No bin named '{}'", bin_ref));
        }
        counts.push((bin_id, parse_count(&count)?));
    }

    let id = engine.create_record(&args.wafer, &args.lot, counts)?;
    ws.remember([id])?;
    let yield_pct = engine
        .record(&id)
        .map(|r| engine.overall_yield(r))
        .unwrap_or(0.0);
    print_done(format!(
        "Created yield record {} for wafer {} (yield {})",
        style(ws.alias(&id)).cyan(),
        style(args.wafer.trim()).yellow(),
        format_percent(yield_pct)
    ));
    Ok(())
}

fn find<'a>(ws: &Workspace, engine: &'a YieldEngine, reference: &str) -> Result<&'a YieldRecord> {
    let id = ws.resolve(EntityPrefix::Yld, reference)?;
    engine
        .record(&id)
        .ok_or_else(|| miette::miette!("No yield record found matching '{}'", reference))
}

fn run_show(args: ShowArgs, ws: &Workspace, engine: &YieldEngine, global: &GlobalOpts) -> Result<()> {
    let record = find(ws, engine, &args.id)?;
    let breakdown = engine.breakdown(record);
    let orphaned = engine.orphaned_counts(record);

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&RecordDetail {
            summary: summarize(engine, record),
            breakdown,
            orphaned_bin_ids: orphaned.iter().map(|c| c.bin_id).collect(),
        });
    }

    print_rule();
    print_field("ID", style(record.id).cyan());
    print_field("Wafer", style(&record.wafer_name).yellow());
    print_field("Lot", &record.lot_number);
    print_field("Total dies", total_dies(record));
    print_field("Overall yield", format_percent(engine.overall_yield(record)));
    print_rule();

    let rows = breakdown
        .iter()
        .map(|share| {
            vec![
                share.name.clone(),
                share.count.to_string(),
                format_percent(share.percentage),
                ws.num(share.dpm),
            ]
        })
        .collect();
    print_table(&["BIN", "COUNT", "SHARE", "DPM"], rows);

    if !orphaned.is_empty() {
        let dies: u64 = orphaned.iter().map(|c| u64::from(c.count)).sum();
        println!(
            "{} {} die(s) counted in {} deleted bin(s)",
            style("!").yellow(),
            dies,
            orphaned.len()
        );
    }
    println!(
        "{}: {}",
        style("Created").dim(),
        record.created_at.format("%Y-%m-%d %H:%M")
    );
    Ok(())
}

fn run_delete(args: ShowArgs, ws: &Workspace, engine: &mut YieldEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Yld, &args.id)?;
    let index = engine
        .records()
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| miette::miette!("No yield record found matching '{}'", args.id))?;
    let removed = engine.delete_record(index)?;
    print_done(format!(
        "Deleted yield record {} (wafer {})",
        style(ws.alias(&id)).cyan(),
        removed.wafer_name
    ));
    Ok(())
}
