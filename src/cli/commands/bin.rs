//! `semitools bin` command - Bin definitions

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::helpers::Workspace;
use crate::cli::output::{effective_format, print_done, print_empty, print_json, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::yield_bins::YieldEngine;
use crate::entities::bin::HexColor;

#[derive(Subcommand, Debug)]
pub enum BinCommands {
    /// List bin definitions
    List,

    /// Add a custom bin
    Add(AddArgs),

    /// Rename or recolor a bin
    Edit(EditArgs),

    /// Delete a bin (existing records keep their counts)
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Bin name ("Good" counts toward yield)
    #[arg(long, short = 'n')]
    pub name: String,

    /// Display color as #RRGGBB
    #[arg(long, short = 'c', default_value = "#8E8E93")]
    pub color: HexColor,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Bin ID or short ID (BIN@N)
    pub id: String,

    /// New name
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// New color as #RRGGBB
    #[arg(long, short = 'c')]
    pub color: Option<HexColor>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Bin ID or short ID (BIN@N)
    pub id: String,
}

/// Run a bin subcommand
pub fn run(cmd: BinCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = YieldEngine::open(ws.store.clone(), ws.config.seed_default_bins)?;
    match cmd {
        BinCommands::List => run_list(&mut ws, &engine, global),
        BinCommands::Add(args) => run_add(args, &mut ws, &mut engine),
        BinCommands::Edit(args) => run_edit(args, &ws, &mut engine),
        BinCommands::Delete(args) => run_delete(args, &ws, &mut engine),
    }
}

fn run_list(ws: &mut Workspace, engine: &YieldEngine, global: &GlobalOpts) -> Result<()> {
    let bins = engine.bins();
    ws.remember(bins.iter().map(|b| b.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(bins);
    }
    if bins.is_empty() {
        print_empty("bins");
        return Ok(());
    }

    let rows = bins
        .iter()
        .map(|bin| {
            vec![
                ws.alias(&bin.id),
                bin.name.clone(),
                bin.color.to_string(),
                if bin.is_good() { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    print_table(&["SHORT", "NAME", "COLOR", "GOOD"], rows);
    Ok(())
}

fn run_add(args: AddArgs, ws: &mut Workspace, engine: &mut YieldEngine) -> Result<()> {
    let id = engine.add_bin(&args.name, args.color)?;
    ws.remember([id])?;
    print_done(format!(
        "Created bin {} ({})",
        style(ws.alias(&id)).cyan(),
        style(args.name.trim()).yellow()
    ));
    Ok(())
}

fn run_edit(args: EditArgs, ws: &Workspace, engine: &mut YieldEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Bin, &args.id)?;
    let mut bin = engine
        .bin(&id)
        .cloned()
        .ok_or_else(|| miette::miette!("No bin found matching '{}'", args.id))?;
    if let Some(name) = args.name {
        bin.name = name.trim().to_string();
    }
    if let Some(color) = args.color {
        bin.color = color;
    }
    let name = bin.name.clone();
    engine.update_bin(bin)?;
    print_done(format!("Updated bin {} ({})", style(ws.alias(&id)).cyan(), name));
    Ok(())
}

fn run_delete(args: DeleteArgs, ws: &Workspace, engine: &mut YieldEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Bin, &args.id)?;
    let removed = engine.delete_bin(&id)?;
    print_done(format!(
        "Deleted bin {} ({})",
        style(ws.alias(&id)).cyan(),
        removed.name
    ));
    Ok(())
}
