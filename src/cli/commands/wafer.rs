//! `semitools wafer` command - Good/defective die calculations

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{format_percent, Workspace};
use crate::cli::output::{effective_format, print_done, print_empty, print_json, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::engine::wafer_die::WaferDieEngine;
use crate::entities::wafer_die::WaferDieCalculation;

#[derive(Subcommand, Debug)]
pub enum WaferCommands {
    /// List stored calculations
    List,

    /// Calculate and store yield for a wafer (give good or defective, or both)
    Add(AddArgs),

    /// Delete a calculation
    Delete(DeleteArgs),

    /// Average yield across stored calculations
    Average,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Wafer name
    #[arg(long, short = 'w')]
    pub wafer: String,

    /// Lot number
    #[arg(long, short = 'l')]
    pub lot: String,

    /// Total dies on the wafer
    #[arg(long, short = 't')]
    pub total: u64,

    /// Good dies (derived from total - defective when omitted)
    #[arg(long, short = 'g')]
    pub good: Option<u64>,

    /// Defective dies (derived from total - good when omitted)
    #[arg(long, short = 'd')]
    pub defective: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Calculation ID or short ID (WDC@N)
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CalculationView<'a> {
    #[serde(flatten)]
    calculation: &'a WaferDieCalculation,
    yield_percentage: f64,
    defect_rate: f64,
    dpm: f64,
}

impl<'a> From<&'a WaferDieCalculation> for CalculationView<'a> {
    fn from(calculation: &'a WaferDieCalculation) -> Self {
        Self {
            calculation,
            yield_percentage: calculation.yield_percentage(),
            defect_rate: calculation.defect_rate(),
            dpm: calculation.dpm(),
        }
    }
}

/// Run a wafer subcommand
pub fn run(cmd: WaferCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = WaferDieEngine::open(ws.store.clone());
    match cmd {
        WaferCommands::List => run_list(&mut ws, &engine, global),
        WaferCommands::Add(args) => run_add(args, &mut ws, &mut engine, global),
        WaferCommands::Delete(args) => run_delete(args, &ws, &mut engine),
        WaferCommands::Average => run_average(&engine, global),
    }
}

fn run_list(ws: &mut Workspace, engine: &WaferDieEngine, global: &GlobalOpts) -> Result<()> {
    let calcs = engine.calculations();
    ws.remember(calcs.iter().map(|c| c.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        let views: Vec<CalculationView> = calcs.iter().map(CalculationView::from).collect();
        return print_json(&views);
    }
    if calcs.is_empty() {
        print_empty("wafer calculations");
        return Ok(());
    }

    let rows = calcs
        .iter()
        .map(|c| {
            vec![
                ws.alias(&c.id),
                c.wafer_name.clone(),
                c.lot_number.clone(),
                c.total_dies.to_string(),
                c.good_dies.to_string(),
                c.defective_dies.to_string(),
                format_percent(c.yield_percentage()),
                format!("{:.0}", c.dpm()),
            ]
        })
        .collect();
    print_table(
        &["SHORT", "WAFER", "LOT", "TOTAL", "GOOD", "DEFECTIVE", "YIELD", "DPM"],
        rows,
    );
    Ok(())
}

fn run_add(
    args: AddArgs,
    ws: &mut Workspace,
    engine: &mut WaferDieEngine,
    global: &GlobalOpts,
) -> Result<()> {
    let calc =
        WaferDieCalculation::resolve(args.wafer, args.lot, args.total, args.good, args.defective)?;
    let summary = format!(
        "good {} / defective {} of {} (yield {}, defect rate {})",
        calc.good_dies,
        calc.defective_dies,
        calc.total_dies,
        format_percent(calc.yield_percentage()),
        format_percent(calc.defect_rate())
    );
    let id = engine.add_calculation(calc)?;
    ws.remember([id])?;

    if effective_format(global.format) == OutputFormat::Json {
        if let Some(calc) = engine.calculation(&id) {
            return print_json(&CalculationView::from(calc));
        }
    }
    print_done(format!(
        "Saved wafer calculation {}: {}",
        style(ws.alias(&id)).cyan(),
        summary
    ));
    Ok(())
}

fn run_delete(args: DeleteArgs, ws: &Workspace, engine: &mut WaferDieEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Wdc, &args.id)?;
    let index = engine
        .calculations()
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| miette::miette!("No wafer calculation found matching '{}'", args.id))?;
    let removed = engine.delete_calculation(index)?;
    print_done(format!(
        "Deleted wafer calculation {} (wafer {})",
        style(ws.alias(&id)).cyan(),
        removed.wafer_name
    ));
    Ok(())
}

fn run_average(engine: &WaferDieEngine, global: &GlobalOpts) -> Result<()> {
    let average = engine.average_yield();
    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&serde_json::json!({
            "count": engine.calculations().len(),
            "averageYield": average,
        }));
    }
    println!(
        "{}: {} across {} wafer(s)",
        style("Average yield").bold(),
        format_percent(average),
        engine.calculations().len()
    );
    Ok(())
}
