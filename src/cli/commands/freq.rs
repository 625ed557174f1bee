//! `semitools freq` command - Period/frequency conversion

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::Workspace;
use crate::cli::output::{effective_format, print_done, print_empty, print_json, print_table};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::EntityPrefix;
use crate::core::numeric::parse_value;
use crate::engine::period_frequency::{
    frequency_to_period, period_to_frequency, PeriodFrequencyEngine,
};
use crate::entities::period_frequency::{FrequencyUnit, PeriodFrequencyCalculation, TimeUnit};

#[derive(Subcommand, Debug)]
pub enum FreqCommands {
    /// Convert a period to a frequency
    ToFrequency(ToFrequencyArgs),

    /// Convert a frequency to a period
    ToPeriod(ToPeriodArgs),

    /// Convert a period and store the result
    Save(ToFrequencyArgs),

    /// List stored conversions
    List,

    /// Delete a stored conversion
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct ToFrequencyArgs {
    /// Period value
    #[arg(value_parser = parse_value, allow_negative_numbers = true)]
    pub value: f64,

    /// Unit of the period (ns, us, ms, s); config default when omitted
    #[arg(long, short = 'u')]
    pub unit: Option<TimeUnit>,

    /// Unit of the result (Hz, kHz, MHz, GHz); config default when omitted
    #[arg(long, short = 't')]
    pub to: Option<FrequencyUnit>,
}

#[derive(clap::Args, Debug)]
pub struct ToPeriodArgs {
    /// Frequency value
    #[arg(value_parser = parse_value, allow_negative_numbers = true)]
    pub value: f64,

    /// Unit of the frequency (Hz, kHz, MHz, GHz); config default when omitted
    #[arg(long, short = 'u')]
    pub unit: Option<FrequencyUnit>,

    /// Unit of the result (ns, us, ms, s); config default when omitted
    #[arg(long, short = 't')]
    pub to: Option<TimeUnit>,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Calculation ID or short ID (PFC@N)
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Conversion {
    input_value: f64,
    input_unit: String,
    result_value: f64,
    result_unit: String,
}

/// Run a freq subcommand
pub fn run(cmd: FreqCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    match cmd {
        FreqCommands::ToFrequency(args) => run_to_frequency(args, &ws, global),
        FreqCommands::ToPeriod(args) => run_to_period(args, &ws, global),
        FreqCommands::Save(args) => run_save(args, &mut ws, global),
        FreqCommands::List => run_list(&mut ws, global),
        FreqCommands::Delete(args) => run_delete(args, &ws),
    }
}

fn print_conversion(conversion: &Conversion, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    if effective_format(global.format) == OutputFormat::Json {
        return print_json(conversion);
    }
    println!(
        "{} {} = {} {}",
        ws.num(conversion.input_value),
        conversion.input_unit,
        style(ws.num(conversion.result_value)).green().bold(),
        conversion.result_unit
    );
    Ok(())
}

fn run_to_frequency(args: ToFrequencyArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let unit = args.unit.unwrap_or(ws.config.time_unit);
    let to = args.to.unwrap_or(ws.config.frequency_unit);
    let result = period_to_frequency(args.value, unit, to)?;
    print_conversion(
        &Conversion {
            input_value: args.value,
            input_unit: unit.to_string(),
            result_value: result,
            result_unit: to.to_string(),
        },
        ws,
        global,
    )
}

fn run_to_period(args: ToPeriodArgs, ws: &Workspace, global: &GlobalOpts) -> Result<()> {
    let unit = args.unit.unwrap_or(ws.config.frequency_unit);
    let to = args.to.unwrap_or(ws.config.time_unit);
    let result = frequency_to_period(args.value, unit, to)?;
    print_conversion(
        &Conversion {
            input_value: args.value,
            input_unit: unit.to_string(),
            result_value: result,
            result_unit: to.to_string(),
        },
        ws,
        global,
    )
}

fn run_save(args: ToFrequencyArgs, ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let unit = args.unit.unwrap_or(ws.config.time_unit);
    let to = args.to.unwrap_or(ws.config.frequency_unit);
    let calc = PeriodFrequencyCalculation::new(args.value, unit, to)?;
    let mut engine = PeriodFrequencyEngine::open(ws.store.clone());
    let id = engine.add_calculation(calc)?;
    ws.remember([id])?;

    if let Some(calc) = engine.calculation(&id) {
        if effective_format(global.format) == OutputFormat::Json {
            return print_json(calc);
        }
        print_done(format!(
            "Saved {}: {} {} = {} {}",
            style(ws.alias(&id)).cyan(),
            ws.num(calc.input_value),
            calc.input_unit,
            ws.num(calc.frequency_value),
            calc.frequency_unit
        ));
    }
    Ok(())
}

fn run_list(ws: &mut Workspace, global: &GlobalOpts) -> Result<()> {
    let engine = PeriodFrequencyEngine::open(ws.store.clone());
    let calcs = engine.calculations();
    ws.remember(calcs.iter().map(|c| c.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(calcs);
    }
    if calcs.is_empty() {
        print_empty("saved conversions");
        return Ok(());
    }

    let rows = calcs
        .iter()
        .map(|c| {
            vec![
                ws.alias(&c.id),
                format!("{} {}", ws.num(c.input_value), c.input_unit),
                format!("{} {}", ws.num(c.frequency_value), c.frequency_unit),
                c.created_at.format("%Y-%m-%d %H:%M").to_string(),
            ]
        })
        .collect();
    print_table(&["SHORT", "PERIOD", "FREQUENCY", "SAVED"], rows);
    Ok(())
}

fn run_delete(args: DeleteArgs, ws: &Workspace) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Pfc, &args.id)?;
    let mut engine = PeriodFrequencyEngine::open(ws.store.clone());
    let index = engine
        .calculations()
        .iter()
        .position(|c| c.id == id)
        .ok_or_else(|| miette::miette!("No saved conversion found matching '{}'", args.id))?;
    engine.delete_calculation(index)?;
    print_done(format!("Deleted conversion {}", style(ws.alias(&id)).cyan()));
    Ok(())
}
