//! `semitools spec` command - Parametric specs and measurements

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::filters::{styled_status, StatusFilter};
use crate::cli::helpers::{format_percent, truncate_str, Workspace};
use crate::cli::output::{
    effective_format, print_done, print_empty, print_field, print_json, print_rule, print_table,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::numeric::parse_value;
use crate::engine::parametric::{margin, test_status, ParametricEngine};
use crate::entities::parametric::{MeasuredValue, ParametricSpec, TestStatus};

#[derive(Subcommand, Debug)]
pub enum SpecCommands {
    /// List specs with the status of their latest measurement
    List(ListArgs),

    /// Create a spec
    Add(AddArgs),

    /// Show a spec and its measurement history
    Show(ShowArgs),

    /// Record a measurement against a spec
    Measure(ValueArgs),

    /// Check a value against a spec without recording it
    Check(ValueArgs),

    /// Delete a spec (its measurements are kept)
    Delete(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by latest status
    #[arg(long, short = 's', default_value = "all")]
    pub status: StatusFilter,

    /// Search in name and test name
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Spec name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Test program name
    #[arg(long, short = 't')]
    pub test: String,

    /// Lower limit
    #[arg(long, value_parser = parse_value, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper limit
    #[arg(long, value_parser = parse_value, allow_negative_numbers = true)]
    pub max: f64,

    /// Unit label (free text, e.g. V, mA)
    #[arg(long, short = 'u', default_value = "")]
    pub unit: String,

    /// Description
    #[arg(long, short = 'd')]
    pub description: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Spec ID or short ID (SPEC@N)
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ValueArgs {
    /// Spec ID or short ID (SPEC@N)
    pub id: String,

    /// Measured value
    #[arg(value_parser = parse_value, allow_negative_numbers = true)]
    pub value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpecSummary<'a> {
    #[serde(flatten)]
    spec: &'a ParametricSpec,
    latest_status: TestStatus,
    latest_value: Option<f64>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SpecDetail<'a> {
    #[serde(flatten)]
    spec: &'a ParametricSpec,
    latest_status: TestStatus,
    measurements: Vec<&'a MeasuredValue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckResult {
    spec_id: EntityId,
    value: f64,
    status: TestStatus,
    margin: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    measurement_id: Option<EntityId>,
}

/// Run a spec subcommand
pub fn run(cmd: SpecCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = ParametricEngine::open(ws.store.clone());
    match cmd {
        SpecCommands::List(args) => run_list(args, &mut ws, &engine, global),
        SpecCommands::Add(args) => run_add(args, &mut ws, &mut engine),
        SpecCommands::Show(args) => run_show(args, &ws, &engine, global),
        SpecCommands::Measure(args) => run_check(args, &mut ws, &mut engine, true, global),
        SpecCommands::Check(args) => run_check(args, &mut ws, &mut engine, false, global),
        SpecCommands::Delete(args) => run_delete(args, &ws, &mut engine),
    }
}

fn find<'a>(ws: &Workspace, engine: &'a ParametricEngine, reference: &str) -> Result<&'a ParametricSpec> {
    let id = ws.resolve(EntityPrefix::Spec, reference)?;
    engine
        .spec(&id)
        .ok_or_else(|| miette::miette!("No spec found matching '{}'", reference))
}

fn run_list(args: ListArgs, ws: &mut Workspace, engine: &ParametricEngine, global: &GlobalOpts) -> Result<()> {
    let needle = args.search.as_deref().map(str::to_lowercase);
    let specs: Vec<&ParametricSpec> = engine
        .specs()
        .iter()
        .filter(|s| args.status.matches(engine.latest_status(s)))
        .filter(|s| {
            needle.as_deref().is_none_or(|n| {
                s.name.to_lowercase().contains(n) || s.test_name.to_lowercase().contains(n)
            })
        })
        .collect();
    ws.remember(specs.iter().map(|s| s.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        let summaries: Vec<SpecSummary> = specs
            .iter()
            .map(|s| SpecSummary {
                spec: s,
                latest_status: engine.latest_status(s),
                latest_value: engine.latest_measurement(&s.id).map(|m| m.value),
            })
            .collect();
        return print_json(&summaries);
    }
    if specs.is_empty() {
        print_empty("specs");
        return Ok(());
    }

    let rows = specs
        .iter()
        .map(|s| {
            let latest = engine
                .latest_measurement(&s.id)
                .map(|m| ws.num(m.value))
                .unwrap_or_else(|| "-".to_string());
            vec![
                ws.alias(&s.id),
                truncate_str(&s.name, 24),
                truncate_str(&s.test_name, 20),
                ws.num(s.min_limit),
                ws.num(s.max_limit),
                s.unit.clone(),
                latest,
                styled_status(engine.latest_status(s)),
            ]
        })
        .collect();
    print_table(
        &["SHORT", "NAME", "TEST", "MIN", "MAX", "UNIT", "LATEST", "STATUS"],
        rows,
    );
    Ok(())
}

fn run_add(args: AddArgs, ws: &mut Workspace, engine: &mut ParametricEngine) -> Result<()> {
    let mut spec = ParametricSpec::new(&args.name, &args.test, args.min, args.max, &args.unit)?;
    if let Some(description) = args.description {
        spec = spec.with_description(description);
    }
    let id = engine.add_spec(spec)?;
    ws.remember([id])?;
    print_done(format!(
        "Created spec {} ({}: {} to {} {})",
        style(ws.alias(&id)).cyan(),
        style(args.name.trim()).yellow(),
        ws.num(args.min),
        ws.num(args.max),
        args.unit
    ));
    Ok(())
}

fn run_show(args: ShowArgs, ws: &Workspace, engine: &ParametricEngine, global: &GlobalOpts) -> Result<()> {
    let spec = find(ws, engine, &args.id)?;
    let history = engine.measurements_for(&spec.id);

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&SpecDetail {
            spec,
            latest_status: engine.latest_status(spec),
            measurements: history,
        });
    }

    print_rule();
    print_field("ID", style(spec.id).cyan());
    print_field("Name", style(&spec.name).yellow());
    print_field("Test", &spec.test_name);
    print_field(
        "Limits",
        format!("{} to {} {}", ws.num(spec.min_limit), ws.num(spec.max_limit), spec.unit),
    );
    if !spec.description.is_empty() {
        print_field("Description", &spec.description);
    }
    print_field("Latest status", styled_status(engine.latest_status(spec)));
    print_rule();

    if history.is_empty() {
        print_empty("measurements");
    } else {
        let rows = history
            .iter()
            .map(|m| {
                vec![
                    m.measured_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    ws.num(m.value),
                    styled_status(test_status(spec, m.value)),
                    format_percent(margin(spec, m.value)),
                ]
            })
            .collect();
        print_table(&["MEASURED", "VALUE", "STATUS", "MARGIN"], rows);
    }
    Ok(())
}

fn run_check(
    args: ValueArgs,
    ws: &mut Workspace,
    engine: &mut ParametricEngine,
    record: bool,
    global: &GlobalOpts,
) -> Result<()> {
    let spec = find(ws, engine, &args.id)?.clone();
    let measurement_id = if record {
        let id = engine.add_measurement(&spec.id, args.value)?;
        ws.remember([id])?;
        Some(id)
    } else {
        None
    };

    let result = CheckResult {
        spec_id: spec.id,
        value: args.value,
        status: test_status(&spec, args.value),
        margin: margin(&spec, args.value),
        measurement_id,
    };

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&result);
    }
    let verb = if record { "Recorded" } else { "Checked" };
    println!(
        "{} {} {} against {}: {} (margin {})",
        verb,
        ws.num(args.value),
        spec.unit,
        style(&spec.name).yellow(),
        styled_status(result.status),
        format_percent(result.margin)
    );
    Ok(())
}

fn run_delete(args: ShowArgs, ws: &Workspace, engine: &mut ParametricEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Spec, &args.id)?;
    let index = engine
        .specs()
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| miette::miette!("No spec found matching '{}'", args.id))?;
    let removed = engine.delete_spec(index)?;
    print_done(format!(
        "Deleted spec {} ({})",
        style(ws.alias(&id)).cyan(),
        removed.name
    ));
    Ok(())
}
