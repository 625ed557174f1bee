//! `semitools testtime` command - Test-time profiles and estimates

use clap::Subcommand;
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{parse_named_value, Workspace};
use crate::cli::output::{
    effective_format, print_done, print_empty, print_field, print_json, print_rule, print_table,
};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::engine::test_time::{total_step_time, TestTimeEngine, TestTimeEstimate};
use crate::entities::test_profile::{TestProfile, TestStep};

#[derive(Subcommand, Debug)]
pub enum TestTimeCommands {
    /// List test profiles
    List,

    /// Create a profile from named steps
    Add(AddArgs),

    /// Estimate run time and throughput for a lot
    Estimate(EstimateArgs),

    /// Delete a profile
    Delete(DeleteArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Profile name
    #[arg(long, short = 'n')]
    pub name: String,

    /// Step as NAME=SECONDS (repeatable, in test order)
    #[arg(long = "step", short = 's', value_name = "NAME=SECONDS", required = true)]
    pub steps: Vec<String>,
}

#[derive(clap::Args, Debug)]
pub struct EstimateArgs {
    /// Profile ID or short ID (PROF@N)
    pub id: String,

    /// Number of devices to test
    #[arg(long, short = 'd')]
    pub devices: u64,

    /// Parallel test sites
    #[arg(long, short = 's', default_value_t = 1, allow_negative_numbers = true)]
    pub slots: i64,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Profile ID or short ID (PROF@N)
    pub id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EstimateView {
    profile_id: EntityId,
    #[serde(flatten)]
    estimate: TestTimeEstimate,
}

/// Run a testtime subcommand
pub fn run(cmd: TestTimeCommands, global: &GlobalOpts) -> Result<()> {
    let mut ws = Workspace::open(global)?;
    let mut engine = TestTimeEngine::open(ws.store.clone());
    match cmd {
        TestTimeCommands::List => run_list(&mut ws, &engine, global),
        TestTimeCommands::Add(args) => run_add(args, &mut ws, &mut engine),
        TestTimeCommands::Estimate(args) => run_estimate(args, &ws, &engine, global),
        TestTimeCommands::Delete(args) => run_delete(args, &ws, &mut engine),
    }
}

fn run_list(ws: &mut Workspace, engine: &TestTimeEngine, global: &GlobalOpts) -> Result<()> {
    let profiles = engine.profiles();
    ws.remember(profiles.iter().map(|p| p.id))?;

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(profiles);
    }
    if profiles.is_empty() {
        print_empty("test profiles");
        return Ok(());
    }

    let rows = profiles
        .iter()
        .map(|p| {
            let steps: Vec<&str> = p.test_steps.iter().map(|s| s.name.as_str()).collect();
            vec![
                ws.alias(&p.id),
                p.name.clone(),
                steps.join(" > "),
                format!("{} s", ws.num(total_step_time(p))),
            ]
        })
        .collect();
    print_table(&["SHORT", "NAME", "STEPS", "TIME/DEVICE"], rows);
    Ok(())
}

fn run_add(args: AddArgs, ws: &mut Workspace, engine: &mut TestTimeEngine) -> Result<()> {
    let mut steps = Vec::with_capacity(args.steps.len());
    for raw in &args.steps {
        let (name, seconds) = parse_named_value(raw)?;
        steps.push(TestStep::new(name, seconds)?);
    }
    let profile = TestProfile::new(&args.name, steps)?;
    let per_device = total_step_time(&profile);
    let id = engine.add_profile(profile)?;
    ws.remember([id])?;
    print_done(format!(
        "Created test profile {} ({}, {} s per device)",
        style(ws.alias(&id)).cyan(),
        style(args.name.trim()).yellow(),
        ws.num(per_device)
    ));
    Ok(())
}

fn run_estimate(args: EstimateArgs, ws: &Workspace, engine: &TestTimeEngine, global: &GlobalOpts) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Prof, &args.id)?;
    let profile = engine
        .profile(&id)
        .ok_or_else(|| miette::miette!("No test profile found matching '{}'", args.id))?;
    let estimate = TestTimeEstimate::compute(profile, args.devices, args.slots);

    if effective_format(global.format) == OutputFormat::Json {
        return print_json(&EstimateView {
            profile_id: id,
            estimate,
        });
    }

    print_rule();
    print_field("Profile", style(&profile.name).yellow());
    print_field("Devices", estimate.devices);
    print_field("Parallel sites", estimate.slots);
    print_rule();
    print_table(
        &["METRIC", "VALUE"],
        vec![
            vec![
                "Time per device".to_string(),
                format!("{} s", ws.num(estimate.time_per_device)),
            ],
            vec![
                "Total test time".to_string(),
                format!("{} s", ws.num(estimate.total_test_time)),
            ],
            vec![
                "With parallel sites".to_string(),
                format!("{} s", ws.num(estimate.parallel_time)),
            ],
            vec![
                "Throughput".to_string(),
                format!("{} /hr", ws.num(estimate.throughput)),
            ],
            vec![
                "Parallel throughput".to_string(),
                format!("{} /hr", ws.num(estimate.parallel_throughput)),
            ],
        ],
    );
    Ok(())
}

fn run_delete(args: DeleteArgs, ws: &Workspace, engine: &mut TestTimeEngine) -> Result<()> {
    let id = ws.resolve(EntityPrefix::Prof, &args.id)?;
    let index = engine
        .profiles()
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| miette::miette!("No test profile found matching '{}'", args.id))?;
    let removed = engine.delete_profile(index)?;
    print_done(format!(
        "Deleted test profile {} ({})",
        style(ws.alias(&id)).cyan(),
        removed.name
    ));
    Ok(())
}
