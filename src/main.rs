use clap::Parser;
use log::LevelFilter;
use miette::Result;
use semitools::cli::commands;
use semitools::cli::{Cli, Commands, GlobalOpts};

fn init_logging(global: &GlobalOpts) {
    let level = if global.quiet {
        LevelFilter::Error
    } else {
        match global.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    };
    // RUST_LOG, when set, wins over the flags
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_logging(&cli.global);

    let global = &cli.global;
    match cli.command {
        Commands::Bin(cmd) => commands::bin::run(cmd, global),
        Commands::Yield(cmd) => commands::yld::run(cmd, global),
        Commands::Wafer(cmd) => commands::wafer::run(cmd, global),
        Commands::Spec(cmd) => commands::spec::run(cmd, global),
        Commands::Stats(cmd) => commands::stats::run(cmd, global),
        Commands::TestTime(cmd) => commands::testtime::run(cmd, global),
        Commands::Freq(cmd) => commands::freq::run(cmd, global),
        Commands::Ref(cmd) => commands::reference::run(cmd, global),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
