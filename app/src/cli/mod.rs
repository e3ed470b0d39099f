use clap::{Parser, Subcommand};

mod list;
mod run;

pub fn exec() -> miette::Result<()> {
    let cli = Cli::parse();
    // Initialize the logger based on the flags
    let mut builder = env_logger::Builder::from_default_env();
    builder.format_timestamp(None).format_level(false).format_target(false);

    if cli.trace {
        builder.filter_level(log::LevelFilter::Trace);
    } else if cli.debug {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Info);
    }

    builder.init();

    use Command::*;
    match cli.command {
        Run(args) => run::exec(args),
        List => list::exec(),
    }
}

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Enable trace logging
    #[clap(long)]
    trace: bool,
    /// Enable debug logging
    #[clap(long)]
    debug: bool,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a built-in synthesis scenario
    Run(run::Args),
    /// List the built-in scenarios
    List,
}
