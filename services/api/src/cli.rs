use clap::{Args, Parser, Subcommand};

use buildflow::error::AppError;

use crate::demo::{run_demo, run_log_report, DemoArgs, LogReportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Buildflow Review Orchestrator",
    about = "Run and demonstrate the construction review workflow service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Summarize a review log for stakeholder reporting
    Log {
        #[command(subcommand)]
        command: LogCommand,
    },
    /// Run an end-to-end CLI demo covering the review wizard and dashboards
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum LogCommand {
    /// Print dashboard metrics for one log collection
    Report(LogReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Log {
            command: LogCommand::Report(args),
        } => run_log_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
