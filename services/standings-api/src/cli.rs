use crate::commands::{
    run_qualifiers, run_ranking, run_stages, run_standing, QualifiersArgs, RankingArgs,
    StagesArgs, StandingArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use climb_season::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Climbing Season Standings",
    about = "Serve and inspect season rankings, stages and finale qualifiers",
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
    /// List the season's stages and the one running today
    Stages(StagesArgs),
    /// Print one class table, or all six for a league
    Ranking(RankingArgs),
    /// Show a single participant's class, points and rank
    Standing(StandingArgs),
    /// Run the finale qualification cut and wildcard draw for a class
    Qualifiers(QualifiersArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Directory holding season.json and the CSV exports (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Stages(args) => run_stages(args),
        Command::Ranking(args) => run_ranking(args),
        Command::Standing(args) => run_standing(args),
        Command::Qualifiers(args) => run_qualifiers(args),
    }
}
