use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::rank::run_rank;
use crate::server::serve;

#[derive(Parser, Debug)]
#[command(
    name = "ranker",
    about = "Score and rank resumes against a job description",
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
    /// Rank every resume in a directory against one job and write reports
    Rank(RankArgs),
}

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Args, Debug, Clone)]
pub struct RankArgs {
    /// Directory containing resumes (.pdf, .txt, .md), searched recursively
    #[arg(long)]
    pub resumes_dir: PathBuf,
    /// Job posting JSON file
    #[arg(long)]
    pub job_json: PathBuf,
    /// Where results.csv, results.json and reports/ are written
    #[arg(long, default_value = "output")]
    pub output_dir: PathBuf,
}

pub async fn run(config: Config) -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => serve(config, args).await,
        Command::Rank(args) => run_rank(&config, args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_rank_arguments() {
        let cli = Cli::try_parse_from([
            "ranker",
            "rank",
            "--resumes-dir",
            "resumes",
            "--job-json",
            "job.json",
        ])
        .unwrap();
        match cli.command {
            Some(Command::Rank(args)) => {
                assert_eq!(args.resumes_dir, PathBuf::from("resumes"));
                assert_eq!(args.job_json, PathBuf::from("job.json"));
                assert_eq!(args.output_dir, PathBuf::from("output"));
            }
            other => panic!("expected rank command, got {other:?}"),
        }
    }

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["ranker"]).unwrap();
        assert!(cli.command.is_none());
    }
}
