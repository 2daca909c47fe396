mod commands;
mod helpers;

use angdist_core::domain::AngdistError;
use clap::Parser;

pub fn run_from_env() -> i32 {
    helpers::init_logging();
    let args: Vec<String> = std::env::args().collect();

    match parse_and_dispatch(args) {
        Ok(code) => code,
        Err(error) => {
            let diagnostic = error.as_angdist_error();
            eprintln!("{}", diagnostic.diagnostic_line());
            if let Some(summary_line) = diagnostic.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            diagnostic.exit_code()
        }
    }
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => dispatch_parsed(cli.command),
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "angdist",
    version,
    about = "Equal-probability angular distribution tables from Legendre coefficients"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Build the 100-bin inverse-CDF table from a coefficient listing
    Build(commands::BuildArgs),
    /// Check a bin table against the coefficient listing it was built from
    Validate(commands::ValidateArgs),
    /// Tabulate the angular density on a uniform cosine grid
    Density(commands::DensityArgs),
    /// Look up a scattering cosine in a bin table
    Sample(commands::SampleArgs),
}

fn dispatch_parsed(command: CliCommand) -> Result<i32, CliError> {
    match command {
        CliCommand::Build(args) => commands::run_build_command(args),
        CliCommand::Validate(args) => commands::run_validate_command(args),
        CliCommand::Density(args) => commands::run_density_command(args),
        CliCommand::Sample(args) => commands::run_sample_command(args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(AngdistError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CliError {
    fn as_angdist_error(&self) -> AngdistError {
        match self {
            Self::Usage(message) => {
                AngdistError::input_validation("INPUT.CLI_USAGE", message.trim_end().to_string())
            }
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => AngdistError::internal("RUN.CLI_INTERNAL", format!("{error:#}")),
        }
    }
}

impl From<AngdistError> for CliError {
    fn from(error: AngdistError) -> Self {
        Self::Compute(error)
    }
}
