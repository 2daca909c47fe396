use super::CliError;
use super::helpers::*;
use angdist_core::common::constants::{DEFAULT_EPSILON, DEFAULT_MAX_ORDER, TABLE_SIGNIFICANT_DIGITS};
use angdist_core::common::{PipelineConfig, ValidationStrictness};
use angdist_core::modules::{
    InverseCdfSampler, build_bin_table, format_scientific, read_bin_table, render_bin_table,
    render_density_table, tabulate_density, validate_bin_table,
};
use anyhow::Context;
use std::path::PathBuf;

#[derive(clap::Args)]
pub(super) struct SeriesFlags {
    /// Highest Legendre order kept per record
    #[arg(long, default_value_t = DEFAULT_MAX_ORDER)]
    max_order: usize,
}

impl SeriesFlags {
    fn config(&self) -> Result<PipelineConfig, CliError> {
        let config = PipelineConfig::default().with_max_order(self.max_order);
        config.validate()?;
        Ok(config)
    }
}

#[derive(clap::Args)]
pub(super) struct BuildArgs {
    /// Fixed-width Legendre coefficient listing
    #[arg(long)]
    input: PathBuf,

    /// Bin table output path
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    series: SeriesFlags,
}

#[derive(clap::Args)]
pub(super) struct ValidateArgs {
    /// Fixed-width Legendre coefficient listing the table was built from
    #[arg(long)]
    input: PathBuf,

    /// Bin table to check
    #[arg(long)]
    table: PathBuf,

    /// Largest accepted |CDF(mu_k) - k/100|
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Check every row and report all violations instead of stopping at the first
    #[arg(long)]
    exhaustive: bool,

    /// JSON report output path
    #[arg(long)]
    report: Option<PathBuf>,

    #[command(flatten)]
    series: SeriesFlags,
}

#[derive(clap::Args)]
pub(super) struct DensityArgs {
    /// Fixed-width Legendre coefficient listing
    #[arg(long)]
    input: PathBuf,

    /// Density table output path
    #[arg(long)]
    output: PathBuf,

    #[command(flatten)]
    series: SeriesFlags,
}

#[derive(clap::Args)]
pub(super) struct SampleArgs {
    /// Bin table to sample from
    #[arg(long)]
    table: PathBuf,

    /// Incident energy in eV
    #[arg(long)]
    energy: f64,

    /// Cumulative probability in [0, 1]
    #[arg(long)]
    probability: f64,

    /// Interpolate linearly inside the bin instead of returning its lower edge
    #[arg(long)]
    interpolate: bool,
}

pub(super) fn run_build_command(args: BuildArgs) -> Result<i32, CliError> {
    let config = args.series.config()?;
    let records = load_records(&args.input, &config)?;
    let table = build_bin_table(&records, &config).map_err(compute_error)?;

    write_output(
        &args.output,
        &render_bin_table(&table, TABLE_SIGNIFICANT_DIGITS),
    )?;
    println!(
        "Wrote {} rows x {} columns to {}",
        table.len(),
        config.row_width(),
        args.output.display()
    );
    Ok(0)
}

pub(super) fn run_validate_command(args: ValidateArgs) -> Result<i32, CliError> {
    let strictness = if args.exhaustive {
        ValidationStrictness::Exhaustive
    } else {
        ValidationStrictness::AbortOnFirst
    };
    let config = args
        .series
        .config()?
        .with_epsilon(args.epsilon)
        .with_strictness(strictness);
    config.validate()?;

    let records = load_records(&args.input, &config)?;
    let table = read_bin_table(&read_input(&args.table, "bin table")?).map_err(compute_error)?;
    let report = validate_bin_table(&table, &records, &config).map_err(compute_error)?;

    if let Some(report_path) = &args.report {
        let json = report
            .to_json_pretty()
            .context("failed to serialize validation report")?;
        write_output(report_path, &json)?;
    }

    println!(
        "Validated {} rows ({} boundaries): max error {}, epsilon {}",
        report.rows_checked,
        report.values_checked,
        format_scientific(report.max_error, 3),
        format_scientific(report.epsilon, 3)
    );
    for violation in &report.violations {
        println!("  [{}] {}", violation.placeholder(), violation);
    }
    if let Some(report_path) = &args.report {
        println!("JSON report: {}", report_path.display());
    }

    if report.passed {
        println!("Validation status: PASS");
        Ok(0)
    } else {
        println!(
            "Validation status: FAIL ({} violations)",
            report.violations.len()
        );
        Ok(1)
    }
}

pub(super) fn run_density_command(args: DensityArgs) -> Result<i32, CliError> {
    let config = args.series.config()?;
    let records = load_records(&args.input, &config)?;
    let table = tabulate_density(&records, &config);

    write_output(
        &args.output,
        &render_density_table(&table, TABLE_SIGNIFICANT_DIGITS),
    )?;
    println!(
        "Wrote {} rows x {} columns to {}",
        table.len(),
        config.density_grid_points + 1,
        args.output.display()
    );
    Ok(0)
}

pub(super) fn run_sample_command(args: SampleArgs) -> Result<i32, CliError> {
    let table = read_bin_table(&read_input(&args.table, "bin table")?).map_err(compute_error)?;
    let sampler = InverseCdfSampler::new(table).map_err(compute_error)?;

    let mu = if args.interpolate {
        sampler.interpolated_cosine(args.energy, args.probability)
    } else {
        sampler.cosine(args.energy, args.probability)
    }
    .map_err(compute_error)?;

    println!("{}", format_scientific(mu, TABLE_SIGNIFICANT_DIGITS));
    Ok(0)
}
