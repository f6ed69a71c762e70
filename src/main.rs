use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{error, info};

use crate::plan::batch::{SubmissionPlan, DEFAULT_COMMAND};
use crate::plan::read::read_plan;
use crate::results::check::{check_replicates, print_check_report};
use crate::results::layout::TASK_IDS;
use crate::results::summary::{print_summary, summarise};
use crate::results::table::TaskTable;
use crate::slurm::launch::ProcessLauncher;
use crate::slurm::submit::submit_plan;
use crate::variant::SweepVariant;

mod plan;
mod results;
mod slurm;
mod variant;

#[derive(Parser, Debug)]
#[command(name = "tpec-submit", version)]
/// Submit model family sweep jobs to a batch scheduler and check the replicates they leave behind
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Submit the job files of every model family directory, one directory at a time
    Submit(SubmitArgs),
    /// Find empty replicate folders and the array IDs to rerun
    Check(CheckArgs),
    /// Average test accuracy per task and model, leaving out failed tasks
    Summary(SummaryArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// Which job files to submit in each family directory
    #[arg(short, long, value_enum, default_value_t = SweepVariant::Tuning)]
    variant: SweepVariant,
    /// Directory holding one subdirectory per model family
    #[arg(short, long, default_value = ".")]
    base_dir: PathBuf,
    /// Submission command, run once per job file from inside the family directory
    #[arg(short, long, default_value = DEFAULT_COMMAND)]
    command: String,
    /// JSON plan file listing directories and job files, replaces --variant/--base-dir/--command
    #[arg(short, long, conflicts_with_all = ["variant", "base_dir", "command"])]
    plan: Option<PathBuf>,
    /// Log what would be submitted without running anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Directory containing the <MODEL>_Timing results folders
    #[arg(long)]
    timing_results_dir: PathBuf,
    /// Task IDs in array job order
    #[arg(long, value_delimiter = ',', default_values_t = TASK_IDS)]
    tasks: Vec<u32>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    /// Directory containing the <MODEL>_Timing results folders
    #[arg(long)]
    timing_results_dir: PathBuf,
    /// Task IDs in array job order
    #[arg(long, value_delimiter = ',', default_values_t = TASK_IDS)]
    tasks: Vec<u32>,
    /// CSV with a task_id column; its rows are written back with one accuracy column per model
    #[arg(long, conflicts_with = "tasks")]
    tasks_csv: Option<PathBuf>,
    /// Leave out tasks where any model's mean accuracy is at or above this value
    #[arg(long)]
    threshold: Option<f64>,
    /// Where to write the included tasks: CSV when --tasks-csv is given (overwrites it by
    /// default), JSON otherwise
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    info!("starting up");

    let args = Cli::parse();
    let outcome = match args.command {
        Commands::Submit(args) => submit(args),
        Commands::Check(args) => check(&args.timing_results_dir, &args.tasks),
        Commands::Summary(args) => summary(args),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn submit(args: SubmitArgs) -> Result<ExitCode> {
    let plan = match &args.plan {
        Some(path) => read_plan(path).with_context(|| format!("Loading plan {}", path.display()))?,
        None => {
            let plan = SubmissionPlan::for_variant(args.variant, &args.base_dir, &args.command);
            plan.validate()?;
            plan
        }
    };
    info!("{} submissions planned with {}", plan.submissions().len(), plan.command);

    let report = submit_plan(&plan, &mut ProcessLauncher, args.dry_run, &mut io::stdout().lock())?;
    match report.is_success() {
        true => Ok(ExitCode::SUCCESS),
        false => Ok(ExitCode::FAILURE),
    }
}

fn check(results_dir: &Path, tasks: &[u32]) -> Result<ExitCode> {
    let checks = check_replicates(results_dir, tasks)?;
    print_check_report(&checks, &mut io::stdout().lock())?;
    Ok(ExitCode::SUCCESS)
}

fn summary(args: SummaryArgs) -> Result<ExitCode> {
    let table = args.tasks_csv.as_deref().map(TaskTable::read).transpose()?;
    let task_ids: &[u32] = match &table {
        Some(table) => table.task_ids(),
        None => &args.tasks,
    };
    let summary = summarise(&args.timing_results_dir, task_ids)?;
    print_summary(&summary, args.threshold, &mut io::stdout().lock())?;

    if let (Some(table), Some(input)) = (&table, &args.tasks_csv) {
        let path = args.output.as_ref().unwrap_or(input);
        let written = table.write_included(path, &summary, args.threshold)?;
        println!("\nResults saved to: {} ({written} tasks)", path.display());
        println!("Added {} model columns", summary.models.len());
    } else if let Some(path) = &args.output {
        let file = File::create(path).with_context(|| format!("Creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary.included(args.threshold))?;
        println!("\nResults saved to: {}", path.display());
    }
    Ok(ExitCode::SUCCESS)
}
