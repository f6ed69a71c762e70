use std::collections::BTreeMap;
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::results::layout::{replicate_dir, task_dir, NUM_REPLICATES, TIMING_SUFFIX};
use crate::results::read::{get_entry_paths, is_empty_dir, read_json};

/// Why a replicate can't be used. Ordered by severity, memory-limit beats time-limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReplicateFailure {
    TimeLimit,
    MemoryLimit,
}

impl fmt::Display for ReplicateFailure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReplicateFailure::TimeLimit => write!(f, "time-limit"),
            ReplicateFailure::MemoryLimit => write!(f, "memory-limit"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GlobalAccuracyResults {
    /// Written by the tuning job, not always as a bool
    #[serde(default)]
    time_exceeded: Option<Value>,
}

impl GlobalAccuracyResults {
    fn time_exceeded(&self) -> bool {
        self.time_exceeded.as_ref().map_or(false, is_truthy)
    }
}

/// null, false, zero and empty strings, arrays or objects are false, anything else is true
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[derive(Debug, Deserialize)]
struct BestModelResults {
    test_accuracy: Option<f64>,
}

/// Accuracy of each family on one task
#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    pub task_id: u32,
    /// Mean test accuracy per model name, None when no replicate produced one
    pub accuracies: BTreeMap<String, Option<f64>>,
    #[serde(skip)]
    pub failure: Option<ReplicateFailure>,
}

impl TaskSummary {
    fn exceeds(&self, threshold: f64) -> bool {
        self.accuracies.values().flatten().any(|&accuracy| accuracy >= threshold)
    }

    /// No failure in any model, and every accuracy below `threshold` when one is given
    pub fn is_included(&self, threshold: Option<f64>) -> bool {
        self.failure.is_none() && threshold.map_or(true, |t| !self.exceeds(t))
    }
}

#[derive(Debug)]
pub struct Summary {
    /// Model names (results folder without `_Timing`), sorted
    pub models: Vec<String>,
    pub tasks: Vec<TaskSummary>,
}

impl Summary {
    /// Tasks without any failure, and below `threshold` for every model when one is given
    pub fn included(&self, threshold: Option<f64>) -> Vec<&TaskSummary> {
        self.tasks
            .iter()
            .filter(|task| task.is_included(threshold))
            .collect()
    }
}

/// A replicate is usable if it has both result files and didn't run out of time
pub fn replicate_status(dir: &Path) -> Result<(), ReplicateFailure> {
    if is_empty_dir(dir) {
        return Err(ReplicateFailure::MemoryLimit);
    }

    let global_path = dir.join("global_accuracy_results.json");
    if !global_path.exists() {
        return Err(ReplicateFailure::MemoryLimit);
    }
    match read_json::<GlobalAccuracyResults>(&global_path) {
        None => return Err(ReplicateFailure::MemoryLimit),
        Some(global) if global.time_exceeded() => return Err(ReplicateFailure::TimeLimit),
        Some(_) => {}
    }

    match dir.join("best_model_results.json").exists() {
        true => Ok(()),
        false => Err(ReplicateFailure::MemoryLimit),
    }
}

fn test_accuracy(dir: &Path) -> Option<f64> {
    read_json::<BestModelResults>(&dir.join("best_model_results.json"))?.test_accuracy
}

/// Mean accuracy of the usable replicates and the worst failure among the rest
///
/// A task folder that doesn't exist yields neither.
pub fn summarise_model(model_dir: &Path, task_id: u32) -> (Option<f64>, Option<ReplicateFailure>) {
    let task_path = task_dir(model_dir, task_id);
    if !task_path.exists() {
        return (None, None);
    }

    let mut accuracies = Vec::new();
    let mut worst: Option<ReplicateFailure> = None;
    for replicate in 0..NUM_REPLICATES {
        let rep = replicate_dir(&task_path, replicate);
        match replicate_status(&rep) {
            Ok(()) => accuracies.extend(test_accuracy(&rep)),
            Err(failure) => worst = worst.max(Some(failure)),
        }
    }

    let mean = match accuracies.is_empty() {
        true => None,
        false => Some(accuracies.iter().sum::<f64>() / accuracies.len() as f64),
    };
    (mean, worst)
}

/// Model names found in the results directory, from folders ending in `_Timing`
pub fn discover_models(results_dir: &Path) -> Result<Vec<String>> {
    let mut models: Vec<String> = get_entry_paths(results_dir)
        .with_context(|| format!("Can't list {}", results_dir.display()))?
        .iter()
        .filter(|path| path.is_dir())
        .filter_map(|path| path.file_name()?.to_str()?.strip_suffix(TIMING_SUFFIX).map(String::from))
        .collect();
    models.sort();
    Ok(models)
}

pub fn summarise(results_dir: &Path, task_ids: &[u32]) -> Result<Summary> {
    if !results_dir.is_dir() {
        bail!("Timing results directory not found: {}", results_dir.display());
    }
    let models = discover_models(results_dir)?;
    info!("Found {} ML models: {}", models.len(), models.join(", "));
    info!("Processing {} tasks...", task_ids.len());

    let tasks = task_ids
        .iter()
        .map(|&task_id| {
            info!("Processing task {task_id}...");
            let mut accuracies = BTreeMap::new();
            let mut failure: Option<ReplicateFailure> = None;
            for model in &models {
                let model_dir = results_dir.join(format!("{model}{TIMING_SUFFIX}"));
                let (mean, worst) = summarise_model(&model_dir, task_id);
                accuracies.insert(model.clone(), mean);
                failure = failure.max(worst);
            }
            TaskSummary { task_id, accuracies, failure }
        })
        .collect();

    Ok(Summary { models, tasks })
}

pub fn print_summary<W: Write>(summary: &Summary, threshold: Option<f64>, out: &mut W) -> io::Result<()> {
    let rule = "=".repeat(60);
    let included = summary.included(threshold);

    writeln!(out, "Found {} ML models: {}", summary.models.len(), summary.models.join(", "))?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Tasks included in final results:")?;
    writeln!(out, "{rule}")?;
    for task in &included {
        writeln!(out, "\nTask {} Results:", task.task_id)?;
        for (model, accuracy) in &task.accuracies {
            match accuracy {
                Some(accuracy) => writeln!(out, "  {model}: {accuracy:.6}")?,
                None => writeln!(out, "  {model}: N/A")?,
            }
        }
    }

    writeln!(out, "\n{rule}")?;
    writeln!(out, "Filtering Summary:")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Total tasks processed: {}", summary.tasks.len())?;
    writeln!(out, "Tasks included: {}", included.len())?;
    writeln!(out, "Tasks excluded: {}", summary.tasks.len() - included.len())?;
    if let Some(threshold) = threshold {
        writeln!(out, "  - Threshold filter applied: >= {threshold}")?;
    }
    Ok(())
}
