//! Inspect the replicate folders left behind by submitted jobs
//!
//! Each model family writes to `<results>/<FAMILY>_Timing/task_<id>/Replicate_<n>`. One Slurm
//! array job covers every task and replicate, so a (task, replicate) pair maps to an array ID.

/// Task IDs, replicate counts and folder names
pub mod layout;

/// Directory listing and JSON result file helpers
pub mod read;

/// Find empty replicate folders and the array IDs to rerun
pub mod check;

/// Average test accuracy per task and family, with failure classification
pub mod summary;

/// Read a tasks CSV and write it back with per-model accuracy columns
pub mod table;
