use std::path::{Path, PathBuf};

/// OpenML task IDs in array job order
pub const TASK_IDS: [u32; 34] = [
    190412, 146818, 359955, 168757, 359956, 359958, 359962, 190137, 168911, 190392,
    189922, 359965, 359966, 359967, 190411, 146820, 359968, 359975, 359972, 168350,
    359973, 190410, 359971, 359988, 359989, 359979, 359980, 359992, 359982, 167120,
    359990, 189354, 360114, 359994,
];

pub const NUM_REPLICATES: u32 = 10;

/// Suffix on every family results folder
pub static TIMING_SUFFIX: &str = "_Timing";

/// Slurm array ID of a replicate: `task_index * NUM_REPLICATES + replicate`
pub fn array_id(task_index: usize, replicate: u32) -> u32 {
    task_index as u32 * NUM_REPLICATES + replicate
}

pub fn task_dir(model_dir: &Path, task_id: u32) -> PathBuf {
    model_dir.join(format!("task_{task_id}"))
}

pub fn replicate_dir(task_dir: &Path, replicate: u32) -> PathBuf {
    task_dir.join(format!("Replicate_{replicate}"))
}
