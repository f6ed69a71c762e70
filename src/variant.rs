use std::fmt;
use clap::ValueEnum;

/// Which set of job-description files is submitted in every model family directory
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum SweepVariant {
    /// Bayesian optimisation plus the p0..p100 sweep
    Tuning,
    /// A single diversity job per family
    Diversity
}

impl SweepVariant {
    /// Job files in submission order
    pub fn job_files(&self) -> &'static [&'static str] {
        match self {
            SweepVariant::Tuning => &["bo", "p0", "p25", "p50", "p75", "p100"],
            SweepVariant::Diversity => &["diversity"]
        }
    }
}

impl fmt::Display for SweepVariant {
      fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SweepVariant::Tuning => write!(f, "tuning"),
            SweepVariant::Diversity => write!(f, "diversity")
        }
    }
}
