use std::fmt;

/// A model family being tuned. Each one has its own directory of job-description files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ModelFamily {
    RandomForest,
    DecisionTree,
    ExtraTrees,
    GradientBoosting,
    KernelSvc,
    LinearSgd,
    LinearSvc,
}

impl ModelFamily {
    /// Order in which family directories are visited when submitting
    pub const SUBMISSION_ORDER: [ModelFamily; 7] = [
        ModelFamily::RandomForest,
        ModelFamily::DecisionTree,
        ModelFamily::ExtraTrees,
        ModelFamily::GradientBoosting,
        ModelFamily::KernelSvc,
        ModelFamily::LinearSgd,
        ModelFamily::LinearSvc,
    ];

    pub fn dir_name(&self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "RF",
            ModelFamily::DecisionTree => "DT",
            ModelFamily::ExtraTrees => "ET",
            ModelFamily::GradientBoosting => "GB",
            ModelFamily::KernelSvc => "KSVC",
            ModelFamily::LinearSgd => "LSGD",
            ModelFamily::LinearSvc => "LSVC",
        }
    }

    /// Folder holding this family's results, e.g. `RF_Timing`
    pub fn timing_dir(&self) -> String {
        format!("{}_Timing", self.dir_name())
    }

    /// Families sorted by directory name, the order results folders are listed in
    pub fn results_order() -> Vec<ModelFamily> {
        let mut families = ModelFamily::SUBMISSION_ORDER.to_vec();
        families.sort_by_key(|family| family.dir_name());
        families
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}
