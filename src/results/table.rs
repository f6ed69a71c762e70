use std::path::Path;

use anyhow::{Context, Result};
use csv::StringRecord;
use log::info;
use serde::Deserialize;

use crate::results::summary::Summary;

#[derive(Debug, Deserialize)]
struct TaskRow {
    task_id: u32,
}

/// The rows of a `tasks_summary.csv`, kept as read so every metadata column survives a rewrite
#[derive(Debug)]
pub struct TaskTable {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    task_ids: Vec<u32>,
}

impl TaskTable {
    /// Read a CSV with at least a `task_id` column
    pub fn read(path: &Path) -> Result<TaskTable> {
        info!("Reading tasks from {}", path.display());
        let mut reader = csv::Reader::from_path(path).with_context(|| format!("Tasks CSV file not found: {}", path.display()))?;
        let headers = reader.headers()?.clone();

        let mut rows = Vec::new();
        let mut task_ids = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Reading row {} of {}", line + 1, path.display()))?;
            let row: TaskRow = record
                .deserialize(Some(&headers))
                .with_context(|| format!("Row {} of {} has no valid task_id", line + 1, path.display()))?;
            task_ids.push(row.task_id);
            rows.push(record);
        }

        Ok(TaskTable { headers, rows, task_ids })
    }

    /// Task IDs in row order
    pub fn task_ids(&self) -> &[u32] {
        &self.task_ids
    }

    /// Write the rows of included tasks with one mean accuracy column per model
    ///
    /// A model column already present in the input is overwritten, otherwise it is appended.
    /// Missing accuracies are left blank. Returns the number of rows written.
    pub fn write_included(&self, path: &Path, summary: &Summary, threshold: Option<f64>) -> Result<usize> {
        let mut headers = self.headers.clone();
        let columns: Vec<usize> = summary
            .models
            .iter()
            .map(|model| match self.headers.iter().position(|h| h == model.as_str()) {
                Some(index) => index,
                None => {
                    headers.push_field(model);
                    headers.len() - 1
                }
            })
            .collect();

        let mut writer = csv::Writer::from_path(path).with_context(|| format!("Creating {}", path.display()))?;
        writer.write_record(&headers)?;

        let mut written = 0;
        for (row, task_id) in self.rows.iter().zip(&self.task_ids) {
            let task = match summary.tasks.iter().find(|task| task.task_id == *task_id) {
                Some(task) if task.is_included(threshold) => task,
                _ => continue,
            };
            let mut fields: Vec<String> = row.iter().map(String::from).collect();
            fields.resize(headers.len(), String::new());
            for (model, &column) in summary.models.iter().zip(&columns) {
                fields[column] = match task.accuracies.get(model).copied().flatten() {
                    Some(accuracy) => accuracy.to_string(),
                    None => String::new(),
                };
            }
            writer.write_record(&fields)?;
            written += 1;
        }
        writer.flush()?;

        info!("Wrote {written} tasks to {}", path.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::fs;

    use super::*;
    use crate::results::summary::{ReplicateFailure, TaskSummary};

    fn task(task_id: u32, dt: Option<f64>, rf: Option<f64>, failure: Option<ReplicateFailure>) -> TaskSummary {
        let accuracies = BTreeMap::from([("DT".to_string(), dt), ("RF".to_string(), rf)]);
        TaskSummary { task_id, accuracies, failure }
    }

    fn summary() -> Summary {
        Summary {
            models: vec!["DT".to_string(), "RF".to_string()],
            tasks: vec![
                task(11, Some(0.5), None, None),
                task(22, Some(0.9), Some(0.8), Some(ReplicateFailure::MemoryLimit)),
                task(33, Some(0.25), Some(0.75), None),
            ],
        }
    }

    #[test]
    fn metadata_columns_survive_and_models_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks_summary.csv");
        fs::write(&path, "task_id,name,n_rows\n11,credit,1000\n22,adult,48842\n33,\"spam, ham\",4601\n").unwrap();

        let table = TaskTable::read(&path).unwrap();
        assert_eq!(table.task_ids(), [11, 22, 33]);

        let written = table.write_included(&path, &summary(), None).unwrap();
        assert_eq!(written, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "task_id,name,n_rows,DT,RF\n11,credit,1000,0.5,\n33,\"spam, ham\",4601,0.25,0.75\n"
        );
    }

    #[test]
    fn existing_model_column_is_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tasks.csv");
        let output = dir.path().join("out.csv");
        fs::write(&input, "RF,task_id\nstale,11\nstale,33\n").unwrap();

        let table = TaskTable::read(&input).unwrap();
        table.write_included(&output, &summary(), Some(0.75)).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "RF,task_id,DT\n,11,0.5\n");
    }

    #[test]
    fn row_without_task_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.csv");
        fs::write(&path, "task_id,name\nabc,credit\n").unwrap();
        assert!(TaskTable::read(&path).is_err());
    }
}
