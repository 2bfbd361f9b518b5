//! Read/write the JSON artifacts persisted between steps.
//!
//! - lookup maps (`.validate.json`, `.translate.json`, `.bl.json`, `.hfr.json`)
//! - the schedule as `{part: [values...]}` (`.schedule.json`)
//! - the date axis as `[labels...]` (`.dates.json`)

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{DateAxis, Schedule};
use crate::error::AppError;

pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", parent.display())))?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open '{}': {e} (run `materials prep` / `materials schedule` first?)", path.display()),
        )
    })?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AppError::new(2, format!("Invalid JSON in '{}': {e}", path.display())))
}

/// Persist the schedule and its date axis as two artifacts.
///
/// Both files are staged next to their targets and only renamed into place
/// once both have been written; a failed write leaves the previous pair intact.
pub fn save_schedule(schedule_path: &Path, dates_path: &Path, schedule: &Schedule) -> Result<(), AppError> {
    let schedule_staged = staging_path(schedule_path);
    let dates_staged = staging_path(dates_path);

    let staged = save_json(&schedule_staged, schedule.parts())
        .and_then(|()| save_json(&dates_staged, schedule.dates()));
    if let Err(e) = staged {
        let _ = std::fs::remove_file(&schedule_staged);
        let _ = std::fs::remove_file(&dates_staged);
        return Err(e);
    }

    commit(&schedule_staged, schedule_path)?;
    commit(&dates_staged, dates_path)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn commit(staged: &Path, target: &Path) -> Result<(), AppError> {
    std::fs::rename(staged, target).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to move '{}' to '{}': {e}", staged.display(), target.display()),
        )
    })
}

/// Load the schedule artifacts, checking that every entry matches the date axis.
pub fn load_schedule(schedule_path: &Path, dates_path: &Path) -> Result<Schedule, AppError> {
    let dates: DateAxis = load_json(dates_path)?;
    let parts: BTreeMap<String, Vec<f64>> = load_json(schedule_path)?;
    Schedule::new(dates, parts).map_err(|e| {
        AppError::new(
            2,
            format!("'{}' does not match '{}': {e}", schedule_path.display(), dates_path.display()),
        )
    })
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;

    fn tmp_dir(name: &str) -> PathBuf {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let dir = std::env::temp_dir().join(format!("materials_artifacts_{}_{}_{}", std::process::id(), nanos, name));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn schedule(labels: &[&str], p1: Vec<f64>) -> Schedule {
        let dates = DateAxis::new(labels.iter().map(|s| s.to_string()).collect());
        let mut parts = BTreeMap::new();
        parts.insert("P1".to_string(), p1);
        Schedule::new(dates, parts).unwrap()
    }

    #[test]
    fn saved_schedule_loads_back_without_leftovers() {
        let dir = tmp_dir("roundtrip");
        let (sched_path, dates_path) = (dir.join(".schedule.json"), dir.join(".dates.json"));

        let original = schedule(&["01/06", "01/13"], vec![6.0, 10.0]);
        save_schedule(&sched_path, &dates_path, &original).unwrap();

        let loaded = load_schedule(&sched_path, &dates_path).unwrap();
        assert_eq!(loaded.dates(), original.dates());
        assert_eq!(loaded.get("P1"), Some(&[6.0, 10.0][..]));
        assert!(!staging_path(&sched_path).exists());
        assert!(!staging_path(&dates_path).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failed_dates_write_keeps_previous_pair() {
        let dir = tmp_dir("partial");
        let (sched_path, dates_path) = (dir.join(".schedule.json"), dir.join(".dates.json"));

        let old = schedule(&["01/06"], vec![1.0]);
        save_schedule(&sched_path, &dates_path, &old).unwrap();

        // A directory in the way makes the dates file impossible to stage.
        std::fs::create_dir_all(staging_path(&dates_path)).unwrap();
        let new = schedule(&["01/06", "01/13"], vec![2.0, 3.0]);
        let err = save_schedule(&sched_path, &dates_path, &new).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let loaded = load_schedule(&sched_path, &dates_path).unwrap();
        assert_eq!(loaded.dates().labels(), ["01/06"]);
        assert_eq!(loaded.get("P1"), Some(&[1.0][..]));
        assert!(!staging_path(&sched_path).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn schedule_artifact_shape() {
        let dates = DateAxis::new(vec!["01/06".to_string(), "01/13".to_string()]);
        let mut parts = BTreeMap::new();
        parts.insert("P1".to_string(), vec![6.0, 10.0]);
        let schedule = Schedule::new(dates, parts).unwrap();

        let parts_json = serde_json::to_value(schedule.parts()).unwrap();
        assert_eq!(parts_json, serde_json::json!({ "P1": [6.0, 10.0] }));

        let dates_json = serde_json::to_value(schedule.dates()).unwrap();
        assert_eq!(dates_json, serde_json::json!(["01/06", "01/13"]));

        let back: DateAxis = serde_json::from_value(dates_json).unwrap();
        assert_eq!(&back, schedule.dates());
    }
}
