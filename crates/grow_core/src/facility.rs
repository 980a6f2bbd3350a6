use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{GrowError, Result};

pub const DEFAULT_COMPLETED_BY: &str = "Staff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityTask {
    pub id: String,
    pub label: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityTasksFile {
    pub facility_tasks: Vec<FacilityTask>,
}

/// Report headings in display order, paired with the category slug they collect.
pub const CATEGORY_HEADINGS: [(&str, &str); 6] = [
    ("hvac", "HVAC & Climate Control"),
    ("cleaning", "Cleaning"),
    ("pest-prevention", "Pest Prevention"),
    ("equipment", "Equipment"),
    ("safety", "Safety"),
    ("maintenance", "Maintenance"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskGroup<'a> {
    pub heading: &'static str,
    pub tasks: Vec<&'a FacilityTask>,
}

/// Groups tasks under the fixed headings, omitting empty groups. Tasks with an
/// unrecognised category are left out.
pub fn group_by_category(tasks: &[FacilityTask]) -> Vec<TaskGroup<'_>> {
    CATEGORY_HEADINGS
        .iter()
        .map(|&(slug, heading)| TaskGroup {
            heading,
            tasks: tasks.iter().filter(|task| task.category == slug).collect(),
        })
        .filter(|group| !group.tasks.is_empty())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub date: DateTime<Utc>,
    pub completed_by: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Monthly completion marks and notes for facility tasks, keyed by
/// `{YYYY-MM}-{task_id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionLedger {
    #[serde(default)]
    pub completions: HashMap<String, Completion>,
    #[serde(default)]
    pub notes: HashMap<String, String>,
}

pub fn ledger_key(month: &str, task_id: &str) -> String {
    format!("{month}-{task_id}")
}

impl CompletionLedger {
    pub fn is_completed(&self, month: &str, task_id: &str) -> bool {
        self.completions.contains_key(&ledger_key(month, task_id))
    }

    pub fn completion(&self, month: &str, task_id: &str) -> Option<&Completion> {
        self.completions.get(&ledger_key(month, task_id))
    }

    /// Flips the completion mark and reports whether the task is now complete.
    pub fn toggle(&mut self, month: &str, task_id: &str, now: DateTime<Utc>) -> bool {
        let key = ledger_key(month, task_id);
        if self.completions.remove(&key).is_some() {
            return false;
        }
        self.completions.insert(
            key,
            Completion {
                date: now,
                completed_by: DEFAULT_COMPLETED_BY.to_string(),
            },
        );
        true
    }

    pub fn set_note(&mut self, month: &str, task_id: &str, text: impl Into<String>) {
        self.notes.insert(ledger_key(month, task_id), text.into());
    }

    pub fn note(&self, month: &str, task_id: &str) -> &str {
        self.notes
            .get(&ledger_key(month, task_id))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn progress(&self, month: &str, tasks: &[FacilityTask]) -> Progress {
        let completed = tasks
            .iter()
            .filter(|task| self.is_completed(month, &task.id))
            .count();
        let total = tasks.len();
        let percent = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Progress {
            completed,
            total,
            percent,
        }
    }
}

/// JSON file backing a [`CompletionLedger`].
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the ledger; a missing file is an empty ledger.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> Result<CompletionLedger> {
        if !self.path.exists() {
            debug!("no ledger on disk yet");
            return Ok(CompletionLedger::default());
        }
        let raw = fs::read_to_string(&self.path).map_err(|err| GrowError::io(&self.path, err))?;
        serde_json::from_str(&raw).map_err(|err| GrowError::json(&self.path, err))
    }

    #[instrument(skip(self, ledger), fields(path = %self.path.display()))]
    pub fn save(&self, ledger: &CompletionLedger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| GrowError::io(parent, err))?;
            }
        }
        let payload =
            serde_json::to_string_pretty(ledger).map_err(|err| GrowError::json(&self.path, err))?;
        fs::write(&self.path, payload).map_err(|err| GrowError::io(&self.path, err))?;
        debug!(completions = ledger.completions.len(), "ledger saved");
        Ok(())
    }
}
