use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::calendar::DayInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub label: String,
    pub category: String,
}

/// Recurring checklist keyed by weekday name, then week bucket name.
///
/// Serialized as `{ "Monday": { "Week 1": [ { "id": .., "label": .., "category": .. } ] } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduledTaskTable {
    days: HashMap<String, HashMap<String, Vec<Task>>>,
}

impl ScheduledTaskTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, day_name: &str, week_name: &str, task: Task) {
        self.days
            .entry(day_name.to_string())
            .or_default()
            .entry(week_name.to_string())
            .or_default()
            .push(task);
    }

    pub fn with_task(mut self, day_name: &str, week_name: &str, task: Task) -> Self {
        self.insert(day_name, week_name, task);
        self
    }

    /// Appends every task of `other` after the tasks already present.
    pub fn merge(&mut self, other: ScheduledTaskTable) {
        for (day_name, weeks) in other.days {
            let target = self.days.entry(day_name).or_default();
            for (week_name, tasks) in weeks {
                target.entry(week_name).or_default().extend(tasks);
            }
        }
    }

    pub fn bucket(&self, day_name: &str, week_name: &str) -> Option<&[Task]> {
        self.days
            .get(day_name)
            .and_then(|weeks| weeks.get(week_name))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.days.values().all(|weeks| weeks.values().all(Vec::is_empty))
    }
}

/// Tasks scheduled for `day`. Weekends and missing rows yield nothing.
pub fn tasks_for<'a>(day: &DayInfo, table: &'a ScheduledTaskTable) -> &'a [Task] {
    if !day.is_weekday {
        return &[];
    }
    table.bucket(&day.day_name, &day.week_name).unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::resolve_from;
    use chrono::NaiveDate;

    fn task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            label: format!("Task {id}"),
            category: "cleaning".to_string(),
        }
    }

    fn sample_table() -> ScheduledTaskTable {
        ScheduledTaskTable::new()
            .with_task("Monday", "Week 2", task("b"))
            .with_task("Monday", "Week 2", task("a"))
            .with_task("Sunday", "Week 1", task("never"))
            .with_task("Wednesday", "Week 1", task("c"))
    }

    #[test]
    fn returns_bucket_in_insertion_order() {
        // 2025-09-08 is a Monday in week bucket 2.
        let day = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(), 0);
        let table = sample_table();
        let ids: Vec<&str> = tasks_for(&day, &table)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn weekend_days_have_no_tasks() {
        let day = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(), -1);
        assert_eq!(day.day_name, "Sunday");
        assert!(tasks_for(&day, &sample_table()).is_empty());
    }

    #[test]
    fn missing_day_or_bucket_is_empty() {
        let table = sample_table();
        // Tuesday has no row at all.
        let tuesday = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 9).unwrap(), 0);
        assert!(tasks_for(&tuesday, &table).is_empty());
        // Wednesday exists, but only for Week 1.
        let wednesday = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 10).unwrap(), 0);
        assert_eq!(wednesday.week_name, "Week 2");
        assert!(tasks_for(&wednesday, &table).is_empty());
    }

    #[test]
    fn merge_appends_after_existing_tasks() {
        let mut table = sample_table();
        table.merge(ScheduledTaskTable::new().with_task("Monday", "Week 2", task("z")));
        let ids: Vec<&str> = table
            .bucket("Monday", "Week 2")
            .unwrap()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "z"]);
        assert!(!table.is_empty());
        assert!(ScheduledTaskTable::new().is_empty());
    }

    #[test]
    fn deserializes_nested_json_table() {
        let raw = r#"{
            "Friday": {
                "Week 4": [
                    { "id": "filters", "label": "Swap intake filters", "category": "hvac" },
                    { "id": "mop", "label": "Mop flower rooms", "category": "cleaning" }
                ]
            }
        }"#;
        let table: ScheduledTaskTable = serde_json::from_str(raw).unwrap();
        // 2025-10-31 is a Friday, day 31 caps into Week 4.
        let day = resolve_from(NaiveDate::from_ymd_opt(2025, 10, 31).unwrap(), 0);
        let tasks = tasks_for(&day, &table);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, "filters");
        assert_eq!(tasks[1].category, "cleaning");
    }
}
