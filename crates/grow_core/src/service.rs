use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    calendar::{self, DayInfo},
    error::{GrowError, Result},
    facility::{CompletionLedger, FacilityTask, FacilityTasksFile, Progress},
    location::{EntriesFile, GrowData, Plant, PlantsFile, Section, SectionsFile, StatsSnapshot},
    schedule::{self, ScheduledTaskTable, Task},
};

/// Everything loaded from the data roots at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    pub data: GrowData,
    pub facility_tasks: Vec<FacilityTask>,
    pub schedule: ScheduledTaskTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFile {
    Sections,
    Plants,
    Entries,
    FacilityTasks,
    Schedule,
}

impl DatasetFile {
    fn from_path(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            "sections.json" => Some(Self::Sections),
            "plants.json" => Some(Self::Plants),
            "locationData.json" => Some(Self::Entries),
            "facilityTasks.json" => Some(Self::FacilityTasks),
            "schedule.json" => Some(Self::Schedule),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationReport {
    pub section: Section,
    pub active_plant: Option<Plant>,
    pub stats: Option<StatsSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayReport {
    pub day: DayInfo,
    pub label: String,
    pub tasks: Vec<Task>,
    pub location: Option<LocationReport>,
}

pub struct GrowService {
    roots: Arc<RwLock<Vec<PathBuf>>>,
    base_schedule: ScheduledTaskTable,
    workspace: Arc<RwLock<Workspace>>,
    watcher: Option<RecommendedWatcher>,
}

pub struct GrowServiceBuilder {
    roots: Vec<PathBuf>,
    schedule: Option<ScheduledTaskTable>,
}

impl GrowServiceBuilder {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            schedule: None,
        }
    }

    pub fn add_root(mut self, path: impl AsRef<Path>) -> Self {
        Self::push_unique(&mut self.roots, path.as_ref().to_path_buf());
        self
    }

    /// Tasks merged ahead of any `schedule.json` found under the roots.
    pub fn with_schedule(mut self, table: ScheduledTaskTable) -> Self {
        self.schedule = Some(table);
        self
    }

    pub fn build(self) -> Result<GrowService> {
        let base_schedule = self.schedule.unwrap_or_default();
        let workspace = load_workspace(&self.roots, &base_schedule)?;
        Ok(GrowService {
            roots: Arc::new(RwLock::new(self.roots)),
            base_schedule,
            workspace: Arc::new(RwLock::new(workspace)),
            watcher: None,
        })
    }

    fn push_unique(vec: &mut Vec<PathBuf>, path: PathBuf) {
        if !vec.contains(&path) {
            vec.push(path);
        }
    }
}

impl Default for GrowServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GrowService {
    pub fn builder() -> GrowServiceBuilder {
        GrowServiceBuilder::new()
    }

    pub fn roots(&self) -> Vec<PathBuf> {
        self.roots.read().clone()
    }

    /// Adds a root and reloads. A root whose data fails to load is not kept.
    pub fn add_root(&mut self, path: PathBuf) -> Result<()> {
        let mut roots = self.roots();
        if roots.contains(&path) {
            return Ok(());
        }
        roots.push(path.clone());
        let fresh = load_workspace(&roots, &self.base_schedule)?;
        *self.roots.write() = roots;
        *self.workspace.write() = fresh;
        self.watch_path(&path)
    }

    /// Reloads every root. The previous snapshot stays in place on failure.
    pub fn reload_all(&self) -> Result<()> {
        let fresh = load_workspace(&self.roots.read(), &self.base_schedule)?;
        *self.workspace.write() = fresh;
        Ok(())
    }

    pub fn workspace(&self) -> Workspace {
        self.workspace.read().clone()
    }

    pub fn data(&self) -> GrowData {
        self.workspace.read().data.clone()
    }

    pub fn schedule(&self) -> ScheduledTaskTable {
        self.workspace.read().schedule.clone()
    }

    pub fn facility_tasks(&self) -> Vec<FacilityTask> {
        self.workspace.read().facility_tasks.clone()
    }

    pub fn facility_progress(&self, month: &str, ledger: &CompletionLedger) -> Progress {
        ledger.progress(month, &self.workspace.read().facility_tasks)
    }

    pub fn day_report(&self, offset_days: i64, location_id: Option<&str>) -> Result<DayReport> {
        self.day_report_from(Local::now().date_naive(), offset_days, location_id)
    }

    pub fn day_report_from(
        &self,
        today: NaiveDate,
        offset_days: i64,
        location_id: Option<&str>,
    ) -> Result<DayReport> {
        let guard = self.workspace.read();
        let day = calendar::resolve_from(today, offset_days);
        let tasks = schedule::tasks_for(&day, &guard.schedule).to_vec();
        let location = location_id
            .map(|id| {
                let section = guard
                    .data
                    .section(id)
                    .cloned()
                    .ok_or_else(|| GrowError::UnknownLocation(id.to_string()))?;
                Ok::<_, GrowError>(LocationReport {
                    section,
                    active_plant: guard.data.active_plant_in(id).cloned(),
                    stats: guard.data.stats_snapshot(id),
                })
            })
            .transpose()?;
        Ok(DayReport {
            label: day.label(),
            day,
            tasks,
            location,
        })
    }

    /// Starts a watcher that reloads the workspace whenever a root changes.
    pub fn watch(&mut self) -> Result<()> {
        if self.watcher.is_some() {
            return Ok(());
        }
        let roots = Arc::clone(&self.roots);
        let base_schedule = self.base_schedule.clone();
        let workspace = Arc::clone(&self.workspace);
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    warn!(%err, "watch error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }
            if !event
                .paths
                .iter()
                .any(|path| DatasetFile::from_path(path).is_some())
            {
                return;
            }
            debug!(?event, "dataset change detected");
            let roots = roots.read().clone();
            match load_workspace(&roots, &base_schedule) {
                Ok(fresh) => *workspace.write() = fresh,
                Err(err) => warn!(%err, "reload after change failed; keeping previous data"),
            }
        })?;
        for root in self.roots() {
            watcher.watch(&root, Self::watch_mode(&root))?;
        }
        self.watcher = Some(watcher);
        Ok(())
    }
}

impl GrowService {
    fn watch_path(&mut self, path: &Path) -> Result<()> {
        if let Some(watcher) = &mut self.watcher {
            watcher.watch(path, Self::watch_mode(path))?;
        }
        Ok(())
    }

    fn watch_mode(path: &Path) -> RecursiveMode {
        if path.is_file() {
            RecursiveMode::NonRecursive
        } else {
            RecursiveMode::Recursive
        }
    }
}

fn load_workspace(roots: &[PathBuf], base_schedule: &ScheduledTaskTable) -> Result<Workspace> {
    let mut workspace = Workspace {
        schedule: base_schedule.clone(),
        ..Workspace::default()
    };
    for root in roots {
        ingest_root(&mut workspace, root)?;
    }
    info!(
        sections = workspace.data.sections.len(),
        plants = workspace.data.plants.len(),
        entries = workspace.data.entries.len(),
        facility_tasks = workspace.facility_tasks.len(),
        "grow data loaded"
    );
    Ok(workspace)
}

fn ingest_root(workspace: &mut Workspace, root: &Path) -> Result<()> {
    if root.is_file() {
        if let Some(kind) = DatasetFile::from_path(root) {
            ingest_file(workspace, root, kind)?;
        }
        return Ok(());
    }
    if !root.is_dir() {
        warn!(path = %root.display(), "data root does not exist");
        return Ok(());
    }
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(kind) = DatasetFile::from_path(entry.path()) {
            ingest_file(workspace, entry.path(), kind)?;
        }
    }
    Ok(())
}

fn ingest_file(workspace: &mut Workspace, path: &Path, kind: DatasetFile) -> Result<()> {
    debug!(path = %path.display(), ?kind, "loading dataset");
    match kind {
        DatasetFile::Sections => {
            let file: SectionsFile = read_json(path)?;
            workspace.data.sections.extend(file.sections);
        }
        DatasetFile::Plants => {
            let file: PlantsFile = read_json(path)?;
            workspace.data.plants.extend(file.plants);
        }
        DatasetFile::Entries => {
            let file: EntriesFile = read_json(path)?;
            workspace.data.entries.extend(file.entries);
        }
        DatasetFile::FacilityTasks => {
            let file: FacilityTasksFile = read_json(path)?;
            workspace.facility_tasks.extend(file.facility_tasks);
        }
        DatasetFile::Schedule => {
            let table: ScheduledTaskTable = read_json(path)?;
            workspace.schedule.merge(table);
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|err| GrowError::io(path, err))?;
    serde_json::from_str(&raw).map_err(|err| GrowError::json(path, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_dataset_file_names() {
        assert_eq!(
            DatasetFile::from_path(Path::new("/data/location/locationData.json")),
            Some(DatasetFile::Entries)
        );
        assert_eq!(
            DatasetFile::from_path(Path::new("facilityTasks.json")),
            Some(DatasetFile::FacilityTasks)
        );
        assert_eq!(DatasetFile::from_path(Path::new("notes.json")), None);
        assert_eq!(DatasetFile::from_path(Path::new("/")), None);
    }

    #[test]
    fn empty_service_still_resolves_days() {
        let service = GrowService::builder().build().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let report = service.day_report_from(today, -1, None).unwrap();
        assert_eq!(report.label, "Yesterday Sunday Week 1");
        assert!(report.tasks.is_empty());
        assert!(report.location.is_none());
    }

    #[test]
    fn unknown_location_is_an_error() {
        let service = GrowService::builder().build().unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
        let err = service.day_report_from(today, 0, Some("f99")).unwrap_err();
        assert!(matches!(err, GrowError::UnknownLocation(id) if id == "f99"));
    }
}
