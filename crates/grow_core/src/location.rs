use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metrics::{compare_metrics, MetricComparison, MetricMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Vegetative,
    Flowering,
    Hanging,
    Decontamination,
    Curing,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: String,
    pub strain: String,
    pub strain_display: String,
    pub current_location: String,
    pub status: String,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl Plant {
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// Route slug such as `BT-2025-001-blue-dream`.
    pub fn slug(&self) -> String {
        format!("{}-{}", self.id, self.strain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineStatus {
    Completed,
    Pending,
    Issue,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub label: String,
    pub date: NaiveDate,
    pub status: TimelineStatus,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryStats {
    #[serde(default, skip_serializing_if = "MetricMap::is_empty")]
    pub metrics: MetricMap,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nutrient {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PestTreatment {
    pub name: String,
    pub image: String,
    #[serde(default)]
    pub link: String,
}

/// One dated record for a location, written by staff once per visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationEntry {
    pub id: String,
    pub location_id: String,
    #[serde(default)]
    pub plant_id: String,
    pub date: NaiveDate,
    pub week: u32,
    #[serde(default)]
    pub stats: EntryStats,
    #[serde(default)]
    pub nutrients: Vec<Nutrient>,
    #[serde(default)]
    pub pest_management: Vec<PestTreatment>,
    /// Photo file names, stored under the plant's strain folder.
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SectionsFile {
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlantsFile {
    pub plants: Vec<Plant>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntriesFile {
    pub entries: Vec<LocationEntry>,
}

/// A photo from one of a plant's entries, tagged with where and when it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryImage {
    pub filename: String,
    pub path: String,
    pub location: Option<String>,
    pub week: u32,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbours<'a> {
    pub previous: Option<&'a Section>,
    pub next: Option<&'a Section>,
}

/// Latest and previous week for one location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub current: MetricMap,
    pub previous: MetricMap,
    pub week: u32,
    pub previous_week: Option<u32>,
    pub timeline: Vec<TimelineEvent>,
    pub notes: String,
}

impl StatsSnapshot {
    pub fn has_metrics(&self) -> bool {
        !self.current.is_empty()
    }

    pub fn comparisons(&self) -> Vec<MetricComparison> {
        compare_metrics(&self.current, &self.previous)
    }
}

/// Static grow data: facility sections, tracked plants and their entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowData {
    pub sections: Vec<Section>,
    pub plants: Vec<Plant>,
    pub entries: Vec<LocationEntry>,
}

impl GrowData {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|section| section.id == id)
    }

    pub fn sections_of_kind(&self, kind: SectionKind) -> Vec<&Section> {
        self.sections
            .iter()
            .filter(|section| section.kind == kind)
            .collect()
    }

    /// Adjacent sections in file order; `None` for an unknown id.
    pub fn neighbours(&self, id: &str) -> Option<Neighbours<'_>> {
        let idx = self.sections.iter().position(|section| section.id == id)?;
        Some(Neighbours {
            previous: idx.checked_sub(1).and_then(|prev| self.sections.get(prev)),
            next: self.sections.get(idx + 1),
        })
    }

    /// Entries for a location, newest first.
    pub fn location_entries(&self, location_id: &str) -> Vec<&LocationEntry> {
        newest_first(
            self.entries
                .iter()
                .filter(|entry| entry.location_id == location_id),
        )
    }

    /// Entries for a plant across every location it visited, newest first.
    pub fn plant_entries(&self, plant_id: &str) -> Vec<&LocationEntry> {
        newest_first(self.entries.iter().filter(|entry| entry.plant_id == plant_id))
    }

    /// Every photo across the plant's entries, newest entry first. Empty for
    /// an unknown plant.
    pub fn plant_gallery(&self, plant_id: &str) -> Vec<GalleryImage> {
        let Some(plant) = self.plants.iter().find(|plant| plant.id == plant_id) else {
            return Vec::new();
        };
        self.plant_entries(plant_id)
            .into_iter()
            .flat_map(|entry| {
                let location = self.section(&entry.location_id).map(|s| s.name.clone());
                entry.images.iter().map(move |filename| GalleryImage {
                    filename: filename.clone(),
                    path: format!("strains/{}/{}", plant.strain, filename),
                    location: location.clone(),
                    week: entry.week,
                    date: entry.date,
                })
            })
            .collect()
    }

    pub fn active_plant_in(&self, section_id: &str) -> Option<&Plant> {
        self.plants
            .iter()
            .find(|plant| plant.current_location == section_id && plant.is_active())
    }

    /// Case-insensitive search over plant id, strain and display name.
    pub fn find_plant(&self, query: &str) -> Option<&Plant> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.plants.iter().find(|plant| {
            plant.id.to_lowercase().contains(&needle)
                || plant.strain.to_lowercase().contains(&needle)
                || plant.strain_display.to_lowercase().contains(&needle)
        })
    }

    /// Resolves a route slug: the first three dash-separated parts form the id.
    pub fn plant_from_slug(&self, slug: &str) -> Option<&Plant> {
        let id = slug.split('-').take(3).collect::<Vec<_>>().join("-");
        self.plants.iter().find(|plant| plant.id == id)
    }

    pub fn stats_snapshot(&self, location_id: &str) -> Option<StatsSnapshot> {
        let entries = self.location_entries(location_id);
        let latest = entries.first()?;
        let previous = entries.get(1);
        Some(StatsSnapshot {
            current: latest.stats.metrics.clone(),
            previous: previous
                .map(|entry| entry.stats.metrics.clone())
                .unwrap_or_default(),
            week: latest.week,
            previous_week: previous.map(|entry| entry.week),
            timeline: latest.stats.timeline.clone(),
            notes: latest.stats.notes.clone(),
        })
    }

    pub fn entries_on(&self, location_id: &str, date: NaiveDate) -> Vec<&LocationEntry> {
        self.location_entries(location_id)
            .into_iter()
            .filter(|entry| entry.date == date)
            .collect()
    }
}

fn newest_first<'a>(entries: impl Iterator<Item = &'a LocationEntry>) -> Vec<&'a LocationEntry> {
    let mut out: Vec<&LocationEntry> = entries.collect();
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewFilter {
    Stats,
    Nutrients,
    PestManagement,
    Images,
}

/// Panels shown on a location page. Stats combines freely; the other three
/// are exclusive and switch stats off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewFilters {
    pub stats: bool,
    pub nutrients: bool,
    pub pest_management: bool,
    pub images: bool,
}

impl ViewFilters {
    pub fn toggle(self, filter: ViewFilter) -> Self {
        match filter {
            ViewFilter::Stats => Self {
                stats: !self.stats,
                ..self
            },
            ViewFilter::Nutrients => Self {
                nutrients: !self.nutrients,
                ..Self::default()
            },
            ViewFilter::PestManagement => Self {
                pest_management: !self.pest_management,
                ..Self::default()
            },
            ViewFilter::Images => Self {
                images: !self.images,
                ..Self::default()
            },
        }
    }

    pub fn hides_schedule(&self) -> bool {
        self.stats || self.nutrients || self.pest_management || self.images
    }
}
