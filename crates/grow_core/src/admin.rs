use chrono::{DateTime, NaiveDate, Utc};

use crate::location::{
    EntryStats, LocationEntry, Nutrient, PestTreatment, TimelineEvent, TimelineStatus,
};

pub const LOCATION_IDS: [&str; 26] = [
    "v1", "v2", "v3", "v4", "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "h1",
    "h2", "decon", "c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9",
];

/// Product name and image slug.
pub const NUTRIENT_CATALOGUE: [(&str, &str); 18] = [
    ("Power SI Potassium Silicate", "power-si"),
    ("House and Garden Cocos A", "cocos-a"),
    ("House and Garden Cocos B", "cocos-b"),
    ("Botanicare Cal-Mag Plus", "cal-mag"),
    ("General Hydroponics Diamond Nectar", "diamond-nectar"),
    ("House and Garden Roots Excelurator Gold", "roots-gold"),
    ("Botanicare Hydroguard", "hydroguard"),
    ("Primordial Solutions Sea Green", "sea-green"),
    ("Botanicare Liquid Karma", "liquid-karma"),
    ("Botanicare Vitamino", "vitamino"),
    ("House and Garden Nitrogen Boost", "nitrogen-boost"),
    ("Primordial Solutions PaleoBloom", "paleo-bloom"),
    ("Primordial Solutions True Blooms", "true-blooms"),
    ("Botanicare Hydroplex", "hydroplex"),
    ("House and Garden Bud-XL", "bud-xl"),
    ("Botanicare Sweet Raw", "sweet-raw"),
    ("Botanicare Sweet Berry", "sweet"),
    ("House and Garden Top Shooter", "top-shooter"),
];

/// Product name, image slug and product page.
pub const PEST_CATALOGUE: [(&str, &str, &str); 4] = [
    ("Neem Oil", "neem-oil", ""),
    (
        "Regalia CG Biofungicide",
        "regalia",
        "https://profarmgroup.com/products/regalia-cg",
    ),
    ("Molt-X", "molt-x", "https://bioworksinc.com/products/moltx/"),
    (
        "The Amazing Doctor Zymes",
        "dr-zymes",
        "https://www.doctorzymes.com/pesticide-free-insecticide.php",
    ),
];

pub fn nutrient_options() -> Vec<Nutrient> {
    NUTRIENT_CATALOGUE
        .iter()
        .map(|&(name, image)| Nutrient {
            name: name.to_string(),
            image: image.to_string(),
        })
        .collect()
}

pub fn pest_options() -> Vec<PestTreatment> {
    PEST_CATALOGUE
        .iter()
        .map(|&(name, image, link)| PestTreatment {
            name: name.to_string(),
            image: image.to_string(),
            link: link.to_string(),
        })
        .collect()
}

/// A location entry being assembled by staff before it is exported.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryDraft {
    pub location_id: String,
    pub plant_id: String,
    pub date: NaiveDate,
    pub week: u32,
    pub timeline: Vec<TimelineEvent>,
    pub nutrients: Vec<Nutrient>,
    pub pest_management: Vec<PestTreatment>,
    pub notes: String,
}

impl EntryDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            location_id: LOCATION_IDS[0].to_string(),
            plant_id: String::new(),
            date,
            week: 1,
            timeline: Vec::new(),
            nutrients: Vec::new(),
            pest_management: Vec::new(),
            notes: String::new(),
        }
    }

    /// Appends an event; drafts without a label or date are dropped.
    pub fn add_timeline_event(
        &mut self,
        label: &str,
        date: Option<NaiveDate>,
        status: TimelineStatus,
        notes: &str,
    ) -> bool {
        let label = label.trim();
        let Some(date) = date else {
            return false;
        };
        if label.is_empty() {
            return false;
        }
        self.timeline.push(TimelineEvent {
            label: label.to_string(),
            date,
            status,
            notes: notes.trim().to_string(),
        });
        true
    }

    pub fn remove_timeline_event(&mut self, index: usize) -> Option<TimelineEvent> {
        (index < self.timeline.len()).then(|| self.timeline.remove(index))
    }

    pub fn toggle_nutrient(&mut self, nutrient: &Nutrient) {
        toggle_by_name(&mut self.nutrients, nutrient, |n| &n.name);
    }

    pub fn toggle_pest(&mut self, pest: &PestTreatment) {
        toggle_by_name(&mut self.pest_management, pest, |p| &p.name);
    }

    pub fn into_entry(self, now: DateTime<Utc>) -> LocationEntry {
        LocationEntry {
            id: format!("entry-{}", now.timestamp_millis()),
            location_id: self.location_id,
            plant_id: self.plant_id,
            date: self.date,
            week: self.week,
            stats: EntryStats {
                metrics: Default::default(),
                timeline: self.timeline,
                notes: self.notes,
            },
            nutrients: self.nutrients,
            pest_management: self.pest_management,
            images: Vec::new(),
        }
    }

    /// Finished entry as indented JSON, ready to paste into `locationData.json`.
    pub fn export_json(self, now: DateTime<Utc>) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.into_entry(now))
    }
}

fn toggle_by_name<T: Clone>(items: &mut Vec<T>, item: &T, name: impl Fn(&T) -> &String) {
    let target = name(item);
    if items.iter().any(|existing| name(existing) == target) {
        items.retain(|existing| name(existing) != target);
    } else {
        items.push(item.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn timeline_requires_label_and_date() {
        let mut draft = EntryDraft::new(date());
        assert!(!draft.add_timeline_event("", Some(date()), TimelineStatus::Completed, ""));
        assert!(!draft.add_timeline_event("Flip to flower", None, TimelineStatus::Pending, ""));
        assert!(draft.add_timeline_event(
            "Flip to flower",
            Some(date()),
            TimelineStatus::Pending,
            " 12/12 "
        ));
        assert_eq!(draft.timeline.len(), 1);
        assert_eq!(draft.timeline[0].notes, "12/12");

        assert!(draft.remove_timeline_event(3).is_none());
        assert!(draft.remove_timeline_event(0).is_some());
        assert!(draft.timeline.is_empty());
    }

    #[test]
    fn toggles_select_and_deselect_by_name() {
        let mut draft = EntryDraft::new(date());
        let nutrients = nutrient_options();
        draft.toggle_nutrient(&nutrients[3]);
        draft.toggle_nutrient(&nutrients[0]);
        assert_eq!(draft.nutrients.len(), 2);
        draft.toggle_nutrient(&nutrients[3]);
        assert_eq!(draft.nutrients, vec![nutrients[0].clone()]);

        let pests = pest_options();
        draft.toggle_pest(&pests[1]);
        assert_eq!(draft.pest_management[0].image, "regalia");
        draft.toggle_pest(&pests[1]);
        assert!(draft.pest_management.is_empty());
    }

    #[test]
    fn into_entry_stamps_millisecond_id() {
        let mut draft = EntryDraft::new(date());
        draft.location_id = "f3".into();
        draft.plant_id = "BT-2025-004".into();
        draft.week = 6;
        draft.notes = "Defoliated lower canopy".into();
        let now = Utc.timestamp_millis_opt(1_760_000_000_123).unwrap();
        let entry = draft.into_entry(now);
        assert_eq!(entry.id, "entry-1760000000123");
        assert_eq!(entry.location_id, "f3");
        assert_eq!(entry.week, 6);
        assert_eq!(entry.stats.notes, "Defoliated lower canopy");
        assert!(entry.stats.metrics.is_empty());
        assert!(entry.images.is_empty());
    }

    #[test]
    fn export_writes_indented_entry() {
        let mut draft = EntryDraft::new(date());
        draft.location_id = "v2".into();
        draft.add_timeline_event("Top", Some(date()), TimelineStatus::Completed, "");
        let now = Utc.timestamp_millis_opt(1_760_000_000_000).unwrap();
        let json = draft.export_json(now).unwrap();
        assert!(json.contains("\n  \"id\": \"entry-1760000000000\""));
        assert!(json.contains("\"notes\": \"\""));

        let parsed: LocationEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.location_id, "v2");
        assert_eq!(parsed.stats.timeline[0].label, "Top");
    }

    #[test]
    fn catalogues_are_complete() {
        assert_eq!(LOCATION_IDS.len(), 26);
        assert_eq!(nutrient_options().len(), 18);
        assert_eq!(pest_options()[0].link, "");
    }
}
