use std::fmt::Write as _;

use grow_core::{
    calendar,
    facility::Progress,
    metrics::{ComparedReading, MetricComparison, MetricScalar, SideComparison},
    service::DayReport,
};

/// Plain-text day summary printed by `grow_report`.
pub fn render(report: &DayReport, month: &str, progress: &Progress) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", report.label, report.day.date);

    if report.tasks.is_empty() {
        out.push_str("No scheduled tasks\n");
    } else {
        for task in &report.tasks {
            let _ = writeln!(out, "  [ ] {} ({})", task.label, task.category);
        }
    }

    if let Some(location) = &report.location {
        let _ = writeln!(out, "\n{} [{:?}]", location.section.name, location.section.kind);
        if let Some(plant) = &location.active_plant {
            let _ = writeln!(out, "  {} ID: {}", plant.strain_display, plant.id);
        }
        match &location.stats {
            Some(stats) if stats.has_metrics() => {
                match stats.previous_week {
                    Some(prev) => {
                        let _ = writeln!(out, "  Week {} Metrics vs Week {}", stats.week, prev);
                    }
                    None => {
                        let _ = writeln!(out, "  Week {} Metrics", stats.week);
                    }
                }
                for row in stats.comparisons() {
                    render_row(&mut out, &row);
                }
            }
            _ => out.push_str("  No stats data available\n"),
        }
    }

    let _ = writeln!(
        out,
        "\nFacility {}: {} / {} complete ({:.0}%)",
        calendar::month_display_name(month),
        progress.completed,
        progress.total,
        progress.percent
    );
    out
}

fn render_row(out: &mut String, row: &MetricComparison) {
    match &row.reading {
        ComparedReading::DayNight { day, night } => {
            let _ = writeln!(out, "  {}", row.label);
            render_side(out, "Day", row.unit, day);
            render_side(out, "Night", row.unit, night);
        }
        ComparedReading::Scalar {
            current,
            previous,
            trend,
        } => {
            let current = current.as_scalar().map(ToString::to_string).unwrap_or_default();
            let _ = write!(out, "  {}: {}{} {}", row.label, current, row.unit, trend.arrow());
            if let Some(previous) = previous.as_ref().and_then(|p| p.as_scalar()) {
                let _ = write!(out, " (was {}{})", previous, row.unit);
            }
            out.push('\n');
        }
    }
}

fn render_side(out: &mut String, period: &str, unit: &str, side: &SideComparison) {
    let current = side
        .current
        .as_ref()
        .map(MetricScalar::to_string)
        .unwrap_or_default();
    let _ = write!(out, "    {period}: {current}{unit} {}", side.trend.arrow());
    if let Some(previous) = &side.previous {
        let _ = write!(out, " (was {previous}{unit})");
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use grow_core::{
        location::{Section, SectionKind, StatsSnapshot},
        metrics::{MetricMap, MetricValue},
        resolve_from,
        service::LocationReport,
        Task,
    };

    #[test]
    fn renders_tasks_stats_and_progress() {
        let day = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(), 0);
        let mut current = MetricMap::new();
        current.insert("temperature".into(), MetricValue::pair(70.0, 65.0));
        current.insert("co2".into(), 1100.0.into());
        let mut previous = MetricMap::new();
        previous.insert("temperature".into(), MetricValue::pair(68.0, 67.0));
        previous.insert("co2".into(), 1100.0.into());

        let report = DayReport {
            label: day.label(),
            day,
            tasks: vec![Task {
                id: "ipm".into(),
                label: "IPM walk-through".into(),
                category: "pest-prevention".into(),
            }],
            location: Some(LocationReport {
                section: Section {
                    id: "f1".into(),
                    name: "Flower 1".into(),
                    kind: SectionKind::Flowering,
                },
                active_plant: None,
                stats: Some(StatsSnapshot {
                    current,
                    previous,
                    week: 7,
                    previous_week: Some(6),
                    timeline: Vec::new(),
                    notes: String::new(),
                }),
            }),
        };
        let progress = Progress {
            completed: 1,
            total: 4,
            percent: 25.0,
        };

        let text = render(&report, "2025-09", &progress);
        assert!(text.starts_with("Today Monday Week 2 (2025-09-08)"));
        assert!(text.contains("[ ] IPM walk-through (pest-prevention)"));
        assert!(text.contains("Week 7 Metrics vs Week 6"));
        assert!(text.contains("Day: 70°F ↑ (was 68°F)"));
        assert!(text.contains("Night: 65°F ↓ (was 67°F)"));
        assert!(text.contains("CO2: 1100ppm → (was 1100ppm)"));
        assert!(text.contains("Facility September 2025: 1 / 4 complete (25%)"));
    }

    #[test]
    fn weekend_without_location_has_no_tasks() {
        let day = resolve_from(NaiveDate::from_ymd_opt(2025, 9, 8).unwrap(), -1);
        let report = DayReport {
            label: day.label(),
            day,
            tasks: Vec::new(),
            location: None,
        };
        let progress = Progress {
            completed: 0,
            total: 0,
            percent: 0.0,
        };
        let text = render(&report, "2025-09", &progress);
        assert!(text.contains("Yesterday Sunday Week 1"));
        assert!(text.contains("No scheduled tasks"));
    }
}
