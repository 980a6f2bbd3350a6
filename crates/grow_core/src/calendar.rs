use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Highest week bucket; days 22 and later of any month collapse into it.
pub const MAX_WEEK_BUCKET: u32 = 4;

/// A calendar day resolved relative to "today".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayInfo {
    pub date: NaiveDate,
    pub offset: i64,
    pub day_name: String,
    pub week_name: String,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
    pub is_weekday: bool,
}

impl DayInfo {
    pub fn week_bucket(&self) -> u32 {
        week_bucket(self.date)
    }

    /// Human label such as `Today Monday Week 2` or `3 Days Ago Friday Week 1`.
    pub fn label(&self) -> String {
        let relative = match self.offset {
            0 => "Today".to_string(),
            -1 => "Yesterday".to_string(),
            1 => "Tomorrow".to_string(),
            d if d < 0 => format!("{} Days Ago", d.unsigned_abs()),
            d => format!("{} Days From Now", d),
        };
        format!("{} {} {}", relative, self.day_name, self.week_name)
    }
}

/// Resolves `offset_days` against the local current date.
pub fn resolve(offset_days: i64) -> DayInfo {
    resolve_from(Local::now().date_naive(), offset_days)
}

pub fn resolve_from(today: NaiveDate, offset_days: i64) -> DayInfo {
    let date = shift_days(today, offset_days);
    let day_of_week = date.weekday().num_days_from_sunday();
    DayInfo {
        date,
        offset: offset_days,
        day_name: DAY_NAMES[day_of_week as usize].to_string(),
        week_name: week_name(date),
        day_of_week,
        is_weekday: (1..=5).contains(&day_of_week),
    }
}

pub fn week_bucket(date: NaiveDate) -> u32 {
    date.day().div_ceil(7).min(MAX_WEEK_BUCKET)
}

pub fn week_name(date: NaiveDate) -> String {
    format!("Week {}", week_bucket(date))
}

// Out-of-range offsets clamp to the representable calendar.
fn shift_days(date: NaiveDate, offset_days: i64) -> NaiveDate {
    let magnitude = Days::new(offset_days.unsigned_abs());
    if offset_days >= 0 {
        date.checked_add_days(magnitude).unwrap_or(NaiveDate::MAX)
    } else {
        date.checked_sub_days(magnitude).unwrap_or(NaiveDate::MIN)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub name: String,
    pub date: NaiveDate,
    /// Short form such as `Oct 18`.
    pub date_label: String,
}

/// Sunday through Saturday of the week containing `today`.
pub fn week_days(today: NaiveDate) -> Vec<WeekDay> {
    let back = u64::from(today.weekday().num_days_from_sunday());
    let sunday = today.checked_sub_days(Days::new(back)).unwrap_or(today);
    sunday
        .iter_days()
        .take(7)
        .enumerate()
        .map(|(idx, date)| WeekDay {
            name: DAY_NAMES[idx].to_string(),
            date,
            date_label: date.format("%b %-d").to_string(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthOption {
    pub value: String,
    pub label: String,
}

/// `YYYY-MM` key used to bucket monthly records.
pub fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}

pub fn parse_month_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", key.trim()), "%Y-%m-%d").ok()
}

/// `October 2026` for `2026-10`; falls back to the raw key when unparsable.
pub fn month_display_name(key: &str) -> String {
    parse_month_key(key)
        .map(|date| date.format("%B %Y").to_string())
        .unwrap_or_else(|| key.to_string())
}

/// Three months either side of the month containing `today`.
pub fn month_options(today: NaiveDate) -> Vec<MonthOption> {
    (-3..=3)
        .filter_map(|shift| first_of_month_shifted(today, shift))
        .map(|date| MonthOption {
            value: month_key(date),
            label: date.format("%B %Y").to_string(),
        })
        .collect()
}

fn first_of_month_shifted(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let total_months = date.year() * 12 + (date.month() as i32 - 1) + months;
    let target_year = total_months.div_euclid(12);
    let target_month = (total_months.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(target_year, target_month, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_bucket_caps_at_four() {
        // October 2025 starts on a Wednesday.
        assert_eq!(week_name(ymd(2025, 10, 1)), "Week 1");
        assert_eq!(week_name(ymd(2025, 10, 7)), "Week 1");
        assert_eq!(week_name(ymd(2025, 10, 8)), "Week 2");
        assert_eq!(week_name(ymd(2025, 10, 22)), "Week 4");
        assert_eq!(week_name(ymd(2025, 10, 29)), "Week 4");
        assert_eq!(week_name(ymd(2025, 10, 31)), "Week 4");
    }

    #[test]
    fn yesterday_from_second_monday() {
        // 2025-09-08 is the second Monday of September.
        let info = resolve_from(ymd(2025, 9, 8), -1);
        assert_eq!(info.date, ymd(2025, 9, 7));
        assert_eq!(info.day_of_week, 0);
        assert!(!info.is_weekday);
        assert_eq!(info.label(), "Yesterday Sunday Week 1");
    }

    #[test]
    fn labels_cover_relative_forms() {
        let today = ymd(2025, 9, 10);
        assert_eq!(resolve_from(today, 0).label(), "Today Wednesday Week 2");
        assert_eq!(resolve_from(today, 1).label(), "Tomorrow Thursday Week 2");
        assert_eq!(resolve_from(today, -3).label(), "3 Days Ago Sunday Week 1");
        assert_eq!(
            resolve_from(today, 5).label(),
            "5 Days From Now Monday Week 3"
        );
    }

    #[test]
    fn offsets_roll_over_month_and_year() {
        let info = resolve_from(ymd(2025, 12, 30), 3);
        assert_eq!(info.date, ymd(2026, 1, 2));
        assert_eq!(info.day_name, "Friday");
        assert_eq!(info.week_name, "Week 1");

        let info = resolve_from(ymd(2024, 3, 1), -1);
        assert_eq!(info.date, ymd(2024, 2, 29));
    }

    #[test]
    fn weekday_flag_matches_index_for_every_offset() {
        let today = ymd(2026, 10, 18);
        for offset in -40..40 {
            let info = resolve_from(today, offset);
            assert!(info.day_of_week <= 6);
            assert_eq!(info.is_weekday, (1..=5).contains(&info.day_of_week));
            assert_eq!(info.day_name, DAY_NAMES[info.day_of_week as usize]);
        }
    }

    #[test]
    fn extreme_offsets_saturate() {
        let today = ymd(2026, 10, 18);
        let far_future = resolve_from(today, i64::MAX);
        assert_eq!(far_future.date, NaiveDate::MAX);
        assert!(far_future.label().ends_with(&far_future.week_name));

        let far_past = resolve_from(today, i64::MIN);
        assert_eq!(far_past.date, NaiveDate::MIN);
        assert!(far_past.label().contains("Days Ago"));
    }

    #[test]
    fn week_days_start_on_sunday() {
        let days = week_days(ymd(2026, 10, 18));
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].name, "Sunday");
        assert_eq!(days[0].date, ymd(2026, 10, 18));
        assert_eq!(days[6].date, ymd(2026, 10, 24));
        assert_eq!(days[6].date_label, "Oct 24");

        let days = week_days(ymd(2026, 10, 21));
        assert_eq!(days[0].date, ymd(2026, 10, 18));
    }

    #[test]
    fn month_options_span_year_boundary() {
        let options = month_options(ymd(2026, 1, 15));
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(
            values,
            vec!["2025-10", "2025-11", "2025-12", "2026-01", "2026-02", "2026-03", "2026-04"]
        );
        assert_eq!(options[3].label, "January 2026");
        assert_eq!(month_display_name("2026-10"), "October 2026");
        assert_eq!(month_display_name("garbage"), "garbage");
    }
}
