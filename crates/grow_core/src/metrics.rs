use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single recorded reading: a JSON number or a numeric-looking string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricScalar {
    Number(f64),
    Text(String),
}

impl MetricScalar {
    /// Numeric value using the lenient leading-number rule (`"6.2 pH"` is 6.2).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricScalar::Number(value) => Some(*value).filter(|v| v.is_finite()),
            MetricScalar::Text(raw) => parse_leading_float(raw),
        }
    }
}

impl From<f64> for MetricScalar {
    fn from(value: f64) -> Self {
        MetricScalar::Number(value)
    }
}

impl From<&str> for MetricScalar {
    fn from(value: &str) -> Self {
        MetricScalar::Text(value.to_string())
    }
}

impl fmt::Display for MetricScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricScalar::Number(value) => write!(f, "{value}"),
            MetricScalar::Text(raw) => f.write_str(raw),
        }
    }
}

/// A metric as stored in an entry: scalar, day/night pair, or anything else
/// the data file happens to contain (never comparable).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Scalar(MetricScalar),
    DayNight {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        day: Option<MetricScalar>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        night: Option<MetricScalar>,
    },
    Other(serde_json::Value),
}

impl MetricValue {
    pub fn pair(day: impl Into<MetricScalar>, night: impl Into<MetricScalar>) -> Self {
        MetricValue::DayNight {
            day: Some(day.into()),
            night: Some(night.into()),
        }
    }

    pub fn as_scalar(&self) -> Option<&MetricScalar> {
        match self {
            MetricValue::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn day(&self) -> Option<&MetricScalar> {
        match self {
            MetricValue::DayNight { day, .. } => day.as_ref(),
            _ => None,
        }
    }

    pub fn night(&self) -> Option<&MetricScalar> {
        match self {
            MetricValue::DayNight { night, .. } => night.as_ref(),
            _ => None,
        }
    }

    pub fn is_day_night(&self) -> bool {
        matches!(self, MetricValue::DayNight { .. })
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Scalar(MetricScalar::Number(value))
    }
}

pub type MetricMap = HashMap<String, MetricValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
    None,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "↑",
            Trend::Down => "↓",
            Trend::Same => "→",
            Trend::None => "",
        }
    }
}

/// Direction of `current` relative to `previous`. Missing or non-numeric
/// input on either side yields [`Trend::None`].
pub fn trend(current: Option<&MetricScalar>, previous: Option<&MetricScalar>) -> Trend {
    let (Some(curr), Some(prev)) = (
        current.and_then(MetricScalar::as_f64),
        previous.and_then(MetricScalar::as_f64),
    ) else {
        return Trend::None;
    };
    if curr > prev {
        Trend::Up
    } else if curr < prev {
        Trend::Down
    } else {
        Trend::Same
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayNightTrend {
    pub day: Trend,
    pub night: Trend,
}

/// Compares the day and night halves independently.
pub fn day_night_trend(current: &MetricValue, previous: Option<&MetricValue>) -> DayNightTrend {
    DayNightTrend {
        day: trend(current.day(), previous.and_then(MetricValue::day)),
        night: trend(current.night(), previous.and_then(MetricValue::night)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricTemplate {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub day_night: bool,
}

pub const METRIC_TEMPLATES: [MetricTemplate; 10] = [
    MetricTemplate { key: "temperature", label: "Temperature", unit: "°F", day_night: true },
    MetricTemplate { key: "humidity", label: "Humidity", unit: "%", day_night: true },
    MetricTemplate { key: "vpd", label: "VPD", unit: "kPa", day_night: false },
    MetricTemplate { key: "co2", label: "CO2", unit: "ppm", day_night: false },
    MetricTemplate { key: "ph", label: "pH", unit: "", day_night: false },
    MetricTemplate { key: "ec", label: "EC", unit: "mS/cm", day_night: false },
    MetricTemplate { key: "lightHours", label: "Light Hours", unit: "hrs", day_night: false },
    MetricTemplate { key: "lightIntensity", label: "Light Intensity", unit: "PPFD", day_night: false },
    MetricTemplate { key: "waterAmount", label: "Water", unit: "gal", day_night: false },
    MetricTemplate { key: "runoff", label: "Runoff", unit: "%", day_night: false },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideComparison {
    pub current: Option<MetricScalar>,
    pub previous: Option<MetricScalar>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparedReading {
    Scalar {
        current: MetricValue,
        previous: Option<MetricValue>,
        trend: Trend,
    },
    DayNight {
        day: SideComparison,
        night: SideComparison,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub reading: ComparedReading,
}

/// Walks the metric catalogue in display order, comparing every metric the
/// current week recorded against the previous week.
pub fn compare_metrics(current: &MetricMap, previous: &MetricMap) -> Vec<MetricComparison> {
    METRIC_TEMPLATES
        .iter()
        .filter_map(|template| {
            let current_value = current.get(template.key)?;
            let previous_value = previous.get(template.key);
            let reading = if template.day_night && current_value.is_day_night() {
                let trends = day_night_trend(current_value, previous_value);
                ComparedReading::DayNight {
                    day: SideComparison {
                        current: current_value.day().cloned(),
                        previous: previous_value.and_then(MetricValue::day).cloned(),
                        trend: trends.day,
                    },
                    night: SideComparison {
                        current: current_value.night().cloned(),
                        previous: previous_value.and_then(MetricValue::night).cloned(),
                        trend: trends.night,
                    },
                }
            } else {
                ComparedReading::Scalar {
                    current: current_value.clone(),
                    previous: previous_value.cloned(),
                    trend: trend(
                        current_value.as_scalar(),
                        previous_value.and_then(MetricValue::as_scalar),
                    ),
                }
            };
            Some(MetricComparison {
                key: template.key,
                label: template.label,
                unit: template.unit,
                reading,
            })
        })
        .collect()
}

/// Parses the longest numeric prefix of `raw`, ignoring leading whitespace.
fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
