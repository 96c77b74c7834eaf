//! Monthly metric rows and the bucket types derived from them.

use std::ops::AddAssign;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One calendar month as delivered by a metrics source.
///
/// Sources report a bare month index with no year; the year is inferred at
/// aggregation time (see [`crate::period::infer_year`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMonthRow {
    pub month: u32,
    #[serde(default)]
    pub active_users: u64,
    #[serde(default)]
    pub new_users: u64,
    #[serde(default)]
    pub sessions: u64,
    #[serde(default)]
    pub conversions: u64,
}

impl RawMonthRow {
    /// Parse a GA4-style month dimension value ("01".."12").
    pub fn parse_month(raw: &str) -> Result<u32, CoreError> {
        raw.trim()
            .parse::<u32>()
            .map_err(|_| CoreError::InvalidMonth(raw.to_string()))
    }
}

/// Summable fields shared by every bucket granularity.
///
/// Counts saturate at `u64::MAX` instead of overflowing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Measures {
    pub active_users: u64,
    pub new_users: u64,
    pub sessions: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub adsense_revenue: f64,
}

impl AddAssign<&Measures> for Measures {
    fn add_assign(&mut self, rhs: &Measures) {
        self.active_users = self.active_users.saturating_add(rhs.active_users);
        self.new_users = self.new_users.saturating_add(rhs.new_users);
        self.sessions = self.sessions.saturating_add(rhs.sessions);
        self.conversions = self.conversions.saturating_add(rhs.conversions);
        self.revenue += rhs.revenue;
        self.adsense_revenue += rhs.adsense_revenue;
    }
}

/// Anything the stat summarizer can reduce.
pub trait HasMeasures {
    fn measures(&self) -> &Measures;
}

/// A month annotated with its inferred year, label and joined revenue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    pub month: String,
    pub month_idx: u32,
    pub year: i32,
    #[serde(flatten)]
    pub measures: Measures,
}

impl HasMeasures for MonthlyPoint {
    fn measures(&self) -> &Measures {
        &self.measures
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterBucket {
    pub quarter: String,
    pub quarter_idx: u32,
    pub year: i32,
    #[serde(flatten)]
    pub measures: Measures,
}

impl QuarterBucket {
    pub fn empty(year: i32, quarter_idx: u32) -> Self {
        Self {
            quarter: format!("Q{quarter_idx}"),
            quarter_idx,
            year,
            measures: Measures::default(),
        }
    }

    /// Grouping key, e.g. `2025-Q1`.
    pub fn key(&self) -> String {
        format!("{}-Q{}", self.year, self.quarter_idx)
    }
}

impl HasMeasures for QuarterBucket {
    fn measures(&self) -> &Measures {
        &self.measures
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Monthly,
    Quarterly,
    Yearly,
}

impl Granularity {
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") | Some("monthly") => Ok(Self::Monthly),
            Some("quarterly") => Ok(Self::Quarterly),
            Some("yearly") => Ok(Self::Yearly),
            Some(other) => Err(CoreError::InvalidGranularity(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

/// Calendar year and month used as "now" for year inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Current UTC wall-clock month.
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_row_deserializes_camel_case_with_missing_fields() {
        let row: RawMonthRow =
            serde_json::from_str(r#"{"month":3,"activeUsers":7,"sessions":12}"#).expect("row");
        assert_eq!(row.month, 3);
        assert_eq!(row.active_users, 7);
        assert_eq!(row.new_users, 0);
        assert_eq!(row.sessions, 12);
    }

    #[test]
    fn parse_month_accepts_zero_padded() {
        assert_eq!(RawMonthRow::parse_month("01").expect("month"), 1);
        assert_eq!(RawMonthRow::parse_month("12").expect("month"), 12);
        assert!(RawMonthRow::parse_month("Jan").is_err());
    }

    #[test]
    fn granularity_defaults_to_monthly_and_rejects_unknown() {
        assert_eq!(Granularity::parse(None).expect("g"), Granularity::Monthly);
        assert_eq!(
            Granularity::parse(Some("quarterly")).expect("g"),
            Granularity::Quarterly
        );
        assert!(Granularity::parse(Some("weekly")).is_err());
    }

    #[test]
    fn measures_saturate_instead_of_overflowing() {
        let mut total = Measures {
            sessions: u64::MAX / 2 + 1,
            new_users: u64::MAX,
            ..Measures::default()
        };
        let month = total;
        total += &month;
        assert_eq!(total.sessions, u64::MAX);
        assert_eq!(total.new_users, u64::MAX);
    }

    #[test]
    fn quarter_bucket_serializes_flat_camel_case() {
        let mut bucket = QuarterBucket::empty(2025, 2);
        bucket.measures.sessions = 4;
        let json = serde_json::to_value(&bucket).expect("json");
        assert_eq!(json["quarter"], "Q2");
        assert_eq!(json["quarterIdx"], 2);
        assert_eq!(json["sessions"], 4);
        assert_eq!(json["adsenseRevenue"], 0.0);
        assert_eq!(bucket.key(), "2025-Q2");
    }
}
