//! Period aggregation: monthly pass-through, calendar-quarter buckets and the
//! trailing twelve-month slice.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::{Measures, MonthlyPoint, QuarterBucket, RawMonthRow, YearMonth};

/// Index 0 is unused; months are 1-based.
pub const MONTH_LABELS: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const YEARLY_WINDOW: usize = 12;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodReport {
    pub monthly: Vec<MonthlyPoint>,
    pub quarterly: Vec<QuarterBucket>,
    pub yearly: Vec<MonthlyPoint>,
}

/// `floor((month - 1) / 3) + 1`; month 0 maps to quarter 0.
pub fn quarter_of(month_idx: u32) -> u32 {
    month_idx.div_ceil(3)
}

/// Rows cover the trailing twelve months ending at `now`, so any month later
/// in the calendar than the current one belongs to the previous year.
pub fn infer_year(month_idx: u32, now: YearMonth) -> i32 {
    if month_idx > now.month {
        now.year - 1
    } else {
        now.year
    }
}

pub fn month_label(month_idx: u32) -> &'static str {
    MONTH_LABELS
        .get(month_idx as usize)
        .copied()
        .unwrap_or_default()
}

/// Annotate source rows in source order.
///
/// Revenue is joined by position: row N takes `revenue[N]`, or `0.0` when the
/// side list is shorter. Surplus revenue entries are ignored.
pub fn monthly_points(rows: &[RawMonthRow], revenue: &[f64], now: YearMonth) -> Vec<MonthlyPoint> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let joined = revenue.get(i).copied().unwrap_or(0.0);
            MonthlyPoint {
                month: month_label(row.month).to_string(),
                month_idx: row.month,
                year: infer_year(row.month, now),
                measures: Measures {
                    active_users: row.active_users,
                    new_users: row.new_users,
                    sessions: row.sessions,
                    conversions: row.conversions,
                    revenue: joined,
                    adsense_revenue: joined,
                },
            }
        })
        .collect()
}

/// Group monthly points into `(year, quarter)` buckets, ascending.
pub fn quarterly_buckets(monthly: &[MonthlyPoint]) -> Vec<QuarterBucket> {
    let mut buckets: BTreeMap<(i32, u32), QuarterBucket> = BTreeMap::new();
    for point in monthly {
        let quarter_idx = quarter_of(point.month_idx);
        buckets
            .entry((point.year, quarter_idx))
            .or_insert_with(|| QuarterBucket::empty(point.year, quarter_idx))
            .measures += &point.measures;
    }
    buckets.into_values().collect()
}

/// Tail slice of the last twelve points; never padded.
pub fn yearly_slice(monthly: &[MonthlyPoint]) -> Vec<MonthlyPoint> {
    let start = monthly.len().saturating_sub(YEARLY_WINDOW);
    monthly[start..].to_vec()
}

pub fn aggregate(rows: &[RawMonthRow], revenue: &[f64], now: YearMonth) -> PeriodReport {
    let monthly = monthly_points(rows, revenue, now);
    let quarterly = quarterly_buckets(&monthly);
    let yearly = yearly_slice(&monthly);
    PeriodReport {
        monthly,
        quarterly,
        yearly,
    }
}
