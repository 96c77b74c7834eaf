use serde::Serialize;

use crate::{
    metrics::{Granularity, HasMeasures},
    period::PeriodReport,
};

/// Scalar totals shown on a dashboard card for one granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCard {
    pub revenue: f64,
    /// Summed sessions.
    pub sales: u64,
    /// Summed new users.
    pub leads: u64,
    /// Whole-number percentage; 0 when there were no sessions.
    pub conversion_rate: u32,
}

pub fn conversion_rate(conversions: u64, sessions: u64) -> u32 {
    if sessions == 0 {
        return 0;
    }
    (100.0 * conversions as f64 / sessions as f64).round() as u32
}

pub fn summarize<B: HasMeasures>(buckets: &[B]) -> StatCard {
    let mut revenue = 0.0;
    let mut sessions = 0u64;
    let mut new_users = 0u64;
    let mut conversions = 0u64;
    for bucket in buckets {
        let m = bucket.measures();
        revenue += m.revenue;
        sessions = sessions.saturating_add(m.sessions);
        new_users = new_users.saturating_add(m.new_users);
        conversions = conversions.saturating_add(m.conversions);
    }
    StatCard {
        revenue,
        sales: sessions,
        leads: new_users,
        conversion_rate: conversion_rate(conversions, sessions),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatCards {
    pub monthly: StatCard,
    pub quarterly: StatCard,
    pub yearly: StatCard,
}

impl StatCards {
    pub fn from_report(report: &PeriodReport) -> Self {
        Self {
            monthly: summarize(&report.monthly),
            quarterly: summarize(&report.quarterly),
            yearly: summarize(&report.yearly),
        }
    }

    pub fn get(&self, granularity: Granularity) -> StatCard {
        match granularity {
            Granularity::Monthly => self.monthly,
            Granularity::Quarterly => self.quarterly,
            Granularity::Yearly => self.yearly,
        }
    }
}
