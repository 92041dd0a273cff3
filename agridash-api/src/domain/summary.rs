use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use agridash_db::repository::time_window::TimeFilter;

/// Usage totals for one service category across the whole population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceUsage {
    pub total: i64,
    pub avg_per_user: f64,
}

impl ServiceUsage {
    pub fn new(total: i64, population: u64) -> Self {
        let avg_per_user = if population > 0 {
            total as f64 / population as f64
        } else {
            0.0
        };
        Self { total, avg_per_user }
    }
}

/// System-wide admin dashboard summary.
///
/// Population counts and the regional distribution come straight from the
/// identity collection; the financial and usage figures are reduced from
/// per-user composite metrics, swept in bounded batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemSummary {
    pub total_farmers: u64,
    pub active_farmers: u64,
    pub inactive_farmers: u64,
    pub farmers_needing_attention: u64,

    pub auth_usage: ServiceUsage,
    pub expense_tracking_usage: ServiceUsage,
    pub forecasting_usage: ServiceUsage,
    pub health_assessment_usage: ServiceUsage,
    pub recommendation_usage: ServiceUsage,

    pub total_system_revenue: f64,
    pub total_system_expenses: f64,
    pub total_system_profit: f64,

    pub regional_distribution: HashMap<String, u64>,

    pub time_filter: TimeFilter,
    pub generated_at: DateTime<Utc>,
}

impl SystemSummary {
    /// The all-zero summary used when aggregation degrades.
    pub fn empty(time_filter: TimeFilter) -> Self {
        Self {
            total_farmers: 0,
            active_farmers: 0,
            inactive_farmers: 0,
            farmers_needing_attention: 0,
            auth_usage: ServiceUsage::default(),
            expense_tracking_usage: ServiceUsage::default(),
            forecasting_usage: ServiceUsage::default(),
            health_assessment_usage: ServiceUsage::default(),
            recommendation_usage: ServiceUsage::default(),
            total_system_revenue: 0.0,
            total_system_expenses: 0.0,
            total_system_profit: 0.0,
            regional_distribution: HashMap::new(),
            time_filter,
            generated_at: Utc::now(),
        }
    }
}
