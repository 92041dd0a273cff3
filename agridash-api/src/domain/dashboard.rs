use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::identity_store::{SortField, SortOrder};
use agridash_db::repository::time_window::TimeFilter;

use crate::domain::metrics::{
    AuthMetrics, ExpenseMetrics, ForecastingMetrics, HealthMetrics, RecommendationMetrics,
};

/// Risk classification derived from the financial metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
    #[default]
    Unknown,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::High => write!(f, "high"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Unknown => write!(f, "unknown"),
        }
    }
}

/// # Documentation
/// One presentable dashboard row: identity fields, the five per-category
/// metrics and the derived scoring fields. Assembled on demand and never
/// persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerDashboard {
    pub user_id: Uuid,
    pub phone_number: HeaplessString<20>,
    pub name: Option<HeaplessString<100>>,
    pub location: Option<HeaplessString<100>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,

    pub auth: AuthMetrics,
    pub expenses: ExpenseMetrics,
    pub forecasting: ForecastingMetrics,
    pub health: HealthMetrics,
    pub recommendations: RecommendationMetrics,

    /// 0-100 activity index across all services
    pub engagement_score: f64,
    pub risk_level: RiskLevel,
    pub needs_attention: bool,
}

/// Identity-only search result; no metrics are computed for searches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerSearchHit {
    pub id: Uuid,
    pub name: Option<HeaplessString<100>>,
    pub phone_number: HeaplessString<20>,
    pub location: Option<HeaplessString<100>>,
    pub is_active: bool,
}

impl From<&FarmerModel> for FarmerSearchHit {
    fn from(farmer: &FarmerModel) -> Self {
        Self {
            id: farmer.id,
            name: farmer.name.clone(),
            phone_number: farmer.phone_number.clone(),
            location: farmer.location.clone(),
            is_active: farmer.is_active,
        }
    }
}

/// Listing filters accepted by the dashboard.
///
/// Identity-level fields (`is_active`, `region`) are pushed to the farmer
/// query; the engagement/attention fields can only be applied after metrics
/// computation. Out-of-range values are clamped by [`Self::normalized`]
/// rather than rejected, so a malformed request degrades to a sane listing.
#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct DashboardFilters {
    #[serde(default)]
    pub time_filter: TimeFilter,

    pub region: Option<String>,

    pub is_active: Option<bool>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub min_engagement_score: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub max_engagement_score: Option<f64>,

    pub needs_attention: Option<bool>,

    /// 1-based page number
    #[validate(range(min = 1))]
    pub page: u32,

    #[validate(range(min = 1, max = 100))]
    pub page_size: u32,

    #[serde(default)]
    pub sort_by: SortField,

    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Default for DashboardFilters {
    fn default() -> Self {
        Self {
            time_filter: TimeFilter::All,
            region: None,
            is_active: None,
            min_engagement_score: None,
            max_engagement_score: None,
            needs_attention: None,
            page: 1,
            page_size: 20,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
        }
    }
}

impl DashboardFilters {
    /// Clamp pagination and score bounds into their valid ranges.
    pub fn normalized(&self) -> Self {
        let mut filters = self.clone();
        filters.page = filters.page.max(1);
        filters.page_size = filters.page_size.clamp(1, 100);
        filters.min_engagement_score = filters.min_engagement_score.map(|v| v.clamp(0.0, 100.0));
        filters.max_engagement_score = filters.max_engagement_score.map(|v| v.clamp(0.0, 100.0));
        filters
    }
}

/// One page of dashboard rows.
///
/// `total_count` reflects the identity-level filter only; the derived
/// filters (score range, needs-attention) can shrink the returned page
/// below `page_size` without changing it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerPage {
    pub farmers: Vec<FarmerDashboard>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}
