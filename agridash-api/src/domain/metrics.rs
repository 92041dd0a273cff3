use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// # Documentation
/// Derived per-user metrics, one struct per service category. All of these
/// are ephemeral: they are recomputed from the source collections under the
/// active time window on every request and never persisted.
///
/// Every struct's `Default` is the documented zero shape for a user with no
/// records in that category. Aggregates are always present (0/empty/`None`),
/// never absent.

/// Authentication activity for one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthMetrics {
    /// Logins within the reporting window
    pub total_logins: i64,
    /// Most recent login ever, independent of the window
    pub last_login: Option<DateTime<Utc>>,
}

/// One entry of the traded-goods frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsFrequency {
    pub name: String,
    pub count: i64,
}

/// One entry of the forecasting query-frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryFrequency {
    pub query: String,
    pub count: i64,
}

/// Combined expense-tracking and financial-assessment activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseMetrics {
    pub total_expenses: f64,
    /// Summed expense amounts plus summed assessment profit; there is no
    /// independently tracked revenue figure.
    pub total_revenue: f64,
    pub total_profit: f64,
    pub expense_count: i64,
    pub assessment_count: i64,
    /// Top 5 goods by record count, count-descending
    pub most_traded_goods: Vec<GoodsFrequency>,
    pub financial_stability_avg: Option<f64>,
    pub cash_flow_avg: Option<f64>,
    /// Most recent expense entry within the window
    pub last_activity: Option<DateTime<Utc>>,
}

/// Crop-forecasting activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastingMetrics {
    pub total_predictions: i64,
    /// Distinct regions across all matched queries, sorted
    pub regions_queried: Vec<String>,
    /// Distinct crops across all matched queries, sorted
    pub crops_queried: Vec<String>,
    pub last_prediction: Option<DateTime<Utc>>,
    /// Top 5 first-region/first-crop pairs by count, count-descending
    pub most_frequent_queries: Vec<QueryFrequency>,
}

/// Crop health-assessment activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthMetrics {
    pub total_assessments: i64,
    /// Distinct crop types assessed, sorted
    pub crop_types_assessed: Vec<String>,
    /// total_profit / total_revenue * 100; `None` when revenue is zero
    pub average_profit_margin: Option<f64>,
    pub total_subsidies: f64,
    pub last_assessment: Option<DateTime<Utc>>,
}

/// Recommendation-service activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationMetrics {
    pub loan_advice_count: i64,
    pub cost_cutting_count: i64,
    /// Most recent recommendation of either kind, independent of the window
    pub last_recommendation: Option<DateTime<Utc>>,
    /// Tags of the categories with a nonzero windowed count
    pub recommendation_topics: Vec<String>,
}

/// Topic tag for loan-advice recommendations.
pub const TOPIC_LOAN_ADVICE: &str = "loan_advice";
/// Topic tag for cost-cutting recommendations.
pub const TOPIC_COST_CUTTING: &str = "cost_cutting_strategies";

/// The five per-category metrics for one user, as consumed by the scoring
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositeMetrics {
    pub auth: AuthMetrics,
    pub expenses: ExpenseMetrics,
    pub forecasting: ForecastingMetrics,
    pub health: HealthMetrics,
    pub recommendations: RecommendationMetrics,
}

impl CompositeMetrics {
    /// Most recent activity timestamp across all five categories, taking the
    /// first populated recency field of each category.
    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        [
            self.auth.last_login,
            self.expenses.last_activity,
            self.forecasting.last_prediction,
            self.health.last_assessment,
            self.recommendations.last_recommendation,
        ]
        .into_iter()
        .flatten()
        .max()
    }
}
