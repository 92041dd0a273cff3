use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Crop health/financial assessment record owned by the health service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HealthAssessmentModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub recorded_at: DateTime<Utc>,

    pub crop_type: HeaplessString<100>,

    /// Sale price per quintal in birr
    pub sale_price_per_quintal: f64,

    /// Quantity sold in quintals
    pub quantity_sold: f64,

    pub total_cost: f64,

    pub government_subsidy: f64,
}

impl Identifiable for HealthAssessmentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Per-user group-by result over the health-assessment collection.
///
/// Revenue and profit are derived per record before summing:
/// revenue = sale_price_per_quintal * quantity_sold, profit = revenue - total_cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthRollup {
    pub user_id: Uuid,
    pub total_assessments: i64,
    pub total_revenue: f64,
    pub total_profit: f64,
    pub total_subsidies: f64,
    /// Distinct crop types across matched records
    pub crop_types: Vec<String>,
    pub last_assessment: Option<DateTime<Utc>>,
}
