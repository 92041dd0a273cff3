use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Financial self-assessment entry owned by the expense service.
///
/// `financial_stability` and `cash_flow` are 0-100 indicator values produced
/// by the assessment questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AssessmentModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub entry_date: DateTime<Utc>,

    pub profit: f64,

    pub financial_stability: f64,

    pub cash_flow: f64,
}

impl Identifiable for AssessmentModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Per-user group-by result over the assessment collection.
///
/// The averages are `None` when the user has no matched rows; they are never
/// substituted with zero at this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRollup {
    pub user_id: Uuid,
    pub total_profit: f64,
    pub assessment_count: i64,
    pub financial_stability_avg: Option<f64>,
    pub cash_flow_avg: Option<f64>,
}
