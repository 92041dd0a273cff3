use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Crop-price forecasting query record owned by the forecasting service.
///
/// The upstream prediction endpoint accepts list-valued inputs, so one
/// record can name several regions and crops. Consumers must flatten these
/// lists before deduplicating.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PredictionModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub recorded_at: DateTime<Utc>,

    pub regions: Vec<String>,

    pub crop_names: Vec<String>,
}

impl Identifiable for PredictionModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
