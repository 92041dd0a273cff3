use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Loan-advice recommendation record owned by the recommendation service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LoanAdviceModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub recorded_at: DateTime<Utc>,

    /// Generated advice text; opaque to the dashboard core
    pub advice: HeaplessString<500>,
}

impl Identifiable for LoanAdviceModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Cost-cutting strategy record owned by the recommendation service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CostCuttingModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub recorded_at: DateTime<Utc>,

    /// Generated strategy text; opaque to the dashboard core
    pub strategy: HeaplessString<500>,
}

impl Identifiable for CostCuttingModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}
