use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::identifiable::Identifiable;

/// Expense-tracking entry owned by the expense service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpenseModel {
    pub id: Uuid,

    pub user_id: Uuid,

    pub entry_date: DateTime<Utc>,

    /// Traded goods label, e.g. `Teff`, `Fertilizer`
    pub goods: HeaplessString<100>,

    /// Amount in Ethiopian birr
    pub price_etb: f64,
}

impl Identifiable for ExpenseModel {
    fn get_id(&self) -> Uuid {
        self.id
    }
}

/// Per-user group-by result over the expense collection.
///
/// `goods` keeps one entry per matched record, in record order, so the
/// consumer can build the traded-goods frequency table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseRollup {
    pub user_id: Uuid,
    pub total_expenses: f64,
    pub expense_count: i64,
    pub goods: Vec<String>,
    pub last_activity: Option<DateTime<Utc>>,
}
