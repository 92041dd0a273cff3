use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use agridash_db::models::expense::ExpenseRollup;
use agridash_db::repository::expense_store::ExpenseStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

pub struct ExpenseStoreImpl {
    pub pool: Arc<PgPool>,
}

impl ExpenseStoreImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseStore for ExpenseStoreImpl {
    async fn rollup_by_user(
        &self,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<ExpenseRollup>, StoreError> {
        Self::rollup_by_user_impl(self, users, window).await
    }
}
