use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use agridash_db::models::expense::ExpenseRollup;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::ExpenseStoreImpl;
use crate::utils::TryFromRow;

// Goods are aggregated in entry order so tie-breaking downstream stays
// first-encountered.
const WINDOWED: &str = "SELECT user_id, \
            COALESCE(SUM(price_etb), 0) AS total_expenses, \
            COUNT(*) AS expense_count, \
            ARRAY_AGG(goods ORDER BY entry_date, id) AS goods, \
            MAX(entry_date) AS last_activity \
     FROM expenses \
     WHERE user_id = ANY($1) AND entry_date >= $2 \
     GROUP BY user_id";

const UNBOUNDED: &str = "SELECT user_id, \
            COALESCE(SUM(price_etb), 0) AS total_expenses, \
            COUNT(*) AS expense_count, \
            ARRAY_AGG(goods ORDER BY entry_date, id) AS goods, \
            MAX(entry_date) AS last_activity \
     FROM expenses \
     WHERE user_id = ANY($1) \
     GROUP BY user_id";

impl TryFromRow<PgRow> for ExpenseRollup {
    fn try_from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(ExpenseRollup {
            user_id: row.try_get("user_id")?,
            total_expenses: row.try_get("total_expenses")?,
            expense_count: row.try_get("expense_count")?,
            goods: row.try_get("goods")?,
            last_activity: row.try_get("last_activity")?,
        })
    }
}

impl ExpenseStoreImpl {
    pub(super) async fn rollup_by_user_impl(
        repo: &ExpenseStoreImpl,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<ExpenseRollup>, StoreError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }

        let rows = match window.since {
            Some(since) => {
                sqlx::query(WINDOWED)
                    .bind(users)
                    .bind(since)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
            None => {
                sqlx::query(UNBOUNDED)
                    .bind(users)
                    .fetch_all(repo.pool.as_ref())
                    .await?
            }
        };

        rows.iter().map(ExpenseRollup::try_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::expense_store::ExpenseStoreImpl;
    use crate::test_helper::{insert_expense, insert_farmer, setup_test_pool, test_farmer};
    use agridash_db::repository::expense_store::ExpenseStore;
    use agridash_db::repository::time_window::{TimeFilter, TimeWindow};
    use chrono::{Duration, Utc};

    #[tokio::test]
    #[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
    #[serial_test::serial]
    async fn test_rollup_sums_counts_and_pushes_goods(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pool = setup_test_pool().await?;
        let store = ExpenseStoreImpl::new(pool.clone());

        let farmer = test_farmer("Expense Roller", None, true);
        insert_farmer(pool.as_ref(), &farmer).await?;
        let now = Utc::now();
        insert_expense(pool.as_ref(), farmer.id, now - Duration::days(2), "Maize", 100.0).await?;
        insert_expense(pool.as_ref(), farmer.id, now - Duration::days(1), "Teff", 150.0).await?;
        insert_expense(pool.as_ref(), farmer.id, now - Duration::days(40), "Teff", 60.0).await?;

        let rollups = store
            .rollup_by_user(&[farmer.id], &TimeWindow::UNBOUNDED)
            .await?;
        assert_eq!(rollups.len(), 1);
        let rollup = &rollups[0];
        assert_eq!(rollup.expense_count, 3);
        assert_eq!(rollup.total_expenses, 310.0);
        assert_eq!(rollup.goods, vec!["Teff", "Maize", "Teff"]);

        let monthly = TimeFilter::Monthly.window();
        let rollups = store.rollup_by_user(&[farmer.id], &monthly).await?;
        assert_eq!(rollups[0].expense_count, 2);
        assert_eq!(rollups[0].total_expenses, 250.0);

        // user without records has no row at all
        let rollups = store
            .rollup_by_user(&[uuid::Uuid::new_v4()], &TimeWindow::UNBOUNDED)
            .await?;
        assert!(rollups.is_empty());

        Ok(())
    }
}
