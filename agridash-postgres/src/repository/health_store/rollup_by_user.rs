use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use agridash_db::models::health_assessment::HealthRollup;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::HealthStoreImpl;
use crate::utils::TryFromRow;

// Revenue and profit are derived per record inside the aggregation:
// revenue = sale_price_per_quintal * quantity_sold, profit = revenue - total_cost.
const WINDOWED: &str = "SELECT user_id, \
            COUNT(*) AS total_assessments, \
            COALESCE(SUM(sale_price_per_quintal * quantity_sold), 0) AS total_revenue, \
            COALESCE(SUM(sale_price_per_quintal * quantity_sold - total_cost), 0) AS total_profit, \
            COALESCE(SUM(government_subsidy), 0) AS total_subsidies, \
            ARRAY_AGG(DISTINCT crop_type) AS crop_types, \
            MAX(recorded_at) AS last_assessment \
     FROM health_assessments \
     WHERE user_id = ANY($1) AND recorded_at >= $2 \
     GROUP BY user_id";

const UNBOUNDED: &str = "SELECT user_id, \
            COUNT(*) AS total_assessments, \
            COALESCE(SUM(sale_price_per_quintal * quantity_sold), 0) AS total_revenue, \
            COALESCE(SUM(sale_price_per_quintal * quantity_sold - total_cost), 0) AS total_profit, \
            COALESCE(SUM(government_subsidy), 0) AS total_subsidies, \
            ARRAY_AGG(DISTINCT crop_type) AS crop_types, \
            MAX(recorded_at) AS last_assessment \
     FROM health_assessments \
     WHERE user_id = ANY($1) \
     GROUP BY user_id";

impl TryFromRow<PgRow> for HealthRollup {
    fn try_from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(HealthRollup {
            user_id: row.try_get("user_id")?,
            total_assessments: row.try_get("total_assessments")?,
            total_revenue: row.try_get("total_revenue")?,
            total_profit: row.try_get("total_profit")?,
            total_subsidies: row.try_get("total_subsidies")?,
            crop_types: row.try_get("crop_types")?,
            last_assessment: row.try_get("last_assessment")?,
        })
    }
}

impl HealthStoreImpl {
    pub(super) async fn rollup_by_user_impl(
        repo: &HealthStoreImpl,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<HealthRollup>, StoreError> {
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

        rows.iter().map(HealthRollup::try_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::health_store::HealthStoreImpl;
    use crate::test_helper::{insert_farmer, insert_health_assessment, setup_test_pool, test_farmer};
    use agridash_db::repository::health_store::HealthAssessmentStore;
    use agridash_db::repository::time_window::TimeWindow;
    use chrono::Utc;

    #[tokio::test]
    #[ignore = "requires a PostgreSQL instance (DATABASE_URL)"]
    #[serial_test::serial]
    async fn test_rollup_derives_revenue_and_profit(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let pool = setup_test_pool().await?;
        let store = HealthStoreImpl::new(pool.clone());

        let farmer = test_farmer("Health Assessor", None, true);
        insert_farmer(pool.as_ref(), &farmer).await?;
        // revenue = 100 * 10 = 1000, profit = 200
        insert_health_assessment(
            pool.as_ref(),
            farmer.id,
            Utc::now(),
            "Teff",
            100.0,
            10.0,
            800.0,
            50.0,
        )
        .await?;

        let rollups = store
            .rollup_by_user(&[farmer.id], &TimeWindow::UNBOUNDED)
            .await?;
        assert_eq!(rollups.len(), 1);
        let rollup = &rollups[0];
        assert_eq!(rollup.total_assessments, 1);
        assert_eq!(rollup.total_revenue, 1000.0);
        assert_eq!(rollup.total_profit, 200.0);
        assert_eq!(rollup.total_subsidies, 50.0);
        assert_eq!(rollup.crop_types, vec!["Teff"]);

        Ok(())
    }
}
