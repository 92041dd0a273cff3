use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use agridash_db::models::assessment::AssessmentRollup;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use super::repo_impl::AssessmentStoreImpl;
use crate::utils::TryFromRow;

const WINDOWED: &str = "SELECT user_id, \
            COALESCE(SUM(profit), 0) AS total_profit, \
            COUNT(*) AS assessment_count, \
            AVG(financial_stability) AS financial_stability_avg, \
            AVG(cash_flow) AS cash_flow_avg \
     FROM assessments \
     WHERE user_id = ANY($1) AND entry_date >= $2 \
     GROUP BY user_id";

const UNBOUNDED: &str = "SELECT user_id, \
            COALESCE(SUM(profit), 0) AS total_profit, \
            COUNT(*) AS assessment_count, \
            AVG(financial_stability) AS financial_stability_avg, \
            AVG(cash_flow) AS cash_flow_avg \
     FROM assessments \
     WHERE user_id = ANY($1) \
     GROUP BY user_id";

impl TryFromRow<PgRow> for AssessmentRollup {
    fn try_from_row(row: &PgRow) -> Result<Self, StoreError> {
        Ok(AssessmentRollup {
            user_id: row.try_get("user_id")?,
            total_profit: row.try_get("total_profit")?,
            assessment_count: row.try_get("assessment_count")?,
            financial_stability_avg: row.try_get("financial_stability_avg")?,
            cash_flow_avg: row.try_get("cash_flow_avg")?,
        })
    }
}

impl AssessmentStoreImpl {
    pub(super) async fn rollup_by_user_impl(
        repo: &AssessmentStoreImpl,
        users: &[Uuid],
        window: &TimeWindow,
    ) -> Result<Vec<AssessmentRollup>, StoreError> {
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

        rows.iter().map(AssessmentRollup::try_from_row).collect()
    }
}
