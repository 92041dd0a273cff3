//! System-wide summary aggregation.
//!
//! Population counts and the regional distribution come from the identity
//! store directly; everything derived sweeps the full population through
//! the bulk orchestrator in bounded, sequential batches so no single call
//! materializes metrics for every user at once.

use std::sync::Arc;

use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use agridash_db::repository::identity_store::IdentityStore;
use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::time_window::TimeFilter;
use agridash_db::repository::StoreError;

use crate::domain::summary::{ServiceUsage, SystemSummary};
use crate::service::orchestrator::MetricsOrchestrator;
use crate::service::scoring::{assess_risk, engagement_score, needs_attention};

/// Population sweep batch size.
pub const SUMMARY_BATCH_SIZE: usize = 100;

pub struct SummaryService {
    identity: Arc<dyn IdentityStore>,
    orchestrator: MetricsOrchestrator,
}

impl SummaryService {
    pub fn new(identity: Arc<dyn IdentityStore>, orchestrator: MetricsOrchestrator) -> Self {
        Self {
            identity,
            orchestrator,
        }
    }

    /// System summary under the given time filter.
    ///
    /// Degrades to the all-zero summary on store failure; a dashboard that
    /// renders zeros beats one that errors out.
    pub async fn system_summary(&self, time_filter: TimeFilter) -> SystemSummary {
        match self.compute_summary(time_filter).await {
            Ok(summary) => summary,
            Err(err) => {
                error!(error = %err, "system summary aggregation failed");
                SystemSummary::empty(time_filter)
            }
        }
    }

    async fn compute_summary(&self, time_filter: TimeFilter) -> Result<SystemSummary, StoreError> {
        let total_farmers = self.identity.count_all().await?;
        let active_farmers = self.identity.count_active().await?;
        let regional_distribution = self.identity.region_distribution().await?;

        let now = Utc::now();
        let mut farmers_needing_attention: u64 = 0;
        let mut total_revenue = 0.0;
        let mut total_expenses = 0.0;
        let mut total_profit = 0.0;

        let mut logins: i64 = 0;
        let mut expense_entries: i64 = 0;
        let mut predictions: i64 = 0;
        let mut health_assessments: i64 = 0;
        let mut recommendations: i64 = 0;

        let mut offset = 0;
        loop {
            let ids: Vec<Uuid> = self
                .identity
                .list_ids(PageRequest::new(SUMMARY_BATCH_SIZE, offset))
                .await?;
            if ids.is_empty() {
                break;
            }

            let batch = self.orchestrator.collect_batch(&ids, time_filter).await;
            for id in &ids {
                let Some(metrics) = batch.get(id) else {
                    continue;
                };

                total_revenue += metrics.expenses.total_revenue;
                total_expenses += metrics.expenses.total_expenses;
                total_profit += metrics.expenses.total_profit;

                logins += metrics.auth.total_logins;
                expense_entries += metrics.expenses.expense_count;
                predictions += metrics.forecasting.total_predictions;
                health_assessments += metrics.health.total_assessments;
                recommendations += metrics.recommendations.loan_advice_count
                    + metrics.recommendations.cost_cutting_count;

                let score = engagement_score(metrics);
                let risk = assess_risk(metrics);
                if needs_attention(metrics, score, risk, now) {
                    farmers_needing_attention += 1;
                }
            }

            if ids.len() < SUMMARY_BATCH_SIZE {
                break;
            }
            offset += SUMMARY_BATCH_SIZE;
        }

        Ok(SystemSummary {
            total_farmers,
            active_farmers,
            inactive_farmers: total_farmers.saturating_sub(active_farmers),
            farmers_needing_attention,
            auth_usage: ServiceUsage::new(logins, total_farmers),
            expense_tracking_usage: ServiceUsage::new(expense_entries, total_farmers),
            forecasting_usage: ServiceUsage::new(predictions, total_farmers),
            health_assessment_usage: ServiceUsage::new(health_assessments, total_farmers),
            recommendation_usage: ServiceUsage::new(recommendations, total_farmers),
            total_system_revenue: total_revenue,
            total_system_expenses: total_expenses,
            total_system_profit: total_profit,
            regional_distribution,
            time_filter,
            generated_at: Utc::now(),
        })
    }
}
