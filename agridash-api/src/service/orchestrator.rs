//! Bulk metrics orchestration.
//!
//! Fans the five collector categories out concurrently over a whole user
//! batch, merges the partial maps per user and memoizes the result in a
//! small bounded cache. Single-user lookups go through the same batch path
//! so both always agree.

use std::collections::HashMap;
use std::sync::Arc;

use moka::future::Cache;
use tracing::{error, warn};
use uuid::Uuid;

use agridash_db::repository::activity_log_store::ActivityLogStore;
use agridash_db::repository::assessment_store::AssessmentStore;
use agridash_db::repository::expense_store::ExpenseStore;
use agridash_db::repository::health_store::HealthAssessmentStore;
use agridash_db::repository::prediction_store::PredictionStore;
use agridash_db::repository::recommendation_store::RecommendationStore;
use agridash_db::repository::time_window::TimeFilter;
use agridash_db::repository::StoreError;

use crate::domain::metrics::CompositeMetrics;
use crate::service::collectors::{
    collect_auth_metrics, collect_expense_metrics, collect_forecasting_metrics,
    collect_health_metrics, collect_recommendation_metrics,
};

/// Bounded number of memoized batch results.
pub const DEFAULT_CACHE_CAPACITY: u64 = 128;

/// The injected read-side stores the orchestrator fans out over.
#[derive(Clone)]
pub struct MetricsStores {
    pub activity: Arc<dyn ActivityLogStore>,
    pub expenses: Arc<dyn ExpenseStore>,
    pub assessments: Arc<dyn AssessmentStore>,
    pub predictions: Arc<dyn PredictionStore>,
    pub health: Arc<dyn HealthAssessmentStore>,
    pub recommendations: Arc<dyn RecommendationStore>,
}

/// Cache key: the sorted, deduplicated user set plus the time filter, so
/// batch order can never affect what is served.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    users: Vec<Uuid>,
    filter: TimeFilter,
}

#[derive(Clone)]
pub struct MetricsOrchestrator {
    stores: MetricsStores,
    cache: Cache<CacheKey, Arc<HashMap<Uuid, CompositeMetrics>>>,
}

impl MetricsOrchestrator {
    pub fn new(stores: MetricsStores) -> Self {
        Self::with_cache_capacity(stores, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(stores: MetricsStores, capacity: u64) -> Self {
        Self {
            stores,
            cache: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Composite metrics for a batch of users under one time filter.
    ///
    /// The returned map has an entry per requested user unless metrics are
    /// wholly unavailable, in which case it is empty. Callers must read an
    /// empty or partial map as "unavailable", not as zero activity.
    ///
    /// The cache is a latency optimization only; entries are whatever was
    /// computed at call time for that key and carry no freshness promise.
    pub async fn collect_batch(
        &self,
        users: &[Uuid],
        filter: TimeFilter,
    ) -> Arc<HashMap<Uuid, CompositeMetrics>> {
        let mut ids = users.to_vec();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Arc::new(HashMap::new());
        }

        let key = CacheKey {
            users: ids.clone(),
            filter,
        };
        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        let computed = Arc::new(self.collect_uncached(&ids, filter).await);
        self.cache.insert(key, Arc::clone(&computed)).await;
        computed
    }

    /// Single-user metrics through the batch path. `None` when metrics are
    /// unavailable.
    pub async fn collect_one(&self, user: Uuid, filter: TimeFilter) -> Option<CompositeMetrics> {
        self.collect_batch(&[user], filter).await.get(&user).cloned()
    }

    async fn collect_uncached(
        &self,
        users: &[Uuid],
        filter: TimeFilter,
    ) -> HashMap<Uuid, CompositeMetrics> {
        let window = filter.window();

        // The five categories are read-only and independent; run them
        // concurrently over the whole batch and join.
        let (auth, expenses, forecasting, health, recommendations) = tokio::join!(
            collect_auth_metrics(self.stores.activity.as_ref(), users, &window),
            collect_expense_metrics(
                self.stores.expenses.as_ref(),
                self.stores.assessments.as_ref(),
                users,
                &window,
            ),
            collect_forecasting_metrics(self.stores.predictions.as_ref(), users, &window),
            collect_health_metrics(self.stores.health.as_ref(), users, &window),
            collect_recommendation_metrics(self.stores.recommendations.as_ref(), users, &window),
        );

        let failed = [
            auth.is_err(),
            expenses.is_err(),
            forecasting.is_err(),
            health.is_err(),
            recommendations.is_err(),
        ]
        .into_iter()
        .filter(|failed| *failed)
        .count();
        if failed == 5 {
            error!(
                batch_size = users.len(),
                "every metric category failed; returning no metrics"
            );
            return HashMap::new();
        }

        let mut auth = recover("auth", auth, users);
        let mut expenses = recover("expenses", expenses, users);
        let mut forecasting = recover("forecasting", forecasting, users);
        let mut health = recover("health", health, users);
        let mut recommendations = recover("recommendations", recommendations, users);

        users
            .iter()
            .map(|id| {
                (
                    *id,
                    CompositeMetrics {
                        auth: auth.remove(id).unwrap_or_default(),
                        expenses: expenses.remove(id).unwrap_or_default(),
                        forecasting: forecasting.remove(id).unwrap_or_default(),
                        health: health.remove(id).unwrap_or_default(),
                        recommendations: recommendations.remove(id).unwrap_or_default(),
                    },
                )
            })
            .collect()
    }
}

/// A failed category degrades to defaults for the whole batch instead of
/// failing the orchestration.
fn recover<T: Default>(
    category: &'static str,
    result: Result<HashMap<Uuid, T>, StoreError>,
    users: &[Uuid],
) -> HashMap<Uuid, T> {
    match result {
        Ok(map) => map,
        Err(err) => {
            warn!(category, error = %err, "metric collection failed; substituting defaults");
            users.iter().map(|id| (*id, T::default())).collect()
        }
    }
}
