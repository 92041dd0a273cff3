//! Dashboard assembly: single-farmer lookup, filtered listing and search.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, warn};
use uuid::Uuid;

use agridash_db::models::farmer::FarmerModel;
use agridash_db::repository::identity_store::{IdentityStore, ListFilter, SortField, SortOrder};
use agridash_db::repository::pagination::PageRequest;
use agridash_db::repository::time_window::TimeFilter;

use crate::domain::dashboard::{
    DashboardFilters, FarmerDashboard, FarmerPage, FarmerSearchHit,
};
use crate::domain::metrics::CompositeMetrics;
use crate::error::{ApiError, ApiResult};
use crate::service::orchestrator::MetricsOrchestrator;
use crate::service::scoring::{assess_risk, engagement_score, needs_attention};

/// Search results are capped at this many hits regardless of the caller.
const SEARCH_LIMIT_MAX: usize = 50;

pub struct DashboardService {
    identity: Arc<dyn IdentityStore>,
    orchestrator: MetricsOrchestrator,
}

impl DashboardService {
    pub fn new(identity: Arc<dyn IdentityStore>, orchestrator: MetricsOrchestrator) -> Self {
        Self {
            identity,
            orchestrator,
        }
    }

    /// Full dashboard record for one farmer.
    ///
    /// Unknown ids surface as [`ApiError::NotFound`] so callers can tell
    /// "no such user" from "user with no activity"; metric failures degrade
    /// to the zero shapes instead of failing the lookup.
    pub async fn farmer_dashboard(
        &self,
        user_id: Uuid,
        time_filter: TimeFilter,
    ) -> ApiResult<FarmerDashboard> {
        let farmer = self
            .identity
            .find_by_id(user_id)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?
            .ok_or_else(|| ApiError::NotFound(format!("farmer {user_id}")))?;

        let metrics = match self.orchestrator.collect_one(user_id, time_filter).await {
            Some(metrics) => metrics,
            None => {
                warn!(%user_id, "metrics unavailable; serving zeroed dashboard");
                CompositeMetrics::default()
            }
        };

        Ok(assemble(farmer, metrics))
    }

    /// Full-history export of one farmer's dashboard record.
    pub async fn export_farmer(&self, user_id: Uuid) -> ApiResult<FarmerDashboard> {
        self.farmer_dashboard(user_id, TimeFilter::All).await
    }

    /// Paginated, filtered, sorted listing.
    ///
    /// Identity-level filters and the sort run inside the farmer query;
    /// metrics are then computed for the fetched page only. The derived
    /// filters (engagement range, needs-attention) apply after computation,
    /// so the returned page can be shorter than `page_size` while
    /// `total_count` still reflects the identity-level population.
    pub async fn list_farmers(&self, filters: &DashboardFilters) -> ApiResult<FarmerPage> {
        let filters = filters.normalized();
        let list_filter = ListFilter {
            is_active: filters.is_active,
            region: filters.region.clone(),
        };

        let total_count = self
            .identity
            .count(&list_filter)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let page_request = PageRequest::for_page(filters.page_size as usize, filters.page as usize);
        let farmers = self
            .identity
            .list_page(&list_filter, filters.sort_by, filters.sort_order, page_request)
            .await
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

        let ids: Vec<Uuid> = farmers.iter().map(|farmer| farmer.id).collect();
        let metrics = self.orchestrator.collect_batch(&ids, filters.time_filter).await;
        if metrics.is_empty() && !ids.is_empty() {
            warn!(
                page = filters.page,
                "metrics unavailable for listing page; returning identity-only total"
            );
        }

        let mut rows: Vec<FarmerDashboard> = farmers
            .into_iter()
            .filter_map(|farmer| {
                // users missing from the map had no computable metrics;
                // skip them rather than presenting them as zero-activity
                let user_metrics = metrics.get(&farmer.id).cloned()?;
                Some(assemble(farmer, user_metrics))
            })
            .collect();

        if filters.sort_by == SortField::EngagementScore {
            rows.sort_by(|a, b| {
                let ordering = a
                    .engagement_score
                    .partial_cmp(&b.engagement_score)
                    .unwrap_or(std::cmp::Ordering::Equal);
                match filters.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }

        rows.retain(|row| {
            if let Some(min) = filters.min_engagement_score {
                if row.engagement_score < min {
                    return false;
                }
            }
            if let Some(max) = filters.max_engagement_score {
                if row.engagement_score > max {
                    return false;
                }
            }
            if let Some(wanted) = filters.needs_attention {
                if row.needs_attention != wanted {
                    return false;
                }
            }
            true
        });

        Ok(FarmerPage {
            farmers: rows,
            total_count,
            page: filters.page,
            page_size: filters.page_size,
        })
    }

    /// Identity-only search by name or phone substring. Degrades to an
    /// empty result on store failure.
    pub async fn search_farmers(&self, query: &str, limit: usize) -> Vec<FarmerSearchHit> {
        let limit = limit.clamp(1, SEARCH_LIMIT_MAX);
        match self.identity.search(query, limit).await {
            Ok(farmers) => farmers.iter().map(FarmerSearchHit::from).collect(),
            Err(err) => {
                error!(error = %err, "farmer search failed");
                Vec::new()
            }
        }
    }
}

/// Combine identity, metrics and scoring into one presentable record.
fn assemble(farmer: FarmerModel, metrics: CompositeMetrics) -> FarmerDashboard {
    let score = engagement_score(&metrics);
    let risk_level = assess_risk(&metrics);
    let needs_attention = needs_attention(&metrics, score, risk_level, Utc::now());

    FarmerDashboard {
        user_id: farmer.id,
        phone_number: farmer.phone_number,
        name: farmer.name,
        location: farmer.location,
        is_active: farmer.is_active,
        created_at: farmer.created_at,
        auth: metrics.auth,
        expenses: metrics.expenses,
        forecasting: metrics.forecasting,
        health: metrics.health,
        recommendations: metrics.recommendations,
        engagement_score: score,
        risk_level,
        needs_attention,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::RiskLevel;
    use crate::service::test_fixtures::*;
    use chrono::Duration;

    fn service_over(data: FakeData) -> (Arc<FakeStore>, DashboardService) {
        let store = Arc::new(FakeStore::new(data));
        let orchestrator = MetricsOrchestrator::new(store.metrics_stores());
        let service = DashboardService::new(store.clone(), orchestrator);
        (store, service)
    }

    #[tokio::test]
    async fn test_unknown_farmer_is_not_found() {
        let (_, service) = service_over(FakeData::default());
        let err = service
            .farmer_dashboard(Uuid::new_v4(), TimeFilter::All)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_zero_activity_farmer_gets_zeroed_dashboard() {
        let mut data = FakeData::default();
        let farmer = create_test_farmer("Abebe", Some("Oromia"), true, Utc::now());
        let id = farmer.id;
        data.farmers.push(farmer);
        let (_, service) = service_over(data);

        let dashboard = service.farmer_dashboard(id, TimeFilter::All).await.unwrap();
        assert_eq!(dashboard.engagement_score, 0.0);
        assert_eq!(dashboard.risk_level, RiskLevel::Unknown);
        assert_eq!(dashboard.auth.total_logins, 0);
        // zero engagement flags the account for follow-up
        assert!(dashboard.needs_attention);
    }

    #[tokio::test]
    async fn test_active_farmer_dashboard_reflects_activity() {
        let mut data = FakeData::default();
        let farmer = create_test_farmer("Abebe", Some("Oromia"), true, Utc::now());
        let id = farmer.id;
        data.farmers.push(farmer);
        for _ in 0..12 {
            data.logs.push(create_test_login(id, Utc::now() - Duration::days(1)));
            data.expenses
                .push(create_test_expense(id, Utc::now(), "Teff", 25.0));
            data.predictions.push(create_test_prediction(
                id,
                Utc::now(),
                &["Oromia"],
                &["Teff"],
            ));
            data.health
                .push(create_test_health(id, Utc::now(), "Teff", 100.0, 10.0, 800.0, 0.0));
        }
        data.assessments
            .push(create_test_assessment(id, Utc::now(), 100.0, 80.0, 90.0));
        let (_, service) = service_over(data);

        let dashboard = service.farmer_dashboard(id, TimeFilter::All).await.unwrap();
        assert_eq!(dashboard.auth.total_logins, 12);
        assert_eq!(dashboard.risk_level, RiskLevel::Low);
        assert!(dashboard.engagement_score > 50.0);
        assert!(!dashboard.needs_attention);
    }

    #[tokio::test]
    async fn test_export_uses_full_history() {
        let mut data = FakeData::default();
        let farmer = create_test_farmer("Abebe", None, true, Utc::now() - Duration::days(400));
        let id = farmer.id;
        data.farmers.push(farmer);
        data.expenses.push(create_test_expense(
            id,
            Utc::now() - Duration::days(370),
            "Teff",
            90.0,
        ));
        let (_, service) = service_over(data);

        let exported = service.export_farmer(id).await.unwrap();
        assert_eq!(exported.expenses.expense_count, 1);
    }

    #[tokio::test]
    async fn test_listing_filters_and_paginates_at_identity_level() {
        let mut data = FakeData::default();
        for i in 0..25 {
            let farmer = create_test_farmer(
                &format!("Farmer {i:02}"),
                Some(if i % 2 == 0 { "Oromia" } else { "Amhara" }),
                true,
                Utc::now() - Duration::days(i),
            );
            data.farmers.push(farmer);
        }
        let (_, service) = service_over(data);

        let filters = DashboardFilters {
            region: Some("oromia".to_string()),
            page: 1,
            page_size: 10,
            ..Default::default()
        };
        let page = service.list_farmers(&filters).await.unwrap();
        assert_eq!(page.total_count, 13);
        assert_eq!(page.farmers.len(), 10);

        let filters = DashboardFilters {
            region: Some("oromia".to_string()),
            page: 2,
            page_size: 10,
            ..Default::default()
        };
        let page = service.list_farmers(&filters).await.unwrap();
        assert_eq!(page.farmers.len(), 3);
    }

    #[tokio::test]
    async fn test_post_computation_filter_shrinks_page_not_total() {
        let mut data = FakeData::default();
        // 30 farmers, half with enough recent activity to avoid attention
        for i in 0..30 {
            let farmer = create_test_farmer(&format!("Farmer {i:02}"), None, true, Utc::now());
            let id = farmer.id;
            data.farmers.push(farmer);
            if i % 2 == 0 {
                for _ in 0..15 {
                    data.logs.push(create_test_login(id, Utc::now() - Duration::days(1)));
                    data.expenses
                        .push(create_test_expense(id, Utc::now(), "Teff", 5.0));
                    data.health.push(create_test_health(
                        id,
                        Utc::now(),
                        "Teff",
                        10.0,
                        5.0,
                        20.0,
                        0.0,
                    ));
                }
            }
        }
        let (_, service) = service_over(data);

        let filters = DashboardFilters {
            needs_attention: Some(true),
            page: 1,
            page_size: 20,
            ..Default::default()
        };
        let page = service.list_farmers(&filters).await.unwrap();
        // total reflects the unfiltered population, the page shrank
        assert_eq!(page.total_count, 30);
        assert!(page.farmers.len() < 20);
        assert!(page.farmers.iter().all(|f| f.needs_attention));
    }

    #[tokio::test]
    async fn test_engagement_sort_is_applied_to_the_page() {
        let mut data = FakeData::default();
        for i in 0..5u32 {
            let farmer = create_test_farmer(&format!("Farmer {i}"), None, true, Utc::now());
            let id = farmer.id;
            data.farmers.push(farmer);
            for _ in 0..i {
                data.logs.push(create_test_login(id, Utc::now()));
            }
        }
        let (_, service) = service_over(data);

        let filters = DashboardFilters {
            sort_by: SortField::EngagementScore,
            sort_order: SortOrder::Desc,
            ..Default::default()
        };
        let page = service.list_farmers(&filters).await.unwrap();
        let scores: Vec<f64> = page.farmers.iter().map(|f| f.engagement_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.partial_cmp(a).unwrap());
        assert_eq!(scores, sorted);
    }

    #[tokio::test]
    async fn test_search_matches_name_and_phone_without_metrics() {
        let mut data = FakeData::default();
        let farmer = create_test_farmer("Abebe Kebede", Some("Oromia"), true, Utc::now());
        data.farmers.push(farmer);
        let other = create_test_farmer("Mulu", None, false, Utc::now());
        data.farmers.push(other);
        let (_, service) = service_over(data);

        let hits = service.search_farmers("abebe", 10).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name.as_deref(), Some("Abebe Kebede"));

        // phone prefix shared by every fixture farmer
        let hits = service.search_farmers("+2519", 10).await;
        assert_eq!(hits.len(), 2);

        let hits = service.search_farmers("nobody", 10).await;
        assert!(hits.is_empty());
    }
}
