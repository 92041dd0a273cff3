//! Per-service metrics collectors.
//!
//! One collector per service category. Each takes the store(s) it reads, the
//! deduplicated user batch and the resolved time window, and returns a map
//! with an entry for every requested user. Users without matching records
//! get the documented zero shape; a collector never omits a user and never
//! raises for missing data.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use uuid::Uuid;

use agridash_db::repository::activity_log_store::ActivityLogStore;
use agridash_db::repository::assessment_store::AssessmentStore;
use agridash_db::repository::expense_store::ExpenseStore;
use agridash_db::repository::health_store::HealthAssessmentStore;
use agridash_db::repository::prediction_store::PredictionStore;
use agridash_db::repository::recommendation_store::RecommendationStore;
use agridash_db::repository::time_window::TimeWindow;
use agridash_db::repository::StoreError;

use crate::domain::metrics::{
    AuthMetrics, ExpenseMetrics, ForecastingMetrics, GoodsFrequency, HealthMetrics,
    QueryFrequency, RecommendationMetrics, TOPIC_COST_CUTTING, TOPIC_LOAN_ADVICE,
};

/// Frequency tables are truncated to this many entries.
const TOP_FREQUENCY_LIMIT: usize = 5;

fn default_map<T: Default>(users: &[Uuid]) -> HashMap<Uuid, T> {
    users.iter().map(|id| (*id, T::default())).collect()
}

/// Count occurrences and rank count-descending. The sort is stable, so ties
/// keep first-encountered order. Truncated to [`TOP_FREQUENCY_LIMIT`].
fn ranked_frequencies(values: impl IntoIterator<Item = String>) -> Vec<(String, i64)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, i64> = HashMap::new();
    for value in values {
        match counts.entry(value) {
            Entry::Occupied(mut occupied) => *occupied.get_mut() += 1,
            Entry::Vacant(vacant) => {
                order.push(vacant.key().clone());
                vacant.insert(1);
            }
        }
    }

    let mut ranked: Vec<(String, i64)> = order
        .into_iter()
        .map(|name| {
            let count = counts[&name];
            (name, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(TOP_FREQUENCY_LIMIT);
    ranked
}

/// Login counts within the window plus the unbounded last-login timestamp.
pub async fn collect_auth_metrics(
    store: &dyn ActivityLogStore,
    users: &[Uuid],
    window: &TimeWindow,
) -> Result<HashMap<Uuid, AuthMetrics>, StoreError> {
    let counts = store.login_counts(users, window).await?;
    let last_logins = store.last_logins(users).await?;

    let mut out: HashMap<Uuid, AuthMetrics> = default_map(users);
    for (user_id, count) in counts {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.total_logins = count;
        }
    }
    for (user_id, last_login) in last_logins {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.last_login = Some(last_login);
        }
    }
    Ok(out)
}

/// Combined expense + financial-assessment metrics.
///
/// Revenue is defined as summed expense amounts plus summed assessment
/// profit; the platform tracks no separate revenue figure.
pub async fn collect_expense_metrics(
    expenses: &dyn ExpenseStore,
    assessments: &dyn AssessmentStore,
    users: &[Uuid],
    window: &TimeWindow,
) -> Result<HashMap<Uuid, ExpenseMetrics>, StoreError> {
    let expense_rollups = expenses.rollup_by_user(users, window).await?;
    let assessment_rollups = assessments.rollup_by_user(users, window).await?;

    let mut out: HashMap<Uuid, ExpenseMetrics> = default_map(users);
    for rollup in expense_rollups {
        if let Some(metrics) = out.get_mut(&rollup.user_id) {
            metrics.total_expenses = rollup.total_expenses;
            metrics.expense_count = rollup.expense_count;
            metrics.last_activity = rollup.last_activity;
            metrics.most_traded_goods = ranked_frequencies(rollup.goods)
                .into_iter()
                .map(|(name, count)| GoodsFrequency { name, count })
                .collect();
        }
    }
    for rollup in assessment_rollups {
        if let Some(metrics) = out.get_mut(&rollup.user_id) {
            metrics.total_profit = rollup.total_profit;
            metrics.assessment_count = rollup.assessment_count;
            metrics.financial_stability_avg = rollup.financial_stability_avg;
            metrics.cash_flow_avg = rollup.cash_flow_avg;
        }
    }
    for metrics in out.values_mut() {
        metrics.total_revenue = metrics.total_expenses + metrics.total_profit;
    }
    Ok(out)
}

/// Forecasting metrics from the raw prediction records.
///
/// Region/crop lists are flattened before deduplication; the frequency
/// table is keyed by the first region and first crop of each record, with
/// `Unknown` standing in for an empty list.
pub async fn collect_forecasting_metrics(
    store: &dyn PredictionStore,
    users: &[Uuid],
    window: &TimeWindow,
) -> Result<HashMap<Uuid, ForecastingMetrics>, StoreError> {
    let records = store.find_by_users(users, window).await?;

    let mut out: HashMap<Uuid, ForecastingMetrics> = default_map(users);
    let mut regions: HashMap<Uuid, BTreeSet<String>> = HashMap::new();
    let mut crops: HashMap<Uuid, BTreeSet<String>> = HashMap::new();
    let mut query_keys: HashMap<Uuid, Vec<String>> = HashMap::new();

    for record in records {
        let Some(metrics) = out.get_mut(&record.user_id) else {
            continue;
        };
        metrics.total_predictions += 1;
        if metrics
            .last_prediction
            .map_or(true, |last| record.recorded_at > last)
        {
            metrics.last_prediction = Some(record.recorded_at);
        }

        regions
            .entry(record.user_id)
            .or_default()
            .extend(record.regions.iter().cloned());
        crops
            .entry(record.user_id)
            .or_default()
            .extend(record.crop_names.iter().cloned());

        let first_region = record.regions.first().map_or("Unknown", |r| r.as_str());
        let first_crop = record.crop_names.first().map_or("Unknown", |c| c.as_str());
        query_keys
            .entry(record.user_id)
            .or_default()
            .push(format!("{first_region}_{first_crop}"));
    }

    for (user_id, set) in regions {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.regions_queried = set.into_iter().collect();
        }
    }
    for (user_id, set) in crops {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.crops_queried = set.into_iter().collect();
        }
    }
    for (user_id, keys) in query_keys {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.most_frequent_queries = ranked_frequencies(keys)
                .into_iter()
                .map(|(query, count)| QueryFrequency { query, count })
                .collect();
        }
    }
    Ok(out)
}

/// Health-assessment metrics from the per-user rollups.
pub async fn collect_health_metrics(
    store: &dyn HealthAssessmentStore,
    users: &[Uuid],
    window: &TimeWindow,
) -> Result<HashMap<Uuid, HealthMetrics>, StoreError> {
    let rollups = store.rollup_by_user(users, window).await?;

    let mut out: HashMap<Uuid, HealthMetrics> = default_map(users);
    for rollup in rollups {
        if let Some(metrics) = out.get_mut(&rollup.user_id) {
            metrics.total_assessments = rollup.total_assessments;
            metrics.total_subsidies = rollup.total_subsidies;
            metrics.last_assessment = rollup.last_assessment;
            metrics.average_profit_margin = if rollup.total_revenue > 0.0 {
                Some(rollup.total_profit / rollup.total_revenue * 100.0)
            } else {
                None
            };
            let mut crop_types = rollup.crop_types;
            crop_types.sort();
            crop_types.dedup();
            metrics.crop_types_assessed = crop_types;
        }
    }
    Ok(out)
}

/// Recommendation metrics: windowed counts, unbounded latest timestamps.
pub async fn collect_recommendation_metrics(
    store: &dyn RecommendationStore,
    users: &[Uuid],
    window: &TimeWindow,
) -> Result<HashMap<Uuid, RecommendationMetrics>, StoreError> {
    let loan_counts = store.loan_advice_counts(users, window).await?;
    let cost_counts = store.cost_cutting_counts(users, window).await?;
    let latest_loans = store.latest_loan_advice(users).await?;
    let latest_costs = store.latest_cost_cutting(users).await?;

    let mut out: HashMap<Uuid, RecommendationMetrics> = default_map(users);
    for (user_id, count) in loan_counts {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.loan_advice_count = count;
        }
    }
    for (user_id, count) in cost_counts {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.cost_cutting_count = count;
        }
    }
    for (user_id, at) in latest_loans {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.last_recommendation = Some(at);
        }
    }
    for (user_id, at) in latest_costs {
        if let Some(metrics) = out.get_mut(&user_id) {
            metrics.last_recommendation = Some(match metrics.last_recommendation {
                Some(existing) if existing > at => existing,
                _ => at,
            });
        }
    }
    for metrics in out.values_mut() {
        if metrics.loan_advice_count > 0 {
            metrics.recommendation_topics.push(TOPIC_LOAN_ADVICE.to_string());
        }
        if metrics.cost_cutting_count > 0 {
            metrics
                .recommendation_topics
                .push(TOPIC_COST_CUTTING.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::test_fixtures::*;
    use agridash_db::repository::time_window::TimeFilter;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_ranked_frequencies_orders_and_truncates() {
        let values = ["maize", "teff", "teff", "wheat", "maize", "teff"]
            .into_iter()
            .map(str::to_string);
        let ranked = ranked_frequencies(values);
        assert_eq!(
            ranked,
            vec![
                ("teff".to_string(), 3),
                ("maize".to_string(), 2),
                ("wheat".to_string(), 1)
            ]
        );

        // ties keep first-encountered order
        let values = ["b", "a", "c"].into_iter().map(str::to_string);
        let ranked = ranked_frequencies(values);
        assert_eq!(ranked[0].0, "b");
        assert_eq!(ranked[1].0, "a");

        let values = (0..20).map(|i| format!("goods-{i}"));
        assert_eq!(ranked_frequencies(values).len(), 5);
    }

    #[tokio::test]
    async fn test_auth_collector_windows_counts_but_not_last_login() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        // three logins five days ago
        for _ in 0..3 {
            data.logs.push(create_test_login(user, now() - Duration::days(5)));
        }
        let store = FakeStore::new(data);

        // weekly window sees all three
        let weekly = TimeFilter::Weekly.window_from(now());
        let metrics = collect_auth_metrics(&store, &[user], &weekly).await.unwrap();
        assert_eq!(metrics[&user].total_logins, 3);
        assert_eq!(metrics[&user].last_login, Some(now() - Duration::days(5)));

        // daily window excludes them, but last_login survives
        let daily = TimeFilter::Daily.window_from(now());
        let metrics = collect_auth_metrics(&store, &[user], &daily).await.unwrap();
        assert_eq!(metrics[&user].total_logins, 0);
        assert_eq!(metrics[&user].last_login, Some(now() - Duration::days(5)));
    }

    #[tokio::test]
    async fn test_collectors_return_zero_shapes_for_unknown_users() {
        let user = uuid::Uuid::new_v4();
        let store = FakeStore::new(FakeData::default());
        let window = TimeWindow::UNBOUNDED;

        let auth = collect_auth_metrics(&store, &[user], &window).await.unwrap();
        assert_eq!(auth[&user], AuthMetrics::default());

        let expenses = collect_expense_metrics(&store, &store, &[user], &window)
            .await
            .unwrap();
        assert_eq!(expenses[&user], ExpenseMetrics::default());

        let forecasting = collect_forecasting_metrics(&store, &[user], &window)
            .await
            .unwrap();
        assert_eq!(forecasting[&user], ForecastingMetrics::default());

        let health = collect_health_metrics(&store, &[user], &window).await.unwrap();
        assert_eq!(health[&user], HealthMetrics::default());

        let recommendations = collect_recommendation_metrics(&store, &[user], &window)
            .await
            .unwrap();
        assert_eq!(recommendations[&user], RecommendationMetrics::default());
    }

    #[tokio::test]
    async fn test_expense_collector_combines_both_sources() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        data.expenses.push(create_test_expense(user, now(), "Teff", 150.0));
        data.expenses.push(create_test_expense(user, now(), "Teff", 50.0));
        data.expenses
            .push(create_test_expense(user, now() - Duration::days(1), "Maize", 100.0));
        data.assessments
            .push(create_test_assessment(user, now(), 40.0, 70.0, 50.0));
        data.assessments
            .push(create_test_assessment(user, now(), 60.0, 30.0, 70.0));
        let store = FakeStore::new(data);

        let metrics = collect_expense_metrics(&store, &store, &[user], &TimeWindow::UNBOUNDED)
            .await
            .unwrap();
        let m = &metrics[&user];
        assert_eq!(m.total_expenses, 300.0);
        assert_eq!(m.expense_count, 3);
        assert_eq!(m.assessment_count, 2);
        assert_eq!(m.total_profit, 100.0);
        // revenue = expenses + assessment profit
        assert_eq!(m.total_revenue, 400.0);
        assert_eq!(m.financial_stability_avg, Some(50.0));
        assert_eq!(m.cash_flow_avg, Some(60.0));
        assert_eq!(m.last_activity, Some(now()));
        assert_eq!(m.most_traded_goods[0].name, "Teff");
        assert_eq!(m.most_traded_goods[0].count, 2);
        assert_eq!(m.most_traded_goods[1].name, "Maize");
    }

    #[tokio::test]
    async fn test_forecasting_collector_flattens_and_keys_queries() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        data.predictions.push(create_test_prediction(
            user,
            now() - Duration::days(2),
            &["Oromia", "Amhara"],
            &["Teff"],
        ));
        data.predictions.push(create_test_prediction(
            user,
            now() - Duration::days(1),
            &["Oromia"],
            &["Teff", "Maize"],
        ));
        data.predictions
            .push(create_test_prediction(user, now(), &[], &[]));
        let store = FakeStore::new(data);

        let metrics = collect_forecasting_metrics(&store, &[user], &TimeWindow::UNBOUNDED)
            .await
            .unwrap();
        let m = &metrics[&user];
        assert_eq!(m.total_predictions, 3);
        assert_eq!(m.regions_queried, vec!["Amhara", "Oromia"]);
        assert_eq!(m.crops_queried, vec!["Maize", "Teff"]);
        assert_eq!(m.last_prediction, Some(now()));
        assert_eq!(m.most_frequent_queries[0].query, "Oromia_Teff");
        assert_eq!(m.most_frequent_queries[0].count, 2);
        assert_eq!(m.most_frequent_queries[1].query, "Unknown_Unknown");
        assert_eq!(m.most_frequent_queries[1].count, 1);
    }

    #[tokio::test]
    async fn test_health_collector_margin_scenario() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        // revenue = 100 * 10 = 1000, profit = 1000 - 800 = 200, margin 20%
        data.health
            .push(create_test_health(user, now(), "Teff", 100.0, 10.0, 800.0, 0.0));
        let store = FakeStore::new(data);

        let metrics = collect_health_metrics(&store, &[user], &TimeWindow::UNBOUNDED)
            .await
            .unwrap();
        let m = &metrics[&user];
        assert_eq!(m.total_assessments, 1);
        assert_eq!(m.average_profit_margin, Some(20.0));
        assert_eq!(m.total_subsidies, 0.0);
        assert_eq!(m.crop_types_assessed, vec!["Teff"]);
    }

    #[tokio::test]
    async fn test_health_collector_zero_revenue_has_null_margin() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        data.health
            .push(create_test_health(user, now(), "Teff", 0.0, 0.0, 500.0, 100.0));
        let store = FakeStore::new(data);

        let metrics = collect_health_metrics(&store, &[user], &TimeWindow::UNBOUNDED)
            .await
            .unwrap();
        assert_eq!(metrics[&user].average_profit_margin, None);
        assert_eq!(metrics[&user].total_subsidies, 100.0);
    }

    #[tokio::test]
    async fn test_recommendation_collector_topics_and_latest() {
        let user = uuid::Uuid::new_v4();
        let mut data = FakeData::default();
        data.loan_advice
            .push(create_test_loan_advice(user, now() - Duration::days(40)));
        data.cost_cutting
            .push(create_test_cost_cutting(user, now() - Duration::days(35)));
        let store = FakeStore::new(data);

        // weekly window excludes both counts; latest survives unbounded
        let weekly = TimeFilter::Weekly.window_from(now());
        let metrics = collect_recommendation_metrics(&store, &[user], &weekly)
            .await
            .unwrap();
        let m = &metrics[&user];
        assert_eq!(m.loan_advice_count, 0);
        assert_eq!(m.cost_cutting_count, 0);
        assert!(m.recommendation_topics.is_empty());
        assert_eq!(m.last_recommendation, Some(now() - Duration::days(35)));

        let metrics = collect_recommendation_metrics(&store, &[user], &TimeWindow::UNBOUNDED)
            .await
            .unwrap();
        let m = &metrics[&user];
        assert_eq!(m.loan_advice_count, 1);
        assert_eq!(m.cost_cutting_count, 1);
        assert_eq!(
            m.recommendation_topics,
            vec![TOPIC_LOAN_ADVICE.to_string(), TOPIC_COST_CUTTING.to_string()]
        );
    }
}
