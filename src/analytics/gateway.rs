use crate::analytics::performance::StatsAggregator;
use crate::cache::{self, CacheStore, CacheTtl};
use crate::db::StoreError;
use crate::domain::models::PerformanceSnapshot;
use std::sync::Arc;

const USER_STATS_PREFIX: &str = "user-stats";

/// Read-through cache in front of [`StatsAggregator`].
///
/// Entries live for [`CacheTtl::USER_STATS`] seconds and are never invalidated
/// by record writes; `force_refresh` is the only way to bypass a live entry.
#[derive(Clone)]
pub struct StatsGateway {
    aggregator: StatsAggregator,
    cache: Arc<dyn CacheStore>,
}

impl StatsGateway {
    pub fn new(aggregator: StatsAggregator, cache: Arc<dyn CacheStore>) -> Self {
        Self { aggregator, cache }
    }

    pub async fn get_or_compute(
        &self,
        user_id: &str,
        force_refresh: bool,
    ) -> Result<PerformanceSnapshot, StoreError> {
        let key = cache::cache_key(USER_STATS_PREFIX, &[user_id]);
        cache::read_through(
            self.cache.as_ref(),
            &key,
            CacheTtl::USER_STATS,
            force_refresh,
            || self.aggregator.compute_stats(user_id),
        )
        .await
    }
}
