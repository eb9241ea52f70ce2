use crate::analytics::{StatsAggregator, StatsGateway};
use crate::cache::CacheStore;
use crate::db::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<dyn CacheStore>,
    pub stats: StatsGateway,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<dyn CacheStore>, batch_limit: usize) -> Self {
        let aggregator = StatsAggregator::new(store.clone(), batch_limit);
        Self {
            stats: StatsGateway::new(aggregator, cache.clone()),
            store,
            cache,
        }
    }
}

pub type SharedState = Arc<AppState>;
