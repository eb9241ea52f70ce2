pub mod gateway;
pub mod performance;

pub use gateway::StatsGateway;
pub use performance::StatsAggregator;
