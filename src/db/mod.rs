pub mod market_stats;
pub mod models;

pub use market_stats::MarketStatsDao;
