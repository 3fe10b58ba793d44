//! 基础设施层

pub mod cache;
pub mod capability;
pub mod directory;
pub mod observability;
pub mod settings;

pub use cache::{
    CacheBulkInvalidator, DecisionCache, DecisionCacheConfig, DecisionWarmer, LayeredCacheStore,
    MemoryCacheStore, WarmingReport,
};
pub use capability::ProfileCapabilityChecker;
pub use directory::StaticGroupDirectory;
pub use observability::TracingEventSink;
pub use settings::build_cache_store;
