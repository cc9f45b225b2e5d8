pub mod policy;
pub mod registry;

pub use policy::{Policy, PolicyContext};
pub use registry::{FALLBACK_STRATEGY, StrategyFactory, by_id, make_policy, registered_strategies};
