//! Signal & levels computation.

pub mod cache;
pub mod engine;

pub use cache::{CacheKey, SignalCache, SignalSnapshot};
pub use engine::{compute, LevelParams};
