//! Short-lived caches for derived content

pub mod ttl;

pub use ttl::{TtlCache, DEFAULT_TTL};
