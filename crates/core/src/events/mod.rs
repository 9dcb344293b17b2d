//! Market events module.
//!
//! Provides the event type emitted after the local reference dataset changes
//! and the sink trait used to deliver it. Runtime adapters implement the sink
//! to translate events into platform-specific actions (UI refresh, cache
//! invalidation).

mod market_event;
mod sink;

pub use market_event::*;
pub use sink::*;
