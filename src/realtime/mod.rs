//! Realtime change feed for a project's tasks.

mod channel;
mod protocol;

pub use channel::{FeedHealth, RealtimeEvent, RealtimeSubscription};
pub use protocol::{decode, topic_for, Inbound, PhoenixMessage};
