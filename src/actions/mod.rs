//! Actions applied to confirmed duplicate groups.
//!
//! Currently one action: purging, which deletes every copy except a
//! policy-selected keeper per group.

pub mod purge;

pub use purge::{purge, KeeperPolicy, PurgeOutcome, PurgeRecord, PurgeReport};
