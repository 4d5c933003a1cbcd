//! `roilens-core` — Shared domain types.
//!
//! Channels, weekly entries, CRM movements, filters and the dataset
//! container. No computation lives here; the engine and recon crates consume
//! these types.

pub mod channel;
pub mod dataset;
pub mod entry;
pub mod filter;
pub mod lifecycle;
pub mod movement;

pub use channel::{Channel, ChannelTag, ProfitabilityBasis};
pub use dataset::Dataset;
pub use entry::{sort_entries, EntryId, EntryPatch, NaturalKey, WeeklyEntry};
pub use filter::{ChannelFilter, Filter, MonthFilter};
pub use lifecycle::Lifecycle;
pub use movement::{CrmMovement, CustomerId, MovementId, MovementKind, MovementStatus};
