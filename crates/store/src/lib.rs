//! Row-store client — everything that talks to the shared store.
//!
//! This crate is the single owner of the store wire contract: auth, row
//! reads, upserts, deletes, the import batch route, and the admin surface.
//! The write scheduler and the lifecycle commands live here too so
//! coalescing and rollback stay beside the client they guard.
//!
//! No derived views. No file access. The engine and recon crates never
//! import this.

mod admin;
mod auth;
mod client;
mod ops;
mod scheduler;

pub use admin::{AdminClient, AdminError, AdminUser};
pub use auth::{auth_file_path, delete_auth, load_auth, save_auth, AuthCredentials};
pub use client::{StoreClient, StoreError};
pub use ops::{purge_entry, restore_entry, trash_entry, CommandError, EntryStore};
pub use scheduler::{WriteScheduler, DEFAULT_QUIET_WINDOW};
