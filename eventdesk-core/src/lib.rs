//! Core types for eventdesk.
//!
//! - `event`: the event record and the form input it is built from
//! - `validation`: pure rules run before any record is stored
//! - `store`: the ordered event list, rewritten to storage after every change
//! - `storage`: pluggable key-value backends (files on disk, or memory)
//! - `desk`: configuration-driven access to the on-disk store

pub mod desk;
pub mod desk_config;
pub mod error;
pub mod event;
pub mod storage;
pub mod store;
pub mod validation;

pub use error::{EventDeskError, EventDeskResult};
pub use event::{Event, EventInput, EventType};
pub use store::{EventStore, LoadStatus};
