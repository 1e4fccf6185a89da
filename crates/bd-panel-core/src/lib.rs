//! # Borrow Direct panel core
//!
//! Decides which single display state a holdings panel presents for one
//! request, given the upstream service responses collected so far.
//!
//! ## Architecture
//!
//! ```text
//! RawResponse            ← upstream tag + loose view data
//!     │  ingest
//! ResponseRecord         ← closed record per recognized tag
//!     │
//! SectionRenderer        ← responses + request handle + base spinner
//!     │
//! ResponseStateResolver  ← memoized lookups, predicates, display state
//!     │
//! PanelView              ← one serializable selection per render
//! ```
//!
//! The resolver is confined to one render pass on one thread: its caches are
//! `OnceCell`s, so it is deliberately `!Sync`.

pub mod config;
pub mod error;
pub mod record;
pub mod resolver;
pub mod snapshot;

pub use config::{ErrorClasses, MessageKeys, PanelConfig};
pub use error::{ConfigError, SnapshotError};
pub use record::{
    LINK_TO_SEARCH_TAG, NOT_AVAILABLE_TAG, RECOGNIZED_TAGS, REQUEST_PROMPT_TAG,
    REQUEST_STATUS_TAG, RawResponse, ResponseRecord, Status, StatusView, ingest_all,
};
pub use resolver::{
    DisplayState, ErrorView, PanelView, RequestHandle, ResponseStateResolver, SectionRenderer,
    SpinnerConfiguration, SpinnerLocals,
};
pub use snapshot::{
    RunningServiceTypes, SNAPSHOT_KIND, SNAPSHOT_SCHEMA, ResponseSnapshot, SnapshotIndex,
};
