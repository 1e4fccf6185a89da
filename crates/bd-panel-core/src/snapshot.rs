//! Response snapshot documents.
//!
//! A snapshot captures everything one render pass sees: the raw upstream
//! responses for a request and which service types it still reports as
//! running. Loading validates the envelope and ingests every response.

use crate::error::SnapshotError;
use crate::record::{RawResponse, ResponseRecord, ingest_all};
use crate::resolver::RequestHandle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

pub const SNAPSHOT_SCHEMA: u64 = 1;
pub const SNAPSHOT_KIND: &str = "bd.panel.snapshot.v0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSnapshot {
    pub schema: u64,
    pub snapshot_kind: String,
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub responses: Vec<RawResponse>,
    #[serde(default)]
    pub running_service_types: BTreeSet<String>,
}

/// A request handle backed by a fixed set of still-running service types.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunningServiceTypes {
    running: BTreeSet<String>,
}

impl RunningServiceTypes {
    pub fn new(running: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            running: running.into_iter().map(Into::into).collect(),
        }
    }

    pub fn running(&self) -> &BTreeSet<String> {
        &self.running
    }
}

impl RequestHandle for RunningServiceTypes {
    fn is_any_service_type_still_running(&self, service_types: &BTreeSet<String>) -> bool {
        service_types.iter().any(|tag| self.running.contains(tag))
    }
}

/// An ingested snapshot, ready to back a renderer.
#[derive(Debug, Clone)]
pub struct SnapshotIndex {
    request_id: Option<String>,
    records: Vec<ResponseRecord>,
    request: RunningServiceTypes,
}

impl SnapshotIndex {
    pub fn from_snapshot(snapshot: ResponseSnapshot) -> Result<Self, SnapshotError> {
        if snapshot.schema != SNAPSHOT_SCHEMA {
            return Err(SnapshotError::Invalid(format!(
                "schema mismatch (expected={SNAPSHOT_SCHEMA}, actual={})",
                snapshot.schema
            )));
        }
        if snapshot.snapshot_kind != SNAPSHOT_KIND {
            return Err(SnapshotError::Invalid(format!(
                "snapshotKind mismatch (expected={SNAPSHOT_KIND}, actual={})",
                snapshot.snapshot_kind
            )));
        }

        let records = ingest_all(&snapshot.responses);
        Ok(Self {
            request_id: snapshot.request_id,
            records,
            request: RunningServiceTypes {
                running: snapshot.running_service_types,
            },
        })
    }

    /// Build directly from already-ingested records.
    pub fn from_records(
        request_id: Option<String>,
        records: Vec<ResponseRecord>,
        request: RunningServiceTypes,
    ) -> Self {
        Self {
            request_id,
            records,
            request,
        }
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let bytes = fs::read(path)?;
        let snapshot = serde_json::from_slice::<ResponseSnapshot>(&bytes)?;
        Self::from_snapshot(snapshot)
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn request(&self) -> &RunningServiceTypes {
        &self.request
    }
}
