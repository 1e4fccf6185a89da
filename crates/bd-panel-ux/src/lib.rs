//! UX composition layer.
//!
//! This crate defines the panel query contract over snapshot backends. The
//! core resolver stays pure; this crate supplies the rendering collaborator
//! it runs against and owns the view shapes frontends consume.

pub mod table;

use bd_panel_core::{
    DisplayState, PanelConfig, PanelView, ResponseRecord, ResponseStateResolver,
    RunningServiceTypes, SectionRenderer, SnapshotError, SnapshotIndex, SpinnerConfiguration,
    SpinnerLocals,
};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

pub const SPINNER_PARTIAL: &str = "background_progress";
pub const SECTION_ID: &str = "borrow_direct";

/// A renderer that can also identify the request it renders.
pub trait PanelBackend: SectionRenderer {
    fn request_id(&self) -> Option<&str>;
}

#[derive(Debug, Clone)]
pub struct SnapshotBackend {
    index: SnapshotIndex,
    service_types: BTreeSet<String>,
}

impl SnapshotBackend {
    pub fn from_index(index: SnapshotIndex, service_types: BTreeSet<String>) -> Self {
        Self {
            index,
            service_types,
        }
    }

    pub fn load_json(
        path: impl AsRef<Path>,
        service_types: BTreeSet<String>,
    ) -> Result<Self, SnapshotError> {
        SnapshotIndex::load_json(path).map(|index| Self::from_index(index, service_types))
    }
}

impl SectionRenderer for SnapshotBackend {
    type Request = RunningServiceTypes;

    fn request(&self) -> &RunningServiceTypes {
        self.index.request()
    }

    fn responses(&self) -> &[ResponseRecord] {
        self.index.records()
    }

    fn service_type_values(&self) -> &BTreeSet<String> {
        &self.service_types
    }

    fn spinner_configuration(&self) -> SpinnerConfiguration {
        let mut extra = BTreeMap::new();
        extra.insert("sectionId".to_string(), json!(SECTION_ID));
        extra.insert("serviceTypes".to_string(), json!(self.service_types));
        SpinnerConfiguration {
            partial: SPINNER_PARTIAL.to_string(),
            locals: SpinnerLocals {
                progress_message: None,
                extra,
            },
        }
    }
}

impl PanelBackend for SnapshotBackend {
    fn request_id(&self) -> Option<&str> {
        self.index.request_id()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelReport {
    pub request_id: Option<String>,
    pub view: PanelView,
    pub records: Vec<ResponseRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelQuery {
    View,
    Records,
    DisplayState,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PanelQueryError {
    #[error("serialization error: {0}")]
    Serialization(String),
}

#[derive(Debug, Clone)]
pub struct PanelService<B: PanelBackend> {
    backend: B,
    config: PanelConfig,
}

impl<B: PanelBackend> PanelService<B> {
    pub fn new(backend: B, config: PanelConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// A fresh resolver for one render pass.
    pub fn resolver(&self) -> ResponseStateResolver<'_, B> {
        ResponseStateResolver::new(&self.backend, &self.config)
    }

    pub fn records(&self) -> &[ResponseRecord] {
        self.backend.responses()
    }

    pub fn view(&self) -> PanelView {
        self.resolver().view().clone()
    }

    pub fn report(&self) -> PanelReport {
        PanelReport {
            request_id: self.backend.request_id().map(str::to_string),
            view: self.view(),
            records: self.records().to_vec(),
        }
    }

    pub fn query_json(&self, query: PanelQuery) -> Result<Value, PanelQueryError> {
        match query {
            PanelQuery::View => serde_json::to_value(self.view())
                .map_err(|e| PanelQueryError::Serialization(e.to_string())),
            PanelQuery::Records => serde_json::to_value(self.records())
                .map_err(|e| PanelQueryError::Serialization(e.to_string())),
            PanelQuery::DisplayState => {
                let resolver = self.resolver();
                let active: Vec<DisplayState> = resolver.active_states();
                Ok(json!({
                    "displayState": resolver.display_state(),
                    "activeStates": active,
                }))
            }
        }
    }
}
