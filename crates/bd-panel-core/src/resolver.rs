//! Display-state resolution over one response snapshot.
//!
//! [`ResponseStateResolver`] answers a fixed set of read-only queries that
//! together pick exactly one panel branch. Every query is computed on first
//! access and cached for the life of the resolver; one resolver serves one
//! render pass and is then dropped.
//!
//! Branch precedence, highest first:
//!
//! ```text
//! RequestForm    prompt present, status not Error / InProgress / Successful
//! Confirmation   status Successful
//! NotAvailable   no status response, no form, not-available present
//! LinkToSearch   link present, and none of the above claimed the panel
//! Empty          nothing to show
//! ```

use crate::config::PanelConfig;
use crate::record::{ResponseRecord, Status, StatusView};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::OnceCell;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The originating request, reduced to the one question the panel asks.
pub trait RequestHandle {
    /// True while any of `service_types` is still running for this request.
    fn is_any_service_type_still_running(&self, service_types: &BTreeSet<String>) -> bool;
}

/// The rendering collaborator that owns the response list for one section.
pub trait SectionRenderer {
    type Request: RequestHandle;

    fn request(&self) -> &Self::Request;

    /// Responses for this request, in upstream order.
    fn responses(&self) -> &[ResponseRecord];

    /// Every service-type tag the section cares about, not only the four
    /// the resolver inspects.
    fn service_type_values(&self) -> &BTreeSet<String>;

    /// Base spinner configuration; the resolver overrides the progress message.
    fn spinner_configuration(&self) -> SpinnerConfiguration;
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinnerLocals {
    pub progress_message: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinnerConfiguration {
    pub partial: String,
    pub locals: SpinnerLocals,
}

/// The mutually exclusive primary branch of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    RequestForm,
    Confirmation,
    NotAvailable,
    LinkToSearch,
    Empty,
}

impl DisplayState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RequestForm => "request_form",
            Self::Confirmation => "confirmation",
            Self::NotAvailable => "not_available",
            Self::LinkToSearch => "link_to_search",
            Self::Empty => "empty",
        }
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorView {
    pub classes: Vec<String>,
    pub message_key: String,
    pub user_message: Option<String>,
}

/// Everything the rendering layer needs from one resolver, in one value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    pub display_state: DisplayState,
    pub service_in_progress: bool,
    pub request_submission_in_progress: bool,
    pub spinner: SpinnerConfiguration,
    pub validation_error: Option<String>,
    pub user_reportable_error: Option<String>,
    /// Present when the submission failed or a validation message exists.
    pub error: Option<ErrorView>,
}

#[derive(Default)]
struct Memo<'a> {
    status_response: OnceCell<Option<&'a ResponseRecord>>,
    request_prompt_response: OnceCell<Option<&'a ResponseRecord>>,
    link_response: OnceCell<Option<&'a ResponseRecord>>,
    not_available_response: OnceCell<Option<&'a ResponseRecord>>,
    could_not_place_request: OnceCell<bool>,
    show_confirmation: OnceCell<bool>,
    request_submission_in_progress: OnceCell<bool>,
    validation_error: OnceCell<Option<&'a str>>,
    user_reportable_error: OnceCell<Option<&'a str>>,
    show_request_form: OnceCell<bool>,
    show_not_available: OnceCell<bool>,
    show_link_response: OnceCell<bool>,
    service_in_progress: OnceCell<bool>,
    spinner_configuration: OnceCell<SpinnerConfiguration>,
    error_classification: OnceCell<Vec<String>>,
    error_message_key: OnceCell<&'a str>,
    display_state: OnceCell<DisplayState>,
    view: OnceCell<PanelView>,
}

/// Derives the panel's display state from one immutable response snapshot.
pub struct ResponseStateResolver<'a, R: SectionRenderer> {
    renderer: &'a R,
    config: &'a PanelConfig,
    memo: Memo<'a>,
}

impl<'a, R: SectionRenderer> ResponseStateResolver<'a, R> {
    pub fn new(renderer: &'a R, config: &'a PanelConfig) -> Self {
        Self {
            renderer,
            config,
            memo: Memo::default(),
        }
    }

    fn first(&self, matches: impl Fn(&ResponseRecord) -> bool) -> Option<&'a ResponseRecord> {
        let renderer: &'a R = self.renderer;
        renderer.responses().iter().find(|&record| matches(record))
    }

    /// First `bd_request_status` response, if any.
    pub fn status_response(&self) -> Option<&'a ResponseRecord> {
        *self
            .memo
            .status_response
            .get_or_init(|| self.first(|r| matches!(r, ResponseRecord::RequestStatus(_))))
    }

    /// First `bd_request_prompt` response, if any.
    pub fn request_prompt_response(&self) -> Option<&'a ResponseRecord> {
        *self
            .memo
            .request_prompt_response
            .get_or_init(|| self.first(|r| matches!(r, ResponseRecord::RequestPrompt)))
    }

    /// First `bd_link_to_search` response, if any.
    pub fn link_response(&self) -> Option<&'a ResponseRecord> {
        *self
            .memo
            .link_response
            .get_or_init(|| self.first(|r| matches!(r, ResponseRecord::LinkToSearch)))
    }

    /// First `bd_not_available` response, if any.
    pub fn not_available_response(&self) -> Option<&'a ResponseRecord> {
        *self
            .memo
            .not_available_response
            .get_or_init(|| self.first(|r| matches!(r, ResponseRecord::NotAvailable)))
    }

    pub fn status_view(&self) -> Option<&'a StatusView> {
        self.status_response().and_then(ResponseRecord::status_view)
    }

    fn status(&self) -> Option<Status> {
        self.status_view().and_then(|view| view.status)
    }

    pub fn could_not_place_request(&self) -> bool {
        *self
            .memo
            .could_not_place_request
            .get_or_init(|| self.status() == Some(Status::Error))
    }

    pub fn show_confirmation(&self) -> bool {
        *self
            .memo
            .show_confirmation
            .get_or_init(|| self.status() == Some(Status::Successful))
    }

    pub fn request_submission_in_progress(&self) -> bool {
        *self
            .memo
            .request_submission_in_progress
            .get_or_init(|| self.status() == Some(Status::InProgress))
    }

    /// The user-facing message of a validation failure, when one was given.
    pub fn validation_error(&self) -> Option<&'a str> {
        *self
            .memo
            .validation_error
            .get_or_init(|| self.status_message_when(Status::ValidationError))
    }

    /// The user-facing message of a failed submission, when one was given.
    pub fn user_reportable_error(&self) -> Option<&'a str> {
        *self
            .memo
            .user_reportable_error
            .get_or_init(|| self.status_message_when(Status::Error))
    }

    fn status_message_when(&self, status: Status) -> Option<&'a str> {
        self.status_view()
            .filter(|view| view.status == Some(status))
            .and_then(|view| view.error_user_message.as_deref())
    }

    /// The form survives validation errors so the user can retry, but is
    /// hidden once the request is in progress, placed, or failed outright.
    pub fn show_request_form(&self) -> bool {
        *self.memo.show_request_form.get_or_init(|| {
            self.request_prompt_response().is_some()
                && !self.could_not_place_request()
                && !matches!(
                    self.status(),
                    Some(Status::InProgress | Status::Successful)
                )
        })
    }

    pub fn show_not_available(&self) -> bool {
        *self.memo.show_not_available.get_or_init(|| {
            self.status_response().is_none()
                && !self.show_request_form()
                && self.not_available_response().is_some()
        })
    }

    pub fn show_link_response(&self) -> bool {
        *self.memo.show_link_response.get_or_init(|| {
            self.link_response().is_some()
                && !self.show_confirmation()
                && !self.show_request_form()
                && !self.show_not_available()
        })
    }

    /// Whether any of the section's service types is still running, so the
    /// caller keeps polling regardless of which branch is shown.
    pub fn service_in_progress(&self) -> bool {
        *self.memo.service_in_progress.get_or_init(|| {
            self.renderer
                .request()
                .is_any_service_type_still_running(self.renderer.service_type_values())
        })
    }

    pub fn spinner_configuration(&self) -> &SpinnerConfiguration {
        self.memo.spinner_configuration.get_or_init(|| {
            let keys = &self.config.message_keys;
            let key = if self.request_submission_in_progress() {
                &keys.status_progress
            } else {
                &keys.prompt_progress
            };
            let mut spinner = self.renderer.spinner_configuration();
            spinner.locals.progress_message = Some(key.clone());
            spinner
        })
    }

    pub fn error_classification(&self) -> &[String] {
        self.memo.error_classification.get_or_init(|| {
            let classes = &self.config.error_classes;
            let mut out = vec![classes.base.clone()];
            if self.could_not_place_request() {
                out.extend(classes.danger.iter().cloned());
            }
            out
        })
    }

    pub fn error_message_key(&self) -> &'a str {
        *self.memo.error_message_key.get_or_init(|| {
            let config: &'a PanelConfig = self.config;
            let keys = &config.message_keys;
            if self.could_not_place_request() {
                keys.submission_error.as_str()
            } else {
                keys.section_error.as_str()
            }
        })
    }

    pub fn display_state(&self) -> DisplayState {
        *self.memo.display_state.get_or_init(|| {
            if self.show_request_form() {
                DisplayState::RequestForm
            } else if self.show_confirmation() {
                DisplayState::Confirmation
            } else if self.show_not_available() {
                DisplayState::NotAvailable
            } else if self.show_link_response() {
                DisplayState::LinkToSearch
            } else {
                DisplayState::Empty
            }
        })
    }

    /// Every primary branch whose predicate holds. Never more than one.
    pub fn active_states(&self) -> Vec<DisplayState> {
        [
            (self.show_request_form(), DisplayState::RequestForm),
            (self.show_confirmation(), DisplayState::Confirmation),
            (self.show_not_available(), DisplayState::NotAvailable),
            (self.show_link_response(), DisplayState::LinkToSearch),
        ]
        .into_iter()
        .filter_map(|(active, state)| active.then_some(state))
        .collect()
    }

    pub fn view(&self) -> &PanelView {
        self.memo.view.get_or_init(|| {
            let error = (self.could_not_place_request() || self.validation_error().is_some())
                .then(|| ErrorView {
                    classes: self.error_classification().to_vec(),
                    message_key: self.error_message_key().to_string(),
                    user_message: self
                        .user_reportable_error()
                        .or(self.validation_error())
                        .map(str::to_string),
                });
            let view = PanelView {
                display_state: self.display_state(),
                service_in_progress: self.service_in_progress(),
                request_submission_in_progress: self.request_submission_in_progress(),
                spinner: self.spinner_configuration().clone(),
                validation_error: self.validation_error().map(str::to_string),
                user_reportable_error: self.user_reportable_error().map(str::to_string),
                error,
            };
            debug!(
                display_state = %view.display_state,
                service_in_progress = view.service_in_progress,
                "resolved panel view"
            );
            view
        })
    }
}
