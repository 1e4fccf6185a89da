//! Precedence table over every response shape the panel can receive.
//!
//! Each row fixes one status case and the presence of the three marker
//! responses, then records which display state the resolver selects.

use crate::SnapshotBackend;
use bd_panel_core::{
    DisplayState, PanelConfig, ResponseRecord, ResponseStateResolver, RunningServiceTypes,
    SnapshotIndex, Status, StatusView,
};
use serde::Serialize;
use tracing::warn;

/// Label used for a status response whose token is not a known status.
pub const UNRECOGNIZED_STATUS_LABEL: &str = "unrecognized";
pub const ABSENT_STATUS_LABEL: &str = "absent";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecedenceRow {
    pub status: String,
    pub prompt: bool,
    pub link: bool,
    pub not_available: bool,
    pub display_state: DisplayState,
    pub active_states: Vec<DisplayState>,
}

impl PrecedenceRow {
    pub fn is_exclusive(&self) -> bool {
        self.active_states.len() <= 1
    }
}

fn status_cases() -> Vec<(String, Option<ResponseRecord>)> {
    let mut cases = vec![
        (ABSENT_STATUS_LABEL.to_string(), None),
        (
            UNRECOGNIZED_STATUS_LABEL.to_string(),
            Some(ResponseRecord::RequestStatus(StatusView {
                status: None,
                error_user_message: None,
                unrecognized_status: Some(UNRECOGNIZED_STATUS_LABEL.to_string()),
            })),
        ),
    ];
    cases.extend(
        Status::ALL
            .into_iter()
            .map(|status| (status.to_string(), Some(ResponseRecord::status(status)))),
    );
    cases
}

/// Resolve every combination of status case and marker presence.
pub fn precedence_table(config: &PanelConfig) -> Vec<PrecedenceRow> {
    let mut rows = Vec::new();
    for (label, status) in status_cases() {
        for mask in 0u8..8 {
            let prompt = mask & 1 != 0;
            let link = mask & 2 != 0;
            let not_available = mask & 4 != 0;

            let mut records: Vec<ResponseRecord> = status.iter().cloned().collect();
            if prompt {
                records.push(ResponseRecord::RequestPrompt);
            }
            if link {
                records.push(ResponseRecord::LinkToSearch);
            }
            if not_available {
                records.push(ResponseRecord::NotAvailable);
            }

            let backend = SnapshotBackend::from_index(
                SnapshotIndex::from_records(None, records, RunningServiceTypes::default()),
                config.service_types.clone(),
            );
            let resolver = ResponseStateResolver::new(&backend, config);
            let row = PrecedenceRow {
                status: label.clone(),
                prompt,
                link,
                not_available,
                display_state: resolver.display_state(),
                active_states: resolver.active_states(),
            };
            if !row.is_exclusive() {
                warn!(
                    status = %row.status,
                    active = ?row.active_states,
                    "overlapping display states"
                );
            }
            rows.push(row);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row<'a>(
        rows: &'a [PrecedenceRow],
        status: &str,
        prompt: bool,
        link: bool,
        not_available: bool,
    ) -> &'a PrecedenceRow {
        rows.iter()
            .find(|r| {
                r.status == status
                    && r.prompt == prompt
                    && r.link == link
                    && r.not_available == not_available
            })
            .expect("row should exist")
    }

    #[test]
    fn table_covers_every_combination_exclusively() {
        let rows = precedence_table(&PanelConfig::default());
        assert_eq!(rows.len(), 6 * 8);
        assert!(rows.iter().all(PrecedenceRow::is_exclusive));
    }

    #[test]
    fn table_rows_follow_precedence() {
        let rows = precedence_table(&PanelConfig::default());

        let r = row(&rows, ABSENT_STATUS_LABEL, true, true, true);
        assert_eq!(r.display_state, DisplayState::RequestForm);

        let r = row(&rows, ABSENT_STATUS_LABEL, false, true, true);
        assert_eq!(r.display_state, DisplayState::NotAvailable);

        let r = row(&rows, "validation_error", true, true, false);
        assert_eq!(r.display_state, DisplayState::RequestForm);

        let r = row(&rows, "error", true, true, true);
        assert_eq!(r.display_state, DisplayState::LinkToSearch);

        let r = row(&rows, "successful", true, true, true);
        assert_eq!(r.display_state, DisplayState::Confirmation);

        let r = row(&rows, "in_progress", true, false, true);
        assert_eq!(r.display_state, DisplayState::Empty);

        let r = row(&rows, UNRECOGNIZED_STATUS_LABEL, false, false, true);
        assert_eq!(r.display_state, DisplayState::Empty);
        assert!(r.active_states.is_empty());
    }
}
