use crate::support::{load_config_or_exit, yes_no};
use bd_panel_ux::{PanelService, SnapshotBackend};
use std::process;
use tracing::info;

pub struct Args {
    pub snapshot: String,
    pub config: Option<String>,
    pub json: bool,
}

pub fn run(args: Args) {
    let config = load_config_or_exit(args.config.as_deref());
    let backend = SnapshotBackend::load_json(&args.snapshot, config.service_types.clone())
        .unwrap_or_else(|e| {
            eprintln!(
                "error: failed to load response snapshot at {}: {e}",
                args.snapshot
            );
            process::exit(1);
        });
    let service = PanelService::new(backend, config);
    let report = service.report();
    info!(
        snapshot = %args.snapshot,
        display_state = %report.view.display_state,
        "resolved panel"
    );

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).expect("json serialization")
        );
        return;
    }

    let view = &report.view;
    println!("bd-panel resolve");
    if let Some(request_id) = &report.request_id {
        println!("  request: {request_id}");
    }
    println!("  display state: {}", view.display_state);
    println!("  service in progress: {}", yes_no(view.service_in_progress));
    println!(
        "  submission in progress: {}",
        yes_no(view.request_submission_in_progress)
    );
    if view.service_in_progress {
        println!(
            "  progress message: {}",
            view.spinner
                .locals
                .progress_message
                .as_deref()
                .unwrap_or("(missing)")
        );
    }
    if let Some(message) = &view.validation_error {
        println!("  validation error: {message}");
    }
    if let Some(error) = &view.error {
        println!("  error key: {}", error.message_key);
        println!("  error classes: {}", error.classes.join(" "));
        if let Some(message) = &error.user_message {
            println!("  error message: {message}");
        }
    }
    println!("  records: {}", report.records.len());
}
