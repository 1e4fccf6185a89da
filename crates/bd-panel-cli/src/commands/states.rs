use crate::support::{load_config_or_exit, yes_no};
use bd_panel_ux::table::precedence_table;
use std::process;

pub fn run(config: Option<String>, json: bool) {
    let config = load_config_or_exit(config.as_deref());
    let rows = precedence_table(&config);
    let overlapping = rows.iter().filter(|row| !row.is_exclusive()).count();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).expect("json serialization")
        );
    } else {
        println!("bd-panel states");
        println!(
            "  {:<18} {:<7} {:<5} {:<14} state",
            "status", "prompt", "link", "not available"
        );
        for row in &rows {
            println!(
                "  {:<18} {:<7} {:<5} {:<14} {}",
                row.status,
                yes_no(row.prompt),
                yes_no(row.link),
                yes_no(row.not_available),
                row.display_state
            );
        }
    }

    if overlapping > 0 {
        eprintln!("error: {overlapping} combination(s) select more than one display state");
        process::exit(1);
    }
}
