use bd_panel_core::PanelConfig;
use std::process;

pub fn load_config_or_exit(path: Option<&str>) -> PanelConfig {
    let Some(path) = path else {
        return PanelConfig::default();
    };
    PanelConfig::load_toml(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load panel config at {path}: {e}");
        process::exit(1);
    })
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
