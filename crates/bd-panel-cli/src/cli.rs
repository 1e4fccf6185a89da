use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bd-panel",
    about = "Borrow Direct panel: resolve which display state a response snapshot selects",
    version
)]
pub struct Cli {
    /// Log filter directive (for example `warn` or `bd_panel_core=debug`)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the panel view for one response snapshot
    Resolve {
        /// Response snapshot JSON path
        #[arg(long, default_value = "artifacts/panel/snapshot.json")]
        snapshot: String,

        /// Optional panel config TOML path
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the display state selected for every response combination
    States {
        /// Optional panel config TOML path
        #[arg(long)]
        config: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
