use std::path::PathBuf;

use implreg_registry::PendingPolicy;
use url::Url;

use crate::render::OutputFormat;

#[derive(clap::Parser, Debug)]
#[clap(name = "implreg", about = "Load and inspect generated implementor tables")]
pub struct Cli {
    /// Use this configuration file instead of the default location
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Deliver every implementor data file under a directory through the registry
    Load {
        /// Directory containing an `implementors/` tree
        dir: PathBuf,
        /// Bind the rendering consumer only after all files were delivered
        #[clap(long)]
        late_bind: bool,
        /// Override the configured pending policy
        #[clap(long, value_enum)]
        policy: Option<PendingPolicy>,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Describe the implementors in a single data file
    Show {
        /// Path to a `trait.<Name>.js` data file
        file: PathBuf,
        #[clap(flatten)]
        output: OutputArgs,
    },
    /// Manage configuration
    Config {
        #[clap(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output format
    #[clap(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Resolve relative references against this URL
    #[clap(long)]
    pub base_url: Option<Url>,
    /// Include the raw markup in text output
    #[clap(long)]
    pub show_markup: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "registry.pending_policy")
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Reset configuration to defaults
    Reset {
        /// Skip confirmation prompt
        #[clap(long)]
        force: bool,
    },
}
