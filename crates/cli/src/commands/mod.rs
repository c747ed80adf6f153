pub mod config;
pub mod load;
pub mod show;

pub use config::handle_config_command;
pub use load::{LoadOptions, LoadSummary, load_directory};
pub use show::handle_show_command;
